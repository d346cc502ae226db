//! Persisted State - a value kept in sync with a key-value store
//!
//! Core modules:
//! - `binding`: The value + key + codec unit and its synchronization cycle
//! - `codec`: Value <-> stored text conversion (JSON by default)
//! - `init`: One-time starting value (stored entry or default)
//! - `migrate`: Evicting the old entry when the key changes
//! - `persist`: Writing the current value under the current key
//! - `scheduler`: Cooperative run loop that flushes pending cycles
//! - `persistence`: Store backends (memory, file, LocalStorage)
//! - `config`: Backend selection

pub mod binding;
pub mod codec;
pub mod config;
pub mod error;
pub mod init;
pub mod migrate;
pub mod persist;
pub mod persistence;
pub mod scheduler;

pub use binding::{Binding, Update};
pub use codec::{Codec, FnCodec, JsonCodec, PrettyJsonCodec};
pub use config::{Backend, StoreConfig};
pub use error::{CodecError, PersistError, StoreError};
pub use init::DefaultSpec;
pub use persistence::{FileStore, MemoryStore, Namespaced, Store};
pub use scheduler::{Cycle, Scheduler, Shared};
