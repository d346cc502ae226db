//! Key-value store backends
//!
//! Features:
//! - `Store` trait: synchronous get/set/remove by string key
//! - In-memory store with optional quota
//! - JSON file store (tmp → rename, never a partial file)
//! - Browser LocalStorage (wasm32 only)
//! - Namespaced view over any store

pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod memory;
pub mod namespaced;

use std::rc::Rc;

use crate::error::StoreError;

pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStore;
pub use namespaced::Namespaced;

/// A synchronous string key-value store.
///
/// Methods take `&self` so several bindings can share one backend, the same
/// way every script on a page shares `window.localStorage`.
pub trait Store {
    /// Read the entry under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any existing entry
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the entry under `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: Store + ?Sized> Store for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
