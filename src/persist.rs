//! Writes a binding's current value under its current key

use crate::codec::Codec;
use crate::error::{PersistError, Result};
use crate::persistence::Store;

/// Serialize `value` for `key` without touching the store
pub fn encode<V, C: Codec<V> + ?Sized>(key: &str, value: &V, codec: &C) -> Result<String> {
    codec
        .serialize(value)
        .map_err(|source| PersistError::Serialize {
            key: key.to_string(),
            source,
        })
}

/// Write encoded `text` under `key`, overwriting any existing entry
pub fn write<S: Store + ?Sized>(store: &S, key: &str, text: &str) -> Result<()> {
    store.set(key, text)?;
    log::debug!("Persisted '{}' ({} bytes)", key, text.len());
    Ok(())
}
