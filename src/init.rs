//! One-time computation of a binding's starting value

use std::fmt;

use crate::codec::Codec;
use crate::error::{PersistError, Result};
use crate::persistence::Store;

/// Source of the starting value when the store holds nothing for the key
pub enum DefaultSpec<V> {
    /// Use this value as-is
    Literal(V),
    /// Call this once, only if the store has no entry
    Factory(Box<dyn FnOnce() -> V>),
}

impl<V> DefaultSpec<V> {
    pub fn factory(f: impl FnOnce() -> V + 'static) -> Self {
        DefaultSpec::Factory(Box::new(f))
    }

    /// Produce the value, invoking the factory if there is one
    pub fn resolve(self) -> V {
        match self {
            DefaultSpec::Literal(value) => value,
            DefaultSpec::Factory(f) => f(),
        }
    }
}

impl<V> From<V> for DefaultSpec<V> {
    fn from(value: V) -> Self {
        DefaultSpec::Literal(value)
    }
}

impl<V: fmt::Debug> fmt::Debug for DefaultSpec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSpec::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultSpec::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Read the stored value for `key`, or fall back to `default`.
///
/// An empty stored string counts as no entry. A non-empty entry that fails
/// to decode is an error, never silently replaced by the default. Nothing is
/// written to the store here.
pub fn initialize<V, S, C>(store: &S, key: &str, default: DefaultSpec<V>, codec: &C) -> Result<V>
where
    S: Store + ?Sized,
    C: Codec<V> + ?Sized,
{
    match store.get(key)? {
        Some(text) if !text.is_empty() => {
            let value = codec
                .deserialize(&text)
                .map_err(|source| PersistError::Deserialize {
                    key: key.to_string(),
                    source,
                })?;
            log::info!("Loaded '{}' from store", key);
            Ok(value)
        }
        _ => {
            log::info!("No stored value for '{}', using default", key);
            Ok(default.resolve())
        }
    }
}
