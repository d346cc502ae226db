//! A value kept in sync with a store entry
//!
//! The binding is the single writer for its key. Changes never touch the store
//! directly; they mark the binding pending, and the next cycle (run through
//! [`Binding::commit`] or a [`Scheduler`](crate::scheduler::Scheduler) flush)
//! evicts a stale key and writes the current value. Any number of changes
//! before a cycle collapse into one write of the final state.

use std::fmt;

use crate::codec::{Codec, JsonCodec};
use crate::error::Result;
use crate::init::{DefaultSpec, initialize};
use crate::migrate::KeyTracker;
use crate::persist::{encode, write};
use crate::persistence::Store;

/// A change to a binding's value
pub enum Update<V> {
    /// Replace the value
    Direct(V),
    /// Compute the next value from the current one
    Updater(Box<dyn FnOnce(&V) -> V>),
}

impl<V> Update<V> {
    pub fn updater(f: impl FnOnce(&V) -> V + 'static) -> Self {
        Update::Updater(Box::new(f))
    }

    pub fn apply(self, current: &V) -> V {
        match self {
            Update::Direct(next) => next,
            Update::Updater(f) => f(current),
        }
    }
}

impl<V> From<V> for Update<V> {
    fn from(value: V) -> Self {
        Update::Direct(value)
    }
}

impl<V: fmt::Debug> fmt::Debug for Update<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Update::Direct(value) => f.debug_tuple("Direct").field(value).finish(),
            Update::Updater(_) => f.write_str("Updater(..)"),
        }
    }
}

pub struct Binding<V, S, C = JsonCodec> {
    store: S,
    key: String,
    tracker: KeyTracker,
    value: V,
    codec: C,
    /// A change is waiting for the next cycle
    pending: bool,
}

impl<V, S> Binding<V, S, JsonCodec>
where
    S: Store,
    JsonCodec: Codec<V>,
{
    /// Bind `key` in `store` using JSON encoding.
    ///
    /// Loads the stored value, or uses `default` if there is none. The store
    /// is not written until the first cycle.
    pub fn new(store: S, key: impl Into<String>, default: V) -> Result<Self> {
        Self::with_codec(store, key, DefaultSpec::Literal(default), JsonCodec)
    }

    /// Like [`Binding::new`], but `default` is only called when the store
    /// has no entry for `key`
    pub fn new_with(
        store: S,
        key: impl Into<String>,
        default: impl FnOnce() -> V + 'static,
    ) -> Result<Self> {
        Self::with_codec(store, key, DefaultSpec::factory(default), JsonCodec)
    }
}

impl<V, S, C> Binding<V, S, C>
where
    S: Store,
    C: Codec<V>,
{
    pub fn with_codec(
        store: S,
        key: impl Into<String>,
        default: DefaultSpec<V>,
        codec: C,
    ) -> Result<Self> {
        let key = key.into();
        let value = initialize(&store, &key, default, &codec)?;
        Ok(Self {
            store,
            tracker: KeyTracker::new(key.clone()),
            key,
            value,
            codec,
            pending: true,
        })
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Whether a change is waiting for the next cycle
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Apply `update` against the current value and schedule a cycle
    pub fn set_value(&mut self, update: impl Into<Update<V>>) {
        self.value = update.into().apply(&self.value);
        self.pending = true;
    }

    /// Shorthand for `set_value(Update::Direct(value))`
    pub fn set(&mut self, value: V) {
        self.set_value(Update::Direct(value));
    }

    /// Shorthand for a functional update
    pub fn update(&mut self, f: impl FnOnce(&V) -> V + 'static) {
        self.set_value(Update::updater(f));
    }

    /// Move the binding to `key`; the next cycle evicts the old entry
    pub fn set_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if key != self.key {
            self.key = key;
            self.pending = true;
        }
    }

    /// Swap the codec; a codec with a different id schedules a rewrite
    pub fn set_codec(&mut self, codec: C) {
        if codec.id() != self.codec.id() {
            self.pending = true;
        }
        self.codec = codec;
    }

    /// Run the pending cycle, if any. Returns whether a cycle ran.
    ///
    /// On error the binding stays pending and the store is left as it was
    /// before the cycle.
    pub fn commit(&mut self) -> Result<bool> {
        if !self.pending {
            return Ok(false);
        }
        self.sync()?;
        Ok(true)
    }

    /// Write the current value now, whether or not anything changed
    pub fn flush(&mut self) -> Result<()> {
        self.sync()
    }

    /// One cycle: encode, evict the stale key, write.
    ///
    /// The value is encoded before any store access. If the write fails, the
    /// evicted entry is put back and the previous key is kept, so the retry
    /// evicts it again.
    fn sync(&mut self) -> Result<()> {
        let text = encode(&self.key, &self.value, &self.codec)?;
        let eviction = self.tracker.evict(&self.store, &self.key)?;

        if let Err(e) = write(&self.store, &self.key, &text) {
            if let Some(eviction) = eviction {
                let key = eviction.key().to_string();
                if let Err(restore_err) = eviction.restore(&self.store) {
                    log::warn!("Failed to restore evicted entry '{}': {}", key, restore_err);
                }
            }
            return Err(e);
        }

        self.tracker.settle(&self.key);
        self.pending = false;
        log::debug!("Cycle complete for '{}'", self.key);
        Ok(())
    }
}

impl<V: fmt::Debug, S, C> fmt::Debug for Binding<V, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("previous_key", &self.tracker.previous())
            .field("value", &self.value)
            .field("pending", &self.pending)
            .finish()
    }
}
