//! Key migration: evicts the entry left behind when a binding's key changes

use crate::error::StoreError;
use crate::persistence::Store;

/// Remembers the key as of the end of the last completed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTracker {
    previous: String,
}

impl KeyTracker {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            previous: key.into(),
        }
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    /// Remove the entry under the previous key if it differs from `current`.
    ///
    /// Must run before the new value is written so a removal can never undo
    /// that write. The previous key is not advanced here: call
    /// [`KeyTracker::settle`] once the write has succeeded, or hand the
    /// returned [`Eviction`] to [`Eviction::restore`] if it failed.
    pub fn evict<S>(&self, store: &S, current: &str) -> Result<Option<Eviction>, StoreError>
    where
        S: Store + ?Sized,
    {
        if self.previous == current {
            return Ok(None);
        }
        log::debug!("Key changed '{}' -> '{}', evicting old entry", self.previous, current);
        let saved = store.get(&self.previous)?;
        store.remove(&self.previous)?;
        Ok(Some(Eviction {
            key: self.previous.clone(),
            saved,
        }))
    }

    /// Record `current` as the key of the last completed cycle
    pub fn settle(&mut self, current: &str) {
        if self.previous != current {
            self.previous = current.to_string();
        }
    }
}

/// An entry removed by [`KeyTracker::evict`], kept until the cycle's write lands
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Eviction {
    key: String,
    saved: Option<String>,
}

impl Eviction {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Put the removed entry back, if there was one
    pub fn restore<S>(self, store: &S) -> Result<(), StoreError>
    where
        S: Store + ?Sized,
    {
        match self.saved {
            Some(text) => {
                log::debug!("Restoring evicted entry '{}'", self.key);
                store.set(&self.key, &text)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_same_key_keeps_entry() {
        let store = MemoryStore::from_entries([("name", "\"Kent\"")]);
        let mut tracker = KeyTracker::new("name");

        for _ in 0..2 {
            assert_eq!(tracker.evict(&store, "name").unwrap(), None);
            tracker.settle("name");
        }

        assert!(store.contains_key("name"));
        assert_eq!(store.removal_count(), 0);
    }

    #[test]
    fn test_changed_key_evicts_previous() {
        let store = MemoryStore::from_entries([("a", "1"), ("unrelated", "2")]);
        let mut tracker = KeyTracker::new("a");

        let eviction = tracker.evict(&store, "b").unwrap().unwrap();
        assert_eq!(eviction.key(), "a");
        assert_eq!(tracker.previous(), "a");
        tracker.settle("b");

        assert_eq!(tracker.previous(), "b");
        assert!(!store.contains_key("a"));
        assert!(store.contains_key("unrelated"));
    }

    #[test]
    fn test_absent_previous_is_fine() {
        let store = MemoryStore::new();
        let mut tracker = KeyTracker::new("never-written");

        let eviction = tracker.evict(&store, "next").unwrap().unwrap();
        tracker.settle("next");
        assert_eq!(tracker.previous(), "next");

        // Nothing was there, so nothing comes back
        eviction.restore(&store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_puts_entry_back() {
        let store = MemoryStore::from_entries([("a", "\"x\"")]);
        let tracker = KeyTracker::new("a");

        let eviction = tracker.evict(&store, "b").unwrap().unwrap();
        assert!(store.is_empty());

        eviction.restore(&store).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("\"x\""));
        assert_eq!(tracker.previous(), "a");
    }

    #[test]
    fn test_chain_of_renames_tracks_latest() {
        let store = MemoryStore::from_entries([("a", "1")]);
        let mut tracker = KeyTracker::new("a");

        let _ = tracker.evict(&store, "b").unwrap();
        tracker.settle("b");
        store.set("b", "1").unwrap();
        let _ = tracker.evict(&store, "c").unwrap();
        tracker.settle("c");

        assert!(store.is_empty());
        assert_eq!(tracker.previous(), "c");
    }
}
