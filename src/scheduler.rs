//! Cooperative single-threaded cycle scheduler
//!
//! Owners mutate bindings freely during a unit of work, then call
//! [`Scheduler::flush`] once the work is done. Each registered binding runs at
//! most one cycle per flush, so intermediate states are never written.
//!
//! The scheduler only holds weak handles. A binding dropped before the flush
//! simply disappears along with its pending cycle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::binding::Binding;
use crate::codec::Codec;
use crate::error::Result;
use crate::persistence::Store;

/// Shared handle to a binding registered with a [`Scheduler`]
pub type Shared<T> = Rc<RefCell<T>>;

/// Something with a pending synchronization cycle
pub trait Cycle {
    fn is_pending(&self) -> bool;

    /// Run the pending cycle. Returns whether one ran.
    fn run_cycle(&mut self) -> Result<bool>;
}

impl<V, S, C> Cycle for Binding<V, S, C>
where
    S: Store,
    C: Codec<V>,
{
    fn is_pending(&self) -> bool {
        Binding::is_pending(self)
    }

    fn run_cycle(&mut self) -> Result<bool> {
        self.commit()
    }
}

#[derive(Default)]
pub struct Scheduler {
    entries: RefCell<Vec<Weak<RefCell<dyn Cycle>>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `cycle` and hand back the shared handle the owner keeps
    pub fn bind<T: Cycle + 'static>(&self, cycle: T) -> Shared<T> {
        let shared = Rc::new(RefCell::new(cycle));
        self.register(&shared);
        shared
    }

    /// Register an existing handle. Registering twice has no extra effect.
    pub fn register<T: Cycle + 'static>(&self, shared: &Shared<T>) {
        let handle: Rc<RefCell<dyn Cycle>> = shared.clone();
        let weak = Rc::downgrade(&handle);
        let mut entries = self.entries.borrow_mut();
        if !entries.iter().any(|e| e.ptr_eq(&weak)) {
            entries.push(weak);
        }
    }

    /// Live registered handles, pruning dropped ones
    pub fn len(&self) -> usize {
        self.prune();
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live handles with a pending cycle
    pub fn pending(&self) -> usize {
        self.live()
            .iter()
            .filter(|c| c.try_borrow().map(|c| c.is_pending()).unwrap_or(true))
            .count()
    }

    /// Run every pending cycle in registration order.
    ///
    /// Stops at the first failing cycle and returns its error; bindings after
    /// it stay pending for the next flush. Returns the number of cycles run.
    pub fn flush(&self) -> Result<usize> {
        let mut ran = 0;
        for entry in self.live() {
            let Ok(mut cycle) = entry.try_borrow_mut() else {
                log::warn!("Binding is borrowed during flush, deferring its cycle");
                continue;
            };
            match cycle.run_cycle() {
                Ok(true) => ran += 1,
                Ok(false) => {}
                Err(e) => {
                    log::warn!("Cycle failed: {}", e);
                    return Err(e);
                }
            }
        }
        if ran > 0 {
            log::debug!("Flushed {} cycle(s)", ran);
        }
        Ok(ran)
    }

    fn prune(&self) {
        self.entries.borrow_mut().retain(|e| e.strong_count() > 0);
    }

    fn live(&self) -> Vec<Rc<RefCell<dyn Cycle>>> {
        self.prune();
        self.entries
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PersistError, StoreError};
    use crate::persistence::MemoryStore;

    #[test]
    fn test_flush_runs_each_binding_once() {
        let store = Rc::new(MemoryStore::new());
        let scheduler = Scheduler::new();

        let name = scheduler.bind(Binding::new(store.clone(), "name", String::new()).unwrap());
        let count = scheduler.bind(Binding::new(store.clone(), "count", 0u32).unwrap());
        assert_eq!(scheduler.pending(), 2);

        name.borrow_mut().set("Kent".to_string());
        name.borrow_mut().set("Kent C.".to_string());
        count.borrow_mut().update(|n| n + 1);

        assert_eq!(scheduler.flush().unwrap(), 2);
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.get("name").unwrap().as_deref(), Some("\"Kent C.\""));
        assert_eq!(store.get("count").unwrap().as_deref(), Some("1"));

        assert_eq!(scheduler.flush().unwrap(), 0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_dropped_binding_cycle_is_discarded() {
        let store = Rc::new(MemoryStore::new());
        let scheduler = Scheduler::new();

        let binding = scheduler.bind(Binding::new(store.clone(), "gone", 1u8).unwrap());
        binding.borrow_mut().set(2);
        drop(binding);

        assert_eq!(scheduler.flush().unwrap(), 0);
        assert!(store.is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_failure_stops_flush_and_keeps_pending() {
        let store = Rc::new(MemoryStore::with_quota(16));
        let scheduler = Scheduler::new();

        let big = scheduler.bind(Binding::new(store.clone(), "big", String::new()).unwrap());
        let small = scheduler.bind(Binding::new(store.clone(), "s", 1u8).unwrap());
        big.borrow_mut().set("this value does not fit".to_string());

        let err = scheduler.flush().unwrap_err();
        assert!(matches!(err, PersistError::Store(StoreError::QuotaExceeded { .. })));
        assert!(big.borrow().is_pending());
        assert!(small.borrow().is_pending());

        big.borrow_mut().set("ok".to_string());
        assert_eq!(scheduler.flush().unwrap(), 2);
        assert_eq!(store.keys(), vec!["big".to_string(), "s".to_string()]);
    }

    #[test]
    fn test_register_twice_is_single_entry() {
        let store = Rc::new(MemoryStore::new());
        let scheduler = Scheduler::new();

        let shared = scheduler.bind(Binding::new(store.clone(), "k", 0u8).unwrap());
        scheduler.register(&shared);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_borrowed_binding_is_deferred() {
        let store = Rc::new(MemoryStore::new());
        let scheduler = Scheduler::new();
        let binding = scheduler.bind(Binding::new(store.clone(), "k", 5u8).unwrap());

        {
            let _held = binding.borrow_mut();
            assert_eq!(scheduler.flush().unwrap(), 0);
        }
        assert_eq!(scheduler.flush().unwrap(), 1);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("5"));
    }
}
