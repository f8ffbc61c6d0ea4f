//! Shared table state.
//!
//! The slot-vector engine behind every `SideTable` clone: a
//! generation-checked slot per object, a lock-free pool of retired slot
//! indices, and the counters behind `TableStats`. User callbacks and value
//! drops never run while the slot lock is held - a teardown callback or a
//! value's `Drop` may reenter the table.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_queue::SegQueue;

use crate::api::anchor::ObjectId;
use crate::api::config::TableConfig;
use crate::api::events::{EventHooks, TableEvent};
use crate::api::key::AssocKey;
use crate::api::stats::TableStats;
use crate::core::slot::{Slot, TeardownFn};
use crate::core::value::{AnyValue, StoredEntry};
use crate::sync::mutex::RwLock;

/// State shared by a table and all of its anchors.
pub(crate) struct TableState {
    /// Configuration
    config: TableConfig,

    /// Object slots
    slots: RwLock<Vec<Slot>>,

    /// Retired slot indices awaiting reuse
    free: SegQueue<u32>,

    /// Event observers
    hooks: EventHooks,

    /// Counters (atomics)
    live_objects: AtomicU64,
    objects_registered: AtomicU64,
    objects_retired: AtomicU64,
    associations_set: AtomicU64,
    associations_cleared: AtomicU64,
    lookups: AtomicU64,
    teardown_callbacks_run: AtomicU64,
}

// SAFETY: the slot lock guards all slot access, and teardown callbacks
// (the only non-Sync contents) are moved out and invoked by exactly one
// thread - the one retiring the object. Shared references never call them.
unsafe impl Sync for TableState {}

impl TableState {
    /// Create new table state with the given configuration.
    pub fn new(config: TableConfig) -> Self {
        Self {
            slots: RwLock::new(Vec::with_capacity(config.initial_slots)),
            free: SegQueue::new(),
            hooks: EventHooks::new(),
            config,
            live_objects: AtomicU64::new(0),
            objects_registered: AtomicU64::new(0),
            objects_retired: AtomicU64::new(0),
            associations_set: AtomicU64::new(0),
            associations_cleared: AtomicU64::new(0),
            lookups: AtomicU64::new(0),
            teardown_callbacks_run: AtomicU64::new(0),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Get the event hook registry.
    pub fn hooks(&self) -> &EventHooks {
        &self.hooks
    }

    /// Claim a slot for a new object.
    pub fn acquire(&self) -> ObjectId {
        let keys_hint = self.config.keys_per_object;

        let id = if let Some(index) = self.free.pop() {
            let mut slots = self.slots.write();
            let slot = &mut slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.in_use = true;
            debug_assert!(slot.entries.is_empty() && slot.teardown.is_empty());
            ObjectId {
                index,
                generation: slot.generation,
            }
        } else {
            let mut slots = self.slots.write();
            let index = slots.len() as u32;
            slots.push(Slot::occupied(1, keys_hint));
            ObjectId {
                index,
                generation: 1,
            }
        };

        self.live_objects.fetch_add(1, Ordering::Relaxed);
        self.objects_registered.fetch_add(1, Ordering::Relaxed);

        #[cfg(feature = "log")]
        log::trace!("registered object {:?}", id);

        self.hooks.emit(TableEvent::Registered { id });
        id
    }

    /// Register a teardown callback for `id`.
    pub fn push_teardown(&self, id: ObjectId, callback: TeardownFn) {
        let mut slots = self.slots.write();
        if let Some(slot) = slots.get_mut(id.index as usize) {
            if slot.is_current(id.generation) {
                slot.teardown.push(callback);
            }
        }
    }

    /// Store, replace, or clear the entry under `(id, key)`.
    ///
    /// `None` clears. The previous entry, if any, is released after the
    /// lock is dropped.
    pub fn associate(&self, id: ObjectId, key: AssocKey, entry: Option<StoredEntry>) {
        let event = match &entry {
            Some(stored) => TableEvent::Associated {
                id,
                key,
                policy: stored.policy,
            },
            None => TableEvent::Cleared { id, key },
        };
        let cleared = entry.is_none();

        #[cfg(feature = "log")]
        match &entry {
            Some(stored) => log::trace!(
                "object {:?}: set key {} ({})",
                id,
                key.raw(),
                stored.policy.name()
            ),
            None => log::trace!("object {:?}: clear key {}", id, key.raw()),
        }

        let previous = {
            let mut slots = self.slots.write();
            match slots.get_mut(id.index as usize) {
                Some(slot) if slot.is_current(id.generation) => match entry {
                    Some(stored) => slot.entries.insert(key, stored),
                    None => slot.entries.remove(&key),
                },
                _ => return,
            }
        };
        drop(previous);

        if cleared {
            self.associations_cleared.fetch_add(1, Ordering::Relaxed);
        } else {
            self.associations_set.fetch_add(1, Ordering::Relaxed);
        }
        self.hooks.emit(event);
    }

    /// Get a strong handle to the value stored under `(id, key)`, if any.
    pub fn lookup(&self, id: ObjectId, key: AssocKey) -> Option<Arc<AnyValue>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        let slots = self.slots.read();
        let slot = slots.get(id.index as usize)?;
        if !slot.is_current(id.generation) {
            return None;
        }
        slot.entries.get(&key).and_then(|entry| entry.value.get())
    }

    /// Retire `id`: run its callbacks exactly once, release its entries,
    /// recycle the slot.
    pub fn retire(&self, id: ObjectId) {
        let (teardown, entries) = {
            let mut slots = self.slots.write();
            match slots.get_mut(id.index as usize) {
                Some(slot) if slot.is_current(id.generation) => {
                    slot.in_use = false;
                    (
                        std::mem::take(&mut slot.teardown),
                        std::mem::take(&mut slot.entries),
                    )
                }
                _ => return,
            }
        };

        let callbacks_run = teardown.len();
        let entries_released = entries.len();

        for callback in teardown {
            callback();
        }
        self.teardown_callbacks_run
            .fetch_add(callbacks_run as u64, Ordering::Relaxed);

        // Entries are released only after every callback has run.
        drop(entries);

        // The slot is handed back for reuse last, so no new tenant can
        // appear while callbacks are still running.
        self.free.push(id.index);
        self.live_objects.fetch_sub(1, Ordering::Relaxed);
        self.objects_retired.fetch_add(1, Ordering::Relaxed);

        #[cfg(feature = "log")]
        log::trace!(
            "retired object {:?} ({} callbacks, {} entries)",
            id,
            callbacks_run,
            entries_released
        );

        self.hooks.emit(TableEvent::Retired {
            id,
            callbacks_run,
            entries_released,
        });
    }

    /// Snapshot the counters.
    pub fn stats(&self) -> TableStats {
        let slot_capacity = self.slots.read().len();

        TableStats {
            live_objects: self.live_objects.load(Ordering::Relaxed),
            objects_registered: self.objects_registered.load(Ordering::Relaxed),
            objects_retired: self.objects_retired.load(Ordering::Relaxed),
            associations_set: self.associations_set.load(Ordering::Relaxed),
            associations_cleared: self.associations_cleared.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            teardown_callbacks_run: self.teardown_callbacks_run.load(Ordering::Relaxed),
            slot_capacity,
            free_slots: self.free.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::policy::AssociationPolicy;
    use crate::core::value::StoredValue;

    fn entry(value: &Arc<String>, policy: AssociationPolicy) -> StoredEntry {
        StoredEntry {
            value: StoredValue::build(value, policy),
            policy,
        }
    }

    #[test]
    fn test_acquire_retire_reuses_slot_with_new_generation() {
        let state = TableState::new(TableConfig::minimal());

        let first = state.acquire();
        state.retire(first);

        let second = state.acquire();
        assert_eq!(first.index, second.index);
        assert_ne!(first.generation, second.generation);
    }

    #[test]
    fn test_stale_id_is_inert() {
        let state = TableState::new(TableConfig::minimal());
        let key = AssocKey::new();

        let first = state.acquire();
        state.retire(first);
        let second = state.acquire();

        let value = Arc::new(String::from("tenant"));
        state.associate(first, key, Some(entry(&value, AssociationPolicy::RetainNonatomic)));

        // The stale id must not have written into the reused slot.
        assert!(state.lookup(second, key).is_none());
        assert!(state.lookup(first, key).is_none());
    }

    #[test]
    fn test_retire_twice_is_a_no_op() {
        let state = TableState::new(TableConfig::minimal());

        let id = state.acquire();
        state.retire(id);
        state.retire(id);

        let stats = state.stats();
        assert_eq!(stats.objects_retired, 1);
        assert_eq!(stats.live_objects, 0);
    }

    #[test]
    fn test_replacement_drops_previous_entry() {
        let state = TableState::new(TableConfig::minimal());
        let key = AssocKey::new();
        let id = state.acquire();

        let first = Arc::new(String::from("first"));
        let second = Arc::new(String::from("second"));

        state.associate(id, key, Some(entry(&first, AssociationPolicy::RetainNonatomic)));
        state.associate(id, key, Some(entry(&second, AssociationPolicy::RetainNonatomic)));

        // The table gave up its handle on the first value.
        assert_eq!(Arc::strong_count(&first), 1);

        let held = state.lookup(id, key).unwrap().downcast::<String>().ok().unwrap();
        assert_eq!(*held, "second");
    }
}
