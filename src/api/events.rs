//! Table lifecycle events.
//!
//! Provides opt-in observer callbacks for table traffic with zero overhead
//! when disabled.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::anchor::ObjectId;
use crate::api::key::AssocKey;
use crate::api::policy::AssociationPolicy;
use crate::sync::mutex::Mutex;

/// A table lifecycle event.
#[derive(Debug, Clone)]
pub enum TableEvent {
    /// An object was registered.
    Registered { id: ObjectId },
    /// An object was retired.
    Retired {
        id: ObjectId,
        callbacks_run: usize,
        entries_released: usize,
    },
    /// A value was stored or replaced under a key.
    Associated {
        id: ObjectId,
        key: AssocKey,
        policy: AssociationPolicy,
    },
    /// A key's entry was cleared.
    Cleared { id: ObjectId, key: AssocKey },
}

/// Callback type for table events.
pub type TableEventCallback = Box<dyn Fn(&TableEvent) + Send + Sync>;

/// Observer registry for table events.
pub struct EventHooks {
    /// Whether event emission is enabled.
    enabled: AtomicBool,
    /// Registered event callbacks.
    callbacks: Mutex<Vec<TableEventCallback>>,
}

impl EventHooks {
    /// Create a new hook registry (disabled).
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Enable event emission.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Disable event emission.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Check if event emission is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Register an event callback.
    pub fn on_event<F>(&self, callback: F)
    where
        F: Fn(&TableEvent) + Send + Sync + 'static,
    {
        let mut callbacks = self.callbacks.lock();
        callbacks.push(Box::new(callback));
    }

    /// Clear all callbacks.
    pub fn clear_callbacks(&self) {
        let mut callbacks = self.callbacks.lock();
        callbacks.clear();
    }

    /// Emit an event to all registered callbacks.
    pub(crate) fn emit(&self, event: TableEvent) {
        if !self.is_enabled() {
            return;
        }

        let callbacks = self.callbacks.lock();
        for callback in callbacks.iter() {
            callback(&event);
        }
    }
}

impl Default for EventHooks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn sample_event() -> TableEvent {
        TableEvent::Registered {
            id: ObjectId {
                index: 0,
                generation: 1,
            },
        }
    }

    #[test]
    fn test_disabled_by_default() {
        let hooks = EventHooks::new();
        assert!(!hooks.is_enabled());

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        hooks.on_event(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        hooks.emit(sample_event());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_fires_when_enabled() {
        let hooks = EventHooks::new();
        hooks.enable();

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        hooks.on_event(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        hooks.emit(sample_event());
        hooks.emit(sample_event());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear_callbacks() {
        let hooks = EventHooks::new();
        hooks.enable();

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        hooks.on_event(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        hooks.clear_callbacks();

        hooks.emit(sample_event());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
