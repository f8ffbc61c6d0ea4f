//! The side table.

use std::sync::Arc;

use crate::api::anchor::Anchor;
use crate::api::config::TableConfig;
use crate::api::events::EventHooks;
use crate::api::stats::TableStats;
use crate::api::wrappers::Tethered;
use crate::core::state::TableState;

/// An association table: objects in, side-channel data and teardown hooks
/// out.
///
/// Cheap to clone (internally uses `Arc`) and thread-safe; every clone
/// views the same objects and entries.
///
/// # Example
///
/// ```rust
/// use annex::{AssocKey, AssociationPolicy, SideTable, TableConfig};
/// use std::sync::Arc;
///
/// let table = SideTable::new(TableConfig::default());
/// let key = AssocKey::new();
///
/// let anchor = table.register();
/// anchor.associate(key, Some(&Arc::new(42u32)), AssociationPolicy::RetainNonatomic);
/// assert_eq!(anchor.associated::<u32>(key).as_deref(), Some(&42));
/// ```
#[derive(Clone)]
pub struct SideTable {
    state: Arc<TableState>,
}

impl SideTable {
    /// Create a new table with the given configuration.
    pub fn new(config: TableConfig) -> Self {
        Self {
            state: Arc::new(TableState::new(config)),
        }
    }

    /// Create a table with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TableConfig::default())
    }

    /// Register a new object, returning its anchor.
    ///
    /// The object lives until the anchor is dropped.
    pub fn register(&self) -> Anchor {
        let id = self.state.acquire();
        Anchor::new(Arc::clone(&self.state), id)
    }

    /// Bundle `value` with a fresh anchor in this table.
    pub fn tether<T>(&self, value: T) -> Tethered<T> {
        Tethered::new_in(value, self)
    }

    /// Get the event hook registry.
    pub fn hooks(&self) -> &EventHooks {
        self.state.hooks()
    }

    /// Get the configuration.
    pub fn config(&self) -> &TableConfig {
        self.state.config()
    }

    /// Snapshot the table's statistics.
    pub fn stats(&self) -> TableStats {
        self.state.stats()
    }

    /// Number of objects currently registered.
    pub fn live_objects(&self) -> u64 {
        self.state.stats().live_objects
    }
}

impl Default for SideTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::key::AssocKey;
    use crate::api::policy::AssociationPolicy;

    #[test]
    fn test_clones_share_state() {
        let table = SideTable::new(TableConfig::minimal());
        let clone = table.clone();

        let anchor = table.register();
        assert_eq!(clone.live_objects(), 1);

        let key = AssocKey::new();
        anchor.associate(key, Some(&Arc::new(9i64)), AssociationPolicy::RetainNonatomic);
        assert_eq!(clone.stats().associations_set, 1);
    }

    #[test]
    fn test_live_object_count_tracks_anchors() {
        let table = SideTable::new(TableConfig::minimal());

        let a = table.register();
        let b = table.register();
        assert_eq!(table.live_objects(), 2);

        drop(a);
        assert_eq!(table.live_objects(), 1);
        drop(b);
        assert_eq!(table.live_objects(), 0);
    }
}
