//! Side table configuration.

/// Configuration for a side table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Slot capacity reserved up front (default: 1024)
    pub initial_slots: usize,

    /// Expected number of keys per object; sizes each entry map (default: 4)
    pub keys_per_object: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_slots: 1024,
            keys_per_object: 4,
        }
    }
}

impl TableConfig {
    /// Create a minimal config for testing or constrained environments.
    pub fn minimal() -> Self {
        Self {
            initial_slots: 16,
            keys_per_object: 1,
        }
    }

    /// Builder pattern: set up-front slot capacity.
    pub fn with_initial_slots(mut self, slots: usize) -> Self {
        self.initial_slots = slots;
        self
    }

    /// Builder pattern: set the expected keys per object.
    pub fn with_keys_per_object(mut self, keys: usize) -> Self {
        self.keys_per_object = keys;
        self
    }
}
