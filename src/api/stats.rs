//! Side table statistics.

/// Aggregated side table statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableStats {
    /// Objects currently registered and not yet retired.
    pub live_objects: u64,

    /// Total objects ever registered.
    pub objects_registered: u64,

    /// Total objects retired.
    pub objects_retired: u64,

    /// Total associations stored or replaced.
    pub associations_set: u64,

    /// Total associations cleared.
    pub associations_cleared: u64,

    /// Total retrieval calls.
    pub lookups: u64,

    /// Total teardown callbacks that have run.
    pub teardown_callbacks_run: u64,

    /// Total slot capacity.
    pub slot_capacity: usize,

    /// Slots free for reuse.
    pub free_slots: usize,
}

impl TableStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Display for TableStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Side Table Statistics:")?;
        writeln!(f, "  Live objects:     {}", self.live_objects)?;
        writeln!(f, "  Registered:       {}", self.objects_registered)?;
        writeln!(f, "  Retired:          {}", self.objects_retired)?;
        writeln!(f, "  Associations set: {}", self.associations_set)?;
        writeln!(f, "  Cleared:          {}", self.associations_cleared)?;
        writeln!(f, "  Lookups:          {}", self.lookups)?;
        writeln!(f, "  Callbacks run:    {}", self.teardown_callbacks_run)?;
        writeln!(f, "  Slot capacity:    {}", self.slot_capacity)?;
        writeln!(f, "  Free slots:       {}", self.free_slots)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders() {
        let stats = TableStats {
            live_objects: 2,
            objects_registered: 3,
            objects_retired: 1,
            ..Default::default()
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("Live objects:     2"));
        assert!(rendered.contains("Retired:          1"));
    }
}
