//! Safe wrapper types.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::api::anchor::{Anchor, Anchored};
use crate::api::table::SideTable;

/// A value bundled with its table anchor.
///
/// Dereferences to the value; dropping the wrapper retires the object.
/// The anchor field is declared first so teardown callbacks run while the
/// value is still alive.
pub struct Tethered<T> {
    anchor: Anchor,
    value: T,
}

impl<T> Tethered<T> {
    /// Tether `value` to the process-wide default table.
    pub fn new(value: T) -> Self {
        Self::new_in(value, crate::core::global::global())
    }

    /// Tether `value` to `table`.
    pub fn new_in(value: T, table: &SideTable) -> Self {
        Self {
            anchor: table.register(),
            value,
        }
    }

    /// Get a shared reference to the value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Get an exclusive reference to the value.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Unwrap the value, retiring the object.
    ///
    /// Teardown callbacks fire before this returns.
    pub fn into_inner(self) -> T {
        let Tethered { anchor, value } = self;
        drop(anchor);
        value
    }
}

impl<T> Anchored for Tethered<T> {
    fn anchor(&self) -> &Anchor {
        &self.anchor
    }
}

impl<T> Deref for Tethered<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for Tethered<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Tethered<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tethered")
            .field("id", &self.anchor.id())
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::TableConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_deref_passthrough() {
        let table = SideTable::new(TableConfig::minimal());
        let mut tethered = table.tether(vec![1, 2, 3]);

        assert_eq!(tethered.len(), 3);
        tethered.push(4);
        assert_eq!(tethered.get().len(), 4);
    }

    #[test]
    fn test_drop_fires_teardown() {
        let table = SideTable::new(TableConfig::minimal());
        let tethered = table.tether(5u8);

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);
        tethered.on_teardown(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        drop(tethered);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_into_inner_fires_teardown_and_returns_value() {
        let table = SideTable::new(TableConfig::minimal());
        let tethered = table.tether(String::from("payload"));

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);
        tethered.on_teardown(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        let value = tethered.into_inner();
        assert_eq!(value, "payload");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
