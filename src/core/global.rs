//! Process-wide default table.

use std::sync::OnceLock;

use crate::api::config::TableConfig;
use crate::api::table::SideTable;
use crate::api::wrappers::Tethered;

static GLOBAL: OnceLock<SideTable> = OnceLock::new();

/// Get the process-wide default side table.
///
/// Created on first use with [`TableConfig::default`].
pub fn global() -> &'static SideTable {
    GLOBAL.get_or_init(|| SideTable::new(TableConfig::default()))
}

/// Tether `value` to the process-wide default table.
pub fn tether<T>(value: T) -> Tethered<T> {
    global().tether(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_is_shared() {
        let before = global().stats().objects_registered;
        let tethered = tether(1u8);
        assert_eq!(global().stats().objects_registered, before + 1);
        drop(tethered);
    }
}
