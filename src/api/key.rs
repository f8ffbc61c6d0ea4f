//! Opaque association keys.
//!
//! A key is an identity token: two keys compare equal only if one was
//! copied from the other. The integer inside is issued from a process-wide
//! counter and never interpreted.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Identity token naming one association slot on an object.
///
/// Typically created once per concern and handed around by copy:
///
/// ```rust
/// use annex::AssocKey;
///
/// let highlight_color = AssocKey::new();
/// let click_count = AssocKey::new();
/// assert_ne!(highlight_color, click_count);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssocKey(u64);

impl AssocKey {
    /// Issue a key distinct from every other key in this process.
    pub fn new() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id (for debugging).
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for AssocKey {
    fn default() -> Self {
        Self::new()
    }
}
