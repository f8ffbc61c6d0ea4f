//! Synchronization primitives.
//!
//! Provides thin wrappers over std or parking_lot locks.

pub(crate) mod mutex;
