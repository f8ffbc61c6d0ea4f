//! # annex
//!
//! Identity-keyed side-channel storage and teardown hooks for any Rust object.
//!
//! ## Features
//!
//! - Associate arbitrary values with an object under opaque keys
//! - Five retention policies (assign / retain / copy, with atomic variants)
//! - Teardown callbacks that run exactly once when the object goes away
//! - Generation-checked slots (stale identities never alias reused storage)
//! - Opt-in lifecycle events and atomic statistics
//! - Process-wide default table, or as many explicit tables as you like
//!
//! ## Quick Start
//!
//! ```rust
//! use annex::{tether, Anchored, AssocKey, AssociationPolicy};
//! use std::sync::Arc;
//!
//! let label = AssocKey::new();
//!
//! let widget = tether(vec![1u32, 2, 3]);
//! widget.associate(
//!     label,
//!     Some(&Arc::new("hello".to_string())),
//!     AssociationPolicy::CopyNonatomic,
//! );
//! assert_eq!(widget.associated::<String>(label).as_deref().map(String::as_str), Some("hello"));
//!
//! widget.on_teardown(|| println!("widget gone"));
//! drop(widget); // prints, exactly once
//! ```

pub mod api;

mod core;
mod sync;

// Re-export public API at crate root for convenience
pub use api::anchor::{Anchor, Anchored, ObjectId};
pub use api::config::TableConfig;
pub use api::events::{EventHooks, TableEvent, TableEventCallback};
pub use api::key::AssocKey;
pub use api::policy::AssociationPolicy;
pub use api::stats::TableStats;
pub use api::table::SideTable;
pub use api::wrappers::Tethered;

// Process-wide default table
pub use crate::core::global::{global, tether};
