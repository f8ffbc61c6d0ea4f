//! Object anchors and the extension surface.
//!
//! An [`Anchor`] is one object's registration in a side table: the handle
//! every association goes through, and the unique teardown authority.
//! Dropping the anchor retires the object - its teardown callbacks run
//! exactly once, then its associations are released.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::api::key::AssocKey;
use crate::api::policy::AssociationPolicy;
use crate::core::state::TableState;
use crate::core::value::{StoredEntry, StoredValue};

/// Identity of a registered object: slot index plus generation.
///
/// Stale ids never alias a reused slot - the generation is bumped each time
/// a slot is handed to a new object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ObjectId {
    /// Get the raw slot index (for debugging).
    pub fn raw_index(&self) -> u32 {
        self.index
    }

    /// Get the generation (for debugging).
    pub fn raw_generation(&self) -> u32 {
        self.generation
    }
}

/// RAII registration of one object in a side table.
///
/// The anchor is deliberately not `Clone`: exactly one owner decides when
/// the object is torn down.
pub struct Anchor {
    state: Arc<TableState>,
    id: ObjectId,
}

impl Anchor {
    pub(crate) fn new(state: Arc<TableState>, id: ObjectId) -> Self {
        Self { state, id }
    }

    /// Get this object's identity.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Run `callback` exactly once when this object is torn down.
    ///
    /// Multiple callbacks may be registered; each runs once, in
    /// registration order, before the object's associations are released.
    /// If the anchor is never dropped (process exit), callbacks may never
    /// run.
    pub fn on_teardown<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.state.push_teardown(self.id, Box::new(callback));
    }

    /// Store or replace the value under `key` according to `policy`.
    ///
    /// Passing `None` clears any existing entry. The previous entry under
    /// the key, if any, is released per its own stored form.
    pub fn associate<T>(&self, key: AssocKey, value: Option<&Arc<T>>, policy: AssociationPolicy)
    where
        T: Any + Send + Sync + Clone,
    {
        let entry = value.map(|value| StoredEntry {
            value: StoredValue::build(value, policy),
            policy,
        });
        self.state.associate(self.id, key, entry);
    }

    /// Retrieve the value previously associated under `key`.
    ///
    /// Returns `None` if nothing was ever set, the entry was cleared, an
    /// `Assign` entry's last owner dropped, or the stored value is of a
    /// different concrete type than `T`.
    pub fn associated<T>(&self, key: AssocKey) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.state
            .lookup(self.id, key)
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// Retrieve the value under `key`, inserting one built by `init` if
    /// absent.
    ///
    /// Lookup and insertion are two steps; under concurrent insertion the
    /// last writer wins, matching plain [`associate`](Self::associate)
    /// replacement semantics. With a `Copy*` policy the table holds a
    /// duplicate while the returned handle is the freshly built value.
    pub fn associated_or_insert_with<T, F>(
        &self,
        key: AssocKey,
        policy: AssociationPolicy,
        init: F,
    ) -> Arc<T>
    where
        T: Any + Send + Sync + Clone,
        F: FnOnce() -> T,
    {
        if let Some(existing) = self.associated::<T>(key) {
            return existing;
        }
        let value = Arc::new(init());
        self.associate(key, Some(&value), policy);
        value
    }

    /// Clear any entry under `key`.
    pub fn clear_association(&self, key: AssocKey) {
        self.state.associate(self.id, key, None);
    }

    /// Consume the anchor, retiring the object now.
    ///
    /// Equivalent to dropping it; teardown callbacks fire before this
    /// returns.
    pub fn retire(self) {}
}

impl Drop for Anchor {
    fn drop(&mut self) {
        self.state.retire(self.id);
    }
}

impl fmt::Debug for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anchor").field("id", &self.id).finish()
    }
}

/// Extension surface for types that carry an [`Anchor`].
///
/// Implement [`anchor`](Self::anchor) and the association and teardown
/// operations come along as methods.
pub trait Anchored {
    /// The anchor backing this object.
    fn anchor(&self) -> &Anchor;

    /// Run `callback` exactly once when this object is torn down.
    fn on_teardown<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.anchor().on_teardown(callback);
    }

    /// Store or replace the value under `key` according to `policy`.
    fn associate<T>(&self, key: AssocKey, value: Option<&Arc<T>>, policy: AssociationPolicy)
    where
        T: Any + Send + Sync + Clone,
    {
        self.anchor().associate(key, value, policy);
    }

    /// Retrieve the value previously associated under `key`.
    fn associated<T>(&self, key: AssocKey) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.anchor().associated(key)
    }

    /// Retrieve the value under `key`, inserting one built by `init` if
    /// absent.
    fn associated_or_insert_with<T, F>(
        &self,
        key: AssocKey,
        policy: AssociationPolicy,
        init: F,
    ) -> Arc<T>
    where
        T: Any + Send + Sync + Clone,
        F: FnOnce() -> T,
    {
        self.anchor().associated_or_insert_with(key, policy, init)
    }

    /// Clear any entry under `key`.
    fn clear_association(&self, key: AssocKey) {
        self.anchor().clear_association(key);
    }
}

impl Anchored for Anchor {
    fn anchor(&self) -> &Anchor {
        self
    }
}
