//! Type-erased stored values.
//!
//! The table holds every associated value behind `dyn Any`; the policy
//! picked at association time decides whether the entry owns the value.

use std::any::Any;
use std::sync::{Arc, Weak};

use crate::api::policy::AssociationPolicy;

/// Type-erased value as stored in the table.
pub(crate) type AnyValue = dyn Any + Send + Sync;

/// Stored form of one association.
pub(crate) enum StoredValue {
    /// Non-owning (`Assign`): dead once the last strong owner drops.
    Assigned(Weak<AnyValue>),
    /// Owning (`Retain*` / `Copy*`): shared handle or duplicate per policy.
    Owned(Arc<AnyValue>),
}

impl StoredValue {
    /// Build the stored form of `value` under `policy`.
    ///
    /// `Copy*` duplicates the pointee here; `Retain*` shares the caller's
    /// allocation; `Assign` downgrades without taking ownership.
    pub(crate) fn build<T>(value: &Arc<T>, policy: AssociationPolicy) -> Self
    where
        T: Any + Send + Sync + Clone,
    {
        match policy {
            AssociationPolicy::Assign => {
                let weak: Weak<AnyValue> = Arc::downgrade(value);
                Self::Assigned(weak)
            }
            AssociationPolicy::CopyNonatomic | AssociationPolicy::CopyAtomic => {
                let duplicate: Arc<AnyValue> = Arc::new((**value).clone());
                Self::Owned(duplicate)
            }
            AssociationPolicy::RetainNonatomic | AssociationPolicy::RetainAtomic => {
                let shared: Arc<AnyValue> = Arc::clone(value);
                Self::Owned(shared)
            }
        }
    }

    /// Get a strong handle to the stored value, if still alive.
    pub(crate) fn get(&self) -> Option<Arc<AnyValue>> {
        match self {
            Self::Assigned(weak) => weak.upgrade(),
            Self::Owned(arc) => Some(Arc::clone(arc)),
        }
    }
}

/// One association entry: the stored value plus the policy that created it.
pub(crate) struct StoredEntry {
    pub value: StoredValue,
    pub policy: AssociationPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_does_not_extend_lifetime() {
        let value = Arc::new(7u32);
        let stored = StoredValue::build(&value, AssociationPolicy::Assign);

        assert!(stored.get().is_some());
        drop(value);
        assert!(stored.get().is_none());
    }

    #[test]
    fn test_retain_shares_the_allocation() {
        let value = Arc::new(String::from("shared"));
        let stored = StoredValue::build(&value, AssociationPolicy::RetainNonatomic);

        let held = stored.get().unwrap().downcast::<String>().ok().unwrap();
        assert!(Arc::ptr_eq(&held, &value));
    }

    #[test]
    fn test_copy_duplicates_the_allocation() {
        let value = Arc::new(String::from("duplicated"));
        let stored = StoredValue::build(&value, AssociationPolicy::CopyAtomic);

        let held = stored.get().unwrap().downcast::<String>().ok().unwrap();
        assert!(!Arc::ptr_eq(&held, &value));
        assert_eq!(*held, *value);
    }

    #[test]
    fn test_owned_survives_caller_drop() {
        let value = Arc::new(11u64);
        let stored = StoredValue::build(&value, AssociationPolicy::RetainAtomic);

        drop(value);
        let held = stored.get().unwrap().downcast::<u64>().ok().unwrap();
        assert_eq!(*held, 11);
    }
}
