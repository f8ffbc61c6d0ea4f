//! Association retention policies.
//!
//! The policy picked at `associate` time controls two things: how the table
//! holds the value (non-owning reference, shared ownership, or an owned
//! duplicate) and whether entry access is internally synchronized. It is
//! replaced wholesale along with the entry on reassignment.

/// How an associated value is held by the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationPolicy {
    /// Non-owning reference. Does not extend the value's lifetime; once the
    /// last outside owner drops, retrieval yields `None`.
    Assign,

    /// Shared ownership of the existing allocation, no duplication.
    RetainNonatomic,

    /// An owned duplicate made at association time. Later mutation of the
    /// original is invisible to retrieval.
    CopyNonatomic,

    /// Like `RetainNonatomic`, with entry replace/read linearized by the
    /// table.
    RetainAtomic,

    /// Like `CopyNonatomic`, with entry replace/read linearized by the
    /// table.
    CopyAtomic,
}

impl Default for AssociationPolicy {
    fn default() -> Self {
        Self::RetainNonatomic
    }
}

impl AssociationPolicy {
    /// Check if this policy guarantees synchronized entry access.
    ///
    /// Non-atomic policies are *permitted* to be unsynchronized; this table
    /// routes them through the same lock, which satisfies the contract.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Self::RetainAtomic | Self::CopyAtomic)
    }

    /// Check if association stores a duplicate instead of sharing.
    pub fn copies(&self) -> bool {
        matches!(self, Self::CopyNonatomic | Self::CopyAtomic)
    }

    /// Check if the table holds strong ownership of the stored value.
    pub fn owns(&self) -> bool {
        !matches!(self, Self::Assign)
    }

    /// Get the policy name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::RetainNonatomic => "retain-nonatomic",
            Self::CopyNonatomic => "copy-nonatomic",
            Self::RetainAtomic => "retain-atomic",
            Self::CopyAtomic => "copy-atomic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_kinds() {
        assert!(AssociationPolicy::RetainAtomic.is_atomic());
        assert!(AssociationPolicy::CopyAtomic.is_atomic());
        assert!(!AssociationPolicy::Assign.is_atomic());
        assert!(!AssociationPolicy::RetainNonatomic.is_atomic());
        assert!(!AssociationPolicy::CopyNonatomic.is_atomic());
    }

    #[test]
    fn test_ownership_kinds() {
        assert!(!AssociationPolicy::Assign.owns());
        assert!(AssociationPolicy::RetainNonatomic.owns());
        assert!(AssociationPolicy::CopyAtomic.owns());

        assert!(AssociationPolicy::CopyNonatomic.copies());
        assert!(AssociationPolicy::CopyAtomic.copies());
        assert!(!AssociationPolicy::RetainAtomic.copies());
    }

    #[test]
    fn test_names() {
        assert_eq!(AssociationPolicy::Assign.name(), "assign");
        assert_eq!(AssociationPolicy::CopyAtomic.name(), "copy-atomic");
    }
}
