//! Per-route access policy.
//!
//! Groups and permissions are OR-combined: a caller passes if its group is
//! allowed, or if it holds any allowed permission. A constraint that was never
//! set is skipped; one set to an empty list matches nobody.

use std::collections::BTreeSet;

use crate::api::v1::extractors::identity::Identity;

/// Immutable access predicate built once per route.
///
/// ```ignore
/// let policy = Policy::new()
///     .with_groups(["admin"])
///     .with_permissions(["reports:read"]);
/// assert!(policy.is_satisfied_by(&identity));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    allowed_groups: Option<BTreeSet<String>>,
    allowed_permissions: Option<BTreeSet<String>>,
}

impl Policy {
    /// Unrestricted: any authenticated caller passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the allowed groups.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the allowed permissions.
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_open(&self) -> bool {
        self.allowed_groups.is_none() && self.allowed_permissions.is_none()
    }

    pub fn is_satisfied_by(&self, identity: &Identity) -> bool {
        if self.is_open() {
            return true;
        }

        let group_ok = self
            .allowed_groups
            .as_ref()
            .is_some_and(|groups| groups.contains(&identity.group));
        let permission_ok = self
            .allowed_permissions
            .as_ref()
            .is_some_and(|allowed| identity.permissions.iter().any(|p| allowed.contains(p)));

        group_ok || permission_ok
    }
}
