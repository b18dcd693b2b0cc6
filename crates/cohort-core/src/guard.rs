//! Access guard — pure allow/deny decisions for privileged operations.
//!
//! The guard never performs I/O; callers fetch the actor and the owning
//! member id first, then ask for a [`Decision`]. Handlers invoke
//! [`authorize`] at the top of each privileged operation instead of hiding
//! the check inside routing scaffolding.

use serde::Serialize;

use crate::member::{Actor, Role};

/// Why a request was denied. The two reasons stay distinct so callers (and
/// tests) can tell a wrong role from a wrong owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
  RoleMismatch,
  OwnershipMismatch,
}

impl DenyReason {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::RoleMismatch => "role_mismatch",
      Self::OwnershipMismatch => "ownership_mismatch",
    }
  }
}

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Allow,
  Deny(DenyReason),
}

impl Decision {
  pub fn is_allowed(&self) -> bool { matches!(self, Self::Allow) }
}

/// What an operation requires of the acting identity.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
  /// The actor must hold exactly this role. The superuser presents as
  /// [`Role::Admin`], so it satisfies admin role checks by construction.
  Role(Role),
  /// The actor must own the resource. Admins get no bypass here; updates to
  /// someone else's resource are denied even for administrators.
  OwnerForUpdate { owner_id: i64 },
  /// The actor must own the resource, or hold the admin role. This is the
  /// only place the admin bypass applies. The superuser owns nothing and
  /// only ever passes through the role arm.
  OwnerForDelete { owner_id: i64 },
}

/// Decide whether `actor` may perform the operation described by `rule`.
pub fn authorize(actor: &Actor, rule: Rule) -> Decision {
  match rule {
    Rule::Role(required) => {
      if actor.role() == required {
        Decision::Allow
      } else {
        Decision::Deny(DenyReason::RoleMismatch)
      }
    }
    Rule::OwnerForUpdate { owner_id } => {
      if actor.id() == owner_id {
        Decision::Allow
      } else {
        Decision::Deny(DenyReason::OwnershipMismatch)
      }
    }
    Rule::OwnerForDelete { owner_id } => {
      if actor.id() == owner_id || actor.role() == Role::Admin {
        Decision::Allow
      } else {
        Decision::Deny(DenyReason::OwnershipMismatch)
      }
    }
  }
}
