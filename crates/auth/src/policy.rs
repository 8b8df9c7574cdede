//! Stateless access-policy predicates.
//!
//! These are enforced at the operation boundary (before any store access),
//! keeping the engine auth-agnostic in its transition logic.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy checks)

use veriflow_core::{DomainError, DomainResult, UserId};

use crate::Actor;

/// May `actor` read the verification record owned by `owner`?
///
/// Owners read their own record; admins read any record.
pub fn can_read(actor: &Actor, owner: UserId) -> bool {
    actor.id == owner || actor.is_admin()
}

/// May `actor` submit (or resubmit) the record owned by `owner`?
///
/// Submission is owner-only: admins correct records through the override
/// path, which is separately audited, not by impersonating the owner.
pub fn can_submit(actor: &Actor, owner: UserId) -> bool {
    actor.id == owner
}

/// Guard for admin-only operations.
pub fn require_admin(actor: &Actor) -> DomainResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}
