//! `veriflow-audit` — append-only audit trail for status transitions.
//!
//! Every state transition is recorded as an immutable fact tagged with actor
//! and cause. The trail is authoritative for compliance review and must never
//! be truncated or rewritten.

pub mod event;
pub mod in_memory;
pub mod r#trait;

pub use event::{AuditActor, AuditEvent, TransitionCause};
pub use in_memory::InMemoryAuditTrail;
pub use r#trait::{AuditError, AuditTrail};
