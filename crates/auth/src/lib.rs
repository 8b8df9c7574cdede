//! `veriflow-auth` — caller identity and access policy (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage: the engine
//! consumes an already-authenticated [`Actor`] produced by the surrounding
//! authentication layer and never issues or verifies session credentials.

pub mod actor;
pub mod policy;

pub use actor::{Actor, Role};
pub use policy::{can_read, can_submit, require_admin};
