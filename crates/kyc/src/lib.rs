//! `veriflow-kyc` — the verification lifecycle and reconciliation engine.
//!
//! One entity (a per-user [`VerificationRecord`]), one external trust
//! relationship (the verification provider), four operations: submit,
//! initiate-with-provider, handle-callback, and admin sync/override. The
//! engine is constructed with injected collaborators (store, gateway,
//! verifier, audit trail) so the concurrency and testing story stays
//! explicit.

pub mod engine;
pub mod in_memory_store;
pub mod record;
pub mod redirect;
pub mod store;
pub mod submission;
pub mod webhook;

pub use engine::VerificationEngine;
pub use in_memory_store::InMemoryRecordStore;
pub use record::{ProviderOutcome, Transition, VerificationRecord};
pub use redirect::RedirectPolicy;
pub use store::{RecordStore, StoreError};
pub use submission::{CountryCode, DocumentType, SubmissionData, SubmissionRequest};
pub use webhook::CallbackPayload;
