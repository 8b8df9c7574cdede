//! `veriflow-provider` — the external verification-provider boundary.
//!
//! The provider is treated as an opaque capability behind a narrow contract:
//! start a hosted session, report current status by reference, and sign
//! callbacks. Everything vendor-specific (status vocabulary, signature
//! scheme) is normalized at this boundary so the engine never sees raw
//! vendor data.

pub mod gateway;
pub mod signature;
pub mod status;
pub mod vendor;

pub use gateway::{GatewayError, ProviderGateway, Session, StatusReport};
pub use signature::{SignatureError, WebhookVerifier};
pub use status::{map_vendor_status, ReportedStatus};
pub use vendor::{Provider, ProviderReference};
