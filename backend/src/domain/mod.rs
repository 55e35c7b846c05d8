//! Domain primitives, services and ports.
//!
//! Purpose: define the client-card model and the two use-cases built on it.
//! Types stay immutable once validated and document their serialisation
//! contracts (serde) in their own Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Client (alias to `client::Client`): a validated card applicant.
//! - ClientRegistryService: save, find and delete clients.
//! - CardIssuanceService: forward a stored client to the card issuer.

pub mod card_issuance_service;
pub mod client;
pub mod client_registry_service;
pub mod error;
pub mod issuance;
pub mod ports;
pub mod trace_id;

pub use self::card_issuance_service::{CardIssuanceService, DEFAULT_NOTIFY_TIMEOUT};
pub use self::client::{
    CardStatus, Client, ClientId, NAME_MAX, NAME_MIN, NameValidationError, PersonName,
    UnknownCardStatus,
};
pub use self::client_registry_service::ClientRegistryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::issuance::{
    ApiError, ISSUER_UNREACHABLE_MESSAGE, IssuanceOutcome, IssuanceReceipt, IssuanceRequest,
    IssuanceStage, IssuerReply, MALFORMED_ISSUER_RESPONSE, UNDESCRIBED_ISSUER_ERROR,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
