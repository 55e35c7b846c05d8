//! Client card service library.
//!
//! Stores card applicants with their identifying fields encrypted at rest
//! and forwards them to an external card issuer on request.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
