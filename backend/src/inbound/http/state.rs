//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CardIssuance, ClientRegistry};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub clients: Arc<dyn ClientRegistry>,
    pub issuance: Arc<dyn CardIssuance>,
}

impl HttpState {
    /// Bundle the client registry and issuance use-cases.
    pub fn new(clients: Arc<dyn ClientRegistry>, issuance: Arc<dyn CardIssuance>) -> Self {
        Self { clients, issuance }
    }
}
