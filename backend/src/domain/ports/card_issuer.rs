//! Port for the external card-issuance service.

use async_trait::async_trait;

use crate::domain::{IssuanceRequest, IssuerReply};

/// Sends issuance requests to the card issuer.
///
/// Adapters never return an error: every failure is classified into an
/// [`IssuerReply`] variant so the workflow can decide what to surface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardIssuer: Send + Sync {
    /// Submit one request and classify the answer.
    async fn issue(&self, request: &IssuanceRequest) -> IssuerReply;
}

/// Issuer that accepts every request with a fixed message.
#[derive(Debug, Clone)]
pub struct FixtureCardIssuer {
    message: String,
}

impl FixtureCardIssuer {
    /// Build a fixture replying with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FixtureCardIssuer {
    fn default() -> Self {
        Self::new("New card request successfully created.")
    }
}

#[async_trait]
impl CardIssuer for FixtureCardIssuer {
    async fn issue(&self, _request: &IssuanceRequest) -> IssuerReply {
        IssuerReply::Success {
            message: self.message.clone(),
        }
    }
}
