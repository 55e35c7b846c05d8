//! Driving port for forwarding a stored client to the card issuer.

use async_trait::async_trait;

use crate::domain::{Error, IssuanceReceipt};

/// Issuance use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardIssuance: Send + Sync {
    /// Look up the client registered under `oib`, submit it to the issuer
    /// and publish the outcome.
    async fn issue(&self, oib: &str) -> Result<IssuanceReceipt, Error>;
}
