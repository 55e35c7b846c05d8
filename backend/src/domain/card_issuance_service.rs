//! Card issuance workflow.
//!
//! Looks a stored client up, submits it to the card issuer, classifies the
//! reply and publishes exactly one outcome notification per issuer call.
//! Notification failures are logged and never change the caller's result.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::client_registry_service::{map_repository_error, parse_identifier};
use crate::domain::ports::{CardIssuance, CardIssuer, ClientRepository, NotificationSink};
use crate::domain::{
    ApiError, Error, ISSUER_UNREACHABLE_MESSAGE, IssuanceOutcome, IssuanceReceipt,
    IssuanceRequest, IssuanceStage, IssuerReply,
};

/// Upper bound on how long a single notification publish may take.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_millis(250);

/// Issuance service wiring a repository, an issuer and a notification sink.
#[derive(Clone)]
pub struct CardIssuanceService<R, I, N> {
    repository: Arc<R>,
    issuer: Arc<I>,
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
    notify_timeout: Duration,
}

impl<R, I, N> CardIssuanceService<R, I, N> {
    /// Create a new issuance service.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use client_card::domain::CardIssuanceService;
    /// # use client_card::domain::ports::{CardIssuance, FixtureCardIssuer, NullNotificationSink};
    /// # use client_card::outbound::persistence::{EncryptedClientRepository, MemoryRecordStore};
    /// # use field_cipher::FieldCipher;
    /// # use mockable::DefaultClock;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let cipher = FieldCipher::from_secret("secret")?;
    /// let repository = EncryptedClientRepository::new(MemoryRecordStore::default(), Arc::new(cipher));
    /// let service = CardIssuanceService::new(
    ///     Arc::new(repository),
    ///     Arc::new(FixtureCardIssuer::default()),
    ///     Arc::new(NullNotificationSink),
    ///     Arc::new(DefaultClock),
    /// );
    /// let receipt = service.issue("12345678903").await?;
    /// println!("{}", receipt.message);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        repository: Arc<R>,
        issuer: Arc<I>,
        notifications: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            issuer,
            notifications,
            clock,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    /// Override the publish timeout.
    #[must_use]
    pub fn with_notify_timeout(mut self, notify_timeout: Duration) -> Self {
        self.notify_timeout = notify_timeout;
        self
    }
}

impl<R, I, N> CardIssuanceService<R, I, N>
where
    N: NotificationSink,
{
    async fn notify(&self, outcome: &IssuanceOutcome) {
        let oib = outcome.oib().masked();
        debug!(stage = %IssuanceStage::Notifying, %oib, "publishing issuance outcome");
        let message = outcome.to_string();
        match tokio::time::timeout(self.notify_timeout, self.notifications.publish(&message)).await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(%oib, error = %err, "issuance notification dropped"),
            Err(_) => warn!(
                %oib,
                timeout_ms = self.notify_timeout.as_millis(),
                "issuance notification timed out"
            ),
        }
    }
}

fn rejection(api_error: &ApiError) -> Error {
    let description = api_error.description_or_default();
    Error::issuer_rejected(format!("Error: {description}")).with_details(json!({
        "issuerCode": api_error.code,
        "issuerErrorId": api_error.id,
        "description": description,
    }))
}

#[async_trait]
impl<R, I, N> CardIssuance for CardIssuanceService<R, I, N>
where
    R: ClientRepository,
    I: CardIssuer,
    N: NotificationSink,
{
    async fn issue(&self, oib: &str) -> Result<IssuanceReceipt, Error> {
        debug!(stage = %IssuanceStage::Validating, "issuance requested");
        let oib = parse_identifier(oib)?;
        let masked = oib.masked();

        debug!(stage = %IssuanceStage::Lookup, oib = %masked);
        let client = self
            .repository
            .find_by_oib(&oib)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::client_not_found("Client not found"))?;

        debug!(stage = %IssuanceStage::BuildingRequest, oib = %masked);
        let request = IssuanceRequest::from(&client);

        debug!(stage = %IssuanceStage::CallingIssuer, oib = %masked);
        let reply = self.issuer.issue(&request).await;
        let now = self.clock.utc();

        let (outcome, result) = match reply {
            IssuerReply::Success { message } => {
                info!(oib = %masked, "card issuer accepted request");
                (
                    IssuanceOutcome::success(oib.clone(), message.clone(), now),
                    Ok(IssuanceReceipt { oib, message }),
                )
            }
            IssuerReply::ApiError(api_error) => {
                warn!(
                    oib = %masked,
                    code = ?api_error.code,
                    description = api_error.description_or_default(),
                    "card issuer rejected request"
                );
                (
                    IssuanceOutcome::failure(oib, api_error.description_or_default(), now),
                    Err(rejection(&api_error)),
                )
            }
            IssuerReply::TransportFailure { message } => {
                error!(oib = %masked, reason = %message, "card issuer unreachable");
                (
                    IssuanceOutcome::failure(oib, ISSUER_UNREACHABLE_MESSAGE, now),
                    Err(Error::issuer_unreachable(ISSUER_UNREACHABLE_MESSAGE)),
                )
            }
        };

        self.notify(&outcome).await;
        debug!(stage = %IssuanceStage::Done, oib = %masked, succeeded = outcome.succeeded());
        result
    }
}

#[cfg(test)]
#[path = "card_issuance_service_tests.rs"]
mod tests;
