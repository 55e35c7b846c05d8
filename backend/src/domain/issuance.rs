//! Card issuance values exchanged between the workflow and its ports.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use oib::Oib;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CardStatus, Client};

/// Description used when the issuer answers success without a usable body.
pub const MALFORMED_ISSUER_RESPONSE: &str = "Malformed response from card issuer";

/// Description used when the issuer rejects without a usable error body.
pub const UNDESCRIBED_ISSUER_ERROR: &str = "Card issuer returned an error without a description";

/// Message returned to callers when the issuer cannot be reached.
pub const ISSUER_UNREACHABLE_MESSAGE: &str = "Error sending to API.";

/// Request sent to the card issuer, derived from one stored client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceRequest {
    pub first_name: String,
    pub last_name: String,
    pub oib: Oib,
    pub status: CardStatus,
}

impl From<&Client> for IssuanceRequest {
    fn from(client: &Client) -> Self {
        Self {
            first_name: client.first_name().to_string(),
            last_name: client.last_name().to_string(),
            oib: client.oib().clone(),
            status: client.status(),
        }
    }
}

/// Structured error payload returned by the card issuer. Every field is
/// optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: Option<String>,
    pub id: Option<String>,
    pub description: Option<String>,
}

impl ApiError {
    /// Build an error carrying only a description.
    pub fn described(code: Option<String>, description: impl Into<String>) -> Self {
        Self {
            code,
            id: None,
            description: Some(description.into()),
        }
    }

    /// Issuer description, or a generic one when absent or blank.
    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(UNDESCRIBED_ISSUER_ERROR)
    }
}

/// Classified result of one call to the card issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuerReply {
    /// The issuer accepted the request and returned a message.
    Success { message: String },
    /// The issuer answered with a structured rejection.
    ApiError(ApiError),
    /// No usable answer: timeout, connection failure or server-side fault.
    TransportFailure { message: String },
}

/// One issuance attempt as reported to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceOutcome {
    oib: Oib,
    succeeded: bool,
    message: String,
    timestamp: DateTime<Utc>,
}

impl IssuanceOutcome {
    /// Outcome for an accepted request.
    pub fn success(oib: Oib, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            oib,
            succeeded: true,
            message: message.into(),
            timestamp,
        }
    }

    /// Outcome for a rejected or failed request.
    pub fn failure(oib: Oib, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            oib,
            succeeded: false,
            message: message.into(),
            timestamp,
        }
    }

    pub fn oib(&self) -> &Oib {
        &self.oib
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Renders the text published to the notification channel.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use client_card::domain::IssuanceOutcome;
/// use oib::Oib;
///
/// let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
/// let oib = Oib::parse("12345678903").unwrap();
/// let outcome = IssuanceOutcome::success(oib, "created", at);
/// assert_eq!(
///     outcome.to_string(),
///     "API response for OIB: 12345678903 -> created @ 2026-01-02T03:04:05Z"
/// );
/// ```
impl fmt::Display for IssuanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.succeeded {
            "API response for OIB"
        } else {
            "Error while sending data to API for OIB"
        };
        write!(
            f,
            "{prefix}: {} -> {} @ {}",
            self.oib,
            self.message,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Result returned to callers of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceReceipt {
    pub oib: Oib,
    pub message: String,
}

/// Steps of the issuance workflow, recorded on log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceStage {
    Validating,
    Lookup,
    BuildingRequest,
    CallingIssuer,
    Notifying,
    Done,
}

impl IssuanceStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Lookup => "lookup",
            Self::BuildingRequest => "building_request",
            Self::CallingIssuer => "calling_issuer",
            Self::Notifying => "notifying",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for IssuanceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
