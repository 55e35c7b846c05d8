//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request payload is malformed or fails validation.
    InvalidRequest,
    /// The identifier failed length, digit or checksum validation.
    InvalidIdentifier,
    /// No client is registered under the identifier.
    ClientNotFound,
    /// A client with the same identifier already exists.
    DuplicateIdentifier,
    /// Stored ciphertext could not be decrypted.
    MalformedCiphertext,
    /// The card issuer could not be reached or timed out.
    IssuerUnreachable,
    /// The card issuer answered with a structured rejection.
    IssuerRejected,
    /// The client store is unavailable.
    StoreUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

impl ErrorCode {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request",
            Self::InvalidIdentifier => "Invalid OIB",
            Self::ClientNotFound => "Client not found",
            Self::DuplicateIdentifier => "Client already exists",
            Self::MalformedCiphertext | Self::InternalError => "Internal server error",
            Self::IssuerUnreachable => "Error sending to API.",
            Self::IssuerRejected => "Card issuer rejected the request",
            Self::StoreUnavailable => "Client store unavailable",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `trace_id`, when present, is non-empty.
///
/// # Examples
/// ```
/// use client_card::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::ClientNotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::ClientNotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    #[schema(example = "client_not_found")]
    code: ErrorCode,
    #[schema(example = "Client not found")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was empty or whitespace only.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was empty or whitespace only.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

impl Error {
    /// Create a new error, capturing the trace identifier in scope.
    ///
    /// A blank `message` is replaced by a generic message for `code`.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Fallible constructor that rejects blank messages.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::new(code, message))
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was created.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use client_card::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::issuer_rejected("Error: Invalid data")
    ///     .with_details(json!({ "issuerCode": "400" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach a trace identifier, replacing any captured one.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach a trace identifier after checking it is non-empty.
    pub fn try_with_trace_id(self, id: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        Ok(self.with_trace_id(id))
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidIdentifier`].
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidIdentifier, message)
    }

    /// Convenience constructor for [`ErrorCode::ClientNotFound`].
    pub fn client_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ClientNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateIdentifier`].
    pub fn duplicate_identifier(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateIdentifier, message)
    }

    /// Convenience constructor for [`ErrorCode::MalformedCiphertext`].
    pub fn malformed_ciphertext(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedCiphertext, message)
    }

    /// Convenience constructor for [`ErrorCode::IssuerUnreachable`].
    pub fn issuer_unreachable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IssuerUnreachable, message)
    }

    /// Convenience constructor for [`ErrorCode::IssuerRejected`].
    pub fn issuer_rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IssuerRejected, message)
    }

    /// Convenience constructor for [`ErrorCode::StoreUnavailable`].
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            trace_id,
            details,
        } = value;

        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        if trace_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        // Deserialised payloads keep their own trace id rather than the
        // ambient one.
        Ok(Self {
            code,
            message,
            trace_id,
            details,
        })
    }
}
