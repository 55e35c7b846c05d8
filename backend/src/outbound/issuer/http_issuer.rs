//! Reqwest-backed card issuer adapter.
//!
//! This adapter owns transport details only: request serialisation, the
//! request timeout and classification of every answer into an
//! [`IssuerReply`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{ApiErrorDto, IssuanceRequestDto, IssuanceResponseDto};
use crate::domain::ports::CardIssuer;
use crate::domain::{ApiError, IssuanceRequest, IssuerReply, MALFORMED_ISSUER_RESPONSE};

/// Card issuer reached over HTTP with one POST per request.
pub struct HttpCardIssuer {
    client: Client,
    endpoint: Url,
}

impl HttpCardIssuer {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let issuer = HttpCardIssuer::new(endpoint, Duration::from_secs(5))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl CardIssuer for HttpCardIssuer {
    async fn issue(&self, request: &IssuanceRequest) -> IssuerReply {
        let response = match self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&IssuanceRequestDto::from(request))
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => return map_transport_error(&error),
        };

        let status = response.status();
        match response.bytes().await {
            Ok(body) => classify(status, body.as_ref()),
            Err(error) => map_transport_error(&error),
        }
    }
}

fn classify(status: StatusCode, body: &[u8]) -> IssuerReply {
    if status.is_success() {
        return match serde_json::from_slice::<IssuanceResponseDto>(body) {
            Ok(IssuanceResponseDto {
                message: Some(message),
            }) if !message.trim().is_empty() => IssuerReply::Success { message },
            _ => {
                debug!(
                    status = status.as_u16(),
                    body = %body_preview(body),
                    "malformed issuer success body"
                );
                IssuerReply::ApiError(ApiError::described(
                    Some(status.as_u16().to_string()),
                    MALFORMED_ISSUER_RESPONSE,
                ))
            }
        };
    }

    match serde_json::from_slice::<ApiErrorDto>(body) {
        Ok(dto) if !dto.is_empty() => IssuerReply::ApiError(dto.into()),
        _ => map_status_error(status, body),
    }
}

fn map_transport_error(error: &reqwest::Error) -> IssuerReply {
    let message = if error.is_timeout() {
        format!("timed out: {error}")
    } else {
        error.to_string()
    };
    IssuerReply::TransportFailure { message }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IssuerReply {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    if status.is_client_error() {
        debug!(%message, "issuer rejected request without an error body");
        IssuerReply::ApiError(ApiError {
            code: Some(status.as_u16().to_string()),
            id: None,
            description: None,
        })
    } else {
        IssuerReply::TransportFailure { message }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
#[path = "http_issuer_tests.rs"]
mod tests;
