//! Wire DTOs exchanged with the card issuer.

use serde::{Deserialize, Serialize};

use crate::domain::{ApiError, CardStatus, IssuanceRequest};

/// Request body, serialised as camelCase JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IssuanceRequestDto<'a> {
    pub(super) first_name: &'a str,
    pub(super) last_name: &'a str,
    pub(super) oib: &'a str,
    pub(super) status: CardStatus,
}

impl<'a> From<&'a IssuanceRequest> for IssuanceRequestDto<'a> {
    fn from(request: &'a IssuanceRequest) -> Self {
        Self {
            first_name: &request.first_name,
            last_name: &request.last_name,
            oib: request.oib.as_str(),
            status: request.status,
        }
    }
}

/// Success body.
#[derive(Debug, Deserialize)]
pub(super) struct IssuanceResponseDto {
    pub(super) message: Option<String>,
}

/// Structured error body. Every field may be absent.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub(super) code: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub(super) id: Option<String>,
    #[serde(default)]
    pub(super) description: Option<String>,
}

impl ApiErrorDto {
    /// Whether the body carried anything recognisable as an error payload.
    pub(super) fn is_empty(&self) -> bool {
        self.code.is_none() && self.id.is_none() && self.description.is_none()
    }
}

impl From<ApiErrorDto> for ApiError {
    fn from(dto: ApiErrorDto) -> Self {
        Self {
            code: dto.code,
            id: dto.id,
            description: dto.description,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}
