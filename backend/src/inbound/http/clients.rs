//! Client and card issuance HTTP handlers.
//!
//! ```text
//! POST   /clients
//! GET    /clients/{oib}
//! DELETE /clients/{oib}
//! POST   /clients/send/{oib}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, error::JsonPayloadError, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::ClientRegistration;
use crate::domain::{CardStatus, Client, Error, IssuanceReceipt};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration payload. Fields are optional so that missing values are
/// reported alongside other validation failures.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    #[schema(example = "Ana")]
    pub first_name: Option<String>,
    #[schema(example = "Anić")]
    pub last_name: Option<String>,
    #[schema(example = "12345678903")]
    pub oib: Option<String>,
    #[schema(example = "ACCEPTED")]
    pub card_status: Option<String>,
}

/// Stored client as returned to callers.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub oib: String,
    pub card_status: CardStatus,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id().map(|id| id.as_i64()),
            first_name: client.first_name().to_string(),
            last_name: client.last_name().to_string(),
            oib: client.oib().to_string(),
            card_status: client.status(),
        }
    }
}

/// Result of a successful issuance.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct IssuanceResponse {
    #[schema(example = "12345678903")]
    pub oib: String,
    #[schema(example = "New card request successfully created.")]
    pub message: String,
}

impl From<IssuanceReceipt> for IssuanceResponse {
    fn from(receipt: IssuanceReceipt) -> Self {
        Self {
            oib: receipt.oib.to_string(),
            message: receipt.message,
        }
    }
}

/// JSON extractor configuration that reports malformed bodies as
/// `invalid_request` errors instead of plain-text 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        Error::invalid_request("Malformed request body")
            .with_details(json!({ "reason": err.to_string() }))
            .into()
    })
}

fn parse_client_request(payload: ClientRequest) -> Result<ClientRegistration, Error> {
    let status = payload
        .card_status
        .map(|raw| {
            raw.parse::<CardStatus>().map_err(|err| {
                Error::invalid_request("Invalid client data").with_details(json!({
                    "fieldErrors": { "cardStatus": err.to_string() },
                }))
            })
        })
        .transpose()?;

    Ok(ClientRegistration {
        first_name: payload.first_name.unwrap_or_default(),
        last_name: payload.last_name.unwrap_or_default(),
        oib: payload.oib.unwrap_or_default(),
        status,
    })
}

/// Register a new client.
#[utoipa::path(
    post,
    path = "/clients",
    request_body = ClientRequest,
    responses(
        (status = 201, description = "Client stored", body = ClientResponse),
        (status = 400, description = "Invalid client data", body = Error),
        (status = 409, description = "OIB already registered", body = Error),
        (status = 503, description = "Client store unavailable", body = Error)
    ),
    tags = ["clients"],
    operation_id = "createClient"
)]
#[post("/clients")]
pub async fn create_client(
    state: web::Data<HttpState>,
    payload: web::Json<ClientRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_client_request(payload.into_inner())?;
    let client = state.clients.register(registration).await?;
    Ok(HttpResponse::Created().json(ClientResponse::from(client)))
}

/// Fetch a client by OIB.
#[utoipa::path(
    get,
    path = "/clients/{oib}",
    params(("oib" = String, Path, description = "11-digit OIB")),
    responses(
        (status = 200, description = "Client found", body = ClientResponse),
        (status = 400, description = "Invalid OIB", body = Error),
        (status = 404, description = "Client not found", body = Error),
        (status = 500, description = "Stored data unreadable", body = Error)
    ),
    tags = ["clients"],
    operation_id = "getClient"
)]
#[get("/clients/{oib}")]
pub async fn get_client(
    state: web::Data<HttpState>,
    oib: web::Path<String>,
) -> ApiResult<web::Json<ClientResponse>> {
    let client = state.clients.find(&oib).await?;
    Ok(web::Json(ClientResponse::from(client)))
}

/// Delete a client by OIB.
#[utoipa::path(
    delete,
    path = "/clients/{oib}",
    params(("oib" = String, Path, description = "11-digit OIB")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 400, description = "Invalid OIB", body = Error),
        (status = 404, description = "Client not found", body = Error)
    ),
    tags = ["clients"],
    operation_id = "deleteClient"
)]
#[delete("/clients/{oib}")]
pub async fn delete_client(
    state: web::Data<HttpState>,
    oib: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.clients.remove(&oib).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Forward a stored client to the card issuer.
#[utoipa::path(
    post,
    path = "/clients/send/{oib}",
    params(("oib" = String, Path, description = "11-digit OIB")),
    responses(
        (status = 200, description = "Issuer accepted the request", body = IssuanceResponse),
        (status = 400, description = "Invalid OIB or issuer rejection", body = Error),
        (status = 404, description = "Client not found", body = Error),
        (status = 500, description = "Issuer unreachable", body = Error)
    ),
    tags = ["clients"],
    operation_id = "sendClient"
)]
#[post("/clients/send/{oib}")]
pub async fn send_client(
    state: web::Data<HttpState>,
    oib: web::Path<String>,
) -> ApiResult<web::Json<IssuanceResponse>> {
    let receipt = state.issuance.issue(&oib).await?;
    Ok(web::Json(IssuanceResponse::from(receipt)))
}

#[cfg(test)]
#[path = "clients_tests.rs"]
mod tests;
