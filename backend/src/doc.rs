//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the client, issuance and health endpoints together
//! with the domain schemas they return. The document backs Swagger UI in
//! debug builds and is exported by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::{ApiError, CardStatus, Error, ErrorCode};
use crate::inbound::http::clients::{ClientRequest, ClientResponse, IssuanceResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Client card API",
        description = "Register card applicants and forward them to the card issuer."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::clients::create_client,
        crate::inbound::http::clients::get_client,
        crate::inbound::http::clients::delete_client,
        crate::inbound::http::clients::send_client,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ClientRequest,
        ClientResponse,
        IssuanceResponse,
        CardStatus,
        ApiError,
        Error,
        ErrorCode
    )),
    tags(
        (name = "clients", description = "Client registration and card issuance"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
