//! Tests for client HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use oib::Oib;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockCardIssuance, MockClientRegistry};
use crate::domain::{ClientId, ErrorCode, PersonName};

const OIB: &str = "12345678903";

fn stored_client() -> Client {
    Client::new(
        PersonName::new("Ana").expect("valid name"),
        PersonName::new("Anić").expect("valid name"),
        Oib::parse(OIB).expect("valid oib"),
        CardStatus::Accepted,
    )
    .with_id(ClientId::new(1))
}

fn test_app(
    clients: MockClientRegistry,
    issuance: MockCardIssuance,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(clients), Arc::new(issuance));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(create_client)
        .service(get_client)
        .service(delete_client)
        .service(send_client)
}

#[actix_web::test]
async fn create_client_returns_created_record() {
    let mut clients = MockClientRegistry::new();
    clients
        .expect_register()
        .withf(|registration: &ClientRegistration| {
            registration.first_name == "Ana"
                && registration.oib == OIB
                && registration.status == Some(CardStatus::Accepted)
        })
        .times(1)
        .return_once(|_| Ok(stored_client()));
    let app = actix_test::init_service(test_app(clients, MockCardIssuance::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/clients")
        .set_json(json!({
            "firstName": "Ana",
            "lastName": "Anić",
            "oib": OIB,
            "cardStatus": "ACCEPTED",
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({
            "id": 1,
            "firstName": "Ana",
            "lastName": "Anić",
            "oib": OIB,
            "cardStatus": "ACCEPTED",
        })
    );
}

#[actix_web::test]
async fn unknown_card_status_is_rejected_before_the_registry() {
    let mut clients = MockClientRegistry::new();
    clients.expect_register().times(0);
    let app = actix_test::init_service(test_app(clients, MockCardIssuance::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/clients")
        .set_json(json!({
            "firstName": "Ana",
            "lastName": "Anić",
            "oib": OIB,
            "cardStatus": "LOST",
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert!(body["details"]["fieldErrors"]["cardStatus"].is_string());
}

#[actix_web::test]
async fn malformed_json_maps_to_invalid_request() {
    let mut clients = MockClientRegistry::new();
    clients.expect_register().times(0);
    let app = actix_test::init_service(test_app(clients, MockCardIssuance::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/clients")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[case::duplicate(Error::duplicate_identifier("taken"), StatusCode::CONFLICT)]
#[case::invalid(Error::invalid_request("Invalid client data"), StatusCode::BAD_REQUEST)]
#[case::store(Error::store_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[actix_web::test]
async fn create_client_maps_registry_errors(#[case] error: Error, #[case] status: StatusCode) {
    let mut clients = MockClientRegistry::new();
    clients
        .expect_register()
        .times(1)
        .return_once(move |_| Err(error));
    let app = actix_test::init_service(test_app(clients, MockCardIssuance::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/clients")
        .set_json(json!({ "firstName": "Ana" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), status);
}

#[actix_web::test]
async fn get_client_returns_plaintext_record() {
    let mut clients = MockClientRegistry::new();
    clients
        .expect_find()
        .withf(|oib: &str| oib == OIB)
        .times(1)
        .return_once(|_| Ok(stored_client()));
    let app = actix_test::init_service(test_app(clients, MockCardIssuance::new())).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/clients/{OIB}"))
        .to_request();
    let body: ClientResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.oib, OIB);
    assert_eq!(body.last_name, "Anić");
}

#[rstest]
#[case::found(Ok(()), StatusCode::NO_CONTENT)]
#[case::missing(Err(Error::client_not_found("Client not found")), StatusCode::NOT_FOUND)]
#[case::invalid(Err(Error::invalid_identifier("Invalid OIB")), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn delete_client_statuses(#[case] outcome: Result<(), Error>, #[case] status: StatusCode) {
    let mut clients = MockClientRegistry::new();
    clients
        .expect_remove()
        .times(1)
        .return_once(move |_| outcome);
    let app = actix_test::init_service(test_app(clients, MockCardIssuance::new())).await;

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/clients/{OIB}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), status);
}

#[actix_web::test]
async fn send_client_echoes_issuer_message() {
    let mut issuance = MockCardIssuance::new();
    issuance
        .expect_issue()
        .withf(|oib: &str| oib == OIB)
        .times(1)
        .return_once(|_| {
            Ok(IssuanceReceipt {
                oib: Oib::parse(OIB).expect("valid oib"),
                message: "New card request successfully created.".to_owned(),
            })
        });
    let app = actix_test::init_service(test_app(MockClientRegistry::new(), issuance)).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/clients/send/{OIB}"))
        .to_request();
    let body: IssuanceResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.oib, OIB);
    assert_eq!(body.message, "New card request successfully created.");
}

#[rstest]
#[case::rejected(Error::issuer_rejected("Error: Invalid data"), StatusCode::BAD_REQUEST, ErrorCode::IssuerRejected)]
#[case::unreachable(
    Error::issuer_unreachable("Error sending to API."),
    StatusCode::INTERNAL_SERVER_ERROR,
    ErrorCode::IssuerUnreachable
)]
#[case::missing(Error::client_not_found("Client not found"), StatusCode::NOT_FOUND, ErrorCode::ClientNotFound)]
#[actix_web::test]
async fn send_client_maps_workflow_errors(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] code: ErrorCode,
) {
    let expected_message = error.message().to_owned();
    let mut issuance = MockCardIssuance::new();
    issuance
        .expect_issue()
        .times(1)
        .return_once(move |_| Err(error));
    let app = actix_test::init_service(test_app(MockClientRegistry::new(), issuance)).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/clients/send/{OIB}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), status);
    let body: Error = actix_test::read_body_json(response).await;
    assert_eq!(body.code(), code);
    assert_eq!(body.message(), expected_message);
}
