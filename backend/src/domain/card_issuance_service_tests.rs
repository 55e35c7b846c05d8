//! Tests for the card issuance workflow.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use oib::Oib;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    ClientRepositoryError, MockCardIssuer, MockClientRepository, MockNotificationSink,
    NotificationError,
};
use crate::domain::{CardStatus, Client, ClientId, ErrorCode, PersonName};

const OIB: &str = "12345678903";

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: Utc
            .with_ymd_and_hms(2026, 5, 4, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
    })
}

/// Sink that never finishes within any sensible timeout.
struct StalledSink;

#[async_trait]
impl NotificationSink for StalledSink {
    async fn publish(&self, _message: &str) -> Result<(), NotificationError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

fn stored_client() -> Client {
    Client::new(
        PersonName::new("Ana").expect("valid name"),
        PersonName::new("Anić").expect("valid name"),
        Oib::parse(OIB).expect("valid oib"),
        CardStatus::Accepted,
    )
    .with_id(ClientId::new(7))
}

fn repository_with_client() -> MockClientRepository {
    let mut repo = MockClientRepository::new();
    repo.expect_find_by_oib()
        .withf(|oib: &Oib| oib.as_str() == OIB)
        .times(1)
        .return_once(|_| Ok(Some(stored_client())));
    repo
}

fn issuer_replying(reply: IssuerReply) -> MockCardIssuer {
    let mut issuer = MockCardIssuer::new();
    issuer
        .expect_issue()
        .withf(|request: &IssuanceRequest| {
            request.oib.as_str() == OIB
                && request.first_name == "Ana"
                && request.last_name == "Anić"
                && request.status == CardStatus::Accepted
        })
        .times(1)
        .return_once(move |_| reply);
    issuer
}

fn sink_expecting(expected: &'static str) -> MockNotificationSink {
    let mut sink = MockNotificationSink::new();
    sink.expect_publish()
        .withf(move |message: &str| message == expected)
        .times(1)
        .return_once(|_| Ok(()));
    sink
}

fn make_service<N>(
    repo: MockClientRepository,
    issuer: MockCardIssuer,
    sink: N,
) -> CardIssuanceService<MockClientRepository, MockCardIssuer, N> {
    CardIssuanceService::new(
        Arc::new(repo),
        Arc::new(issuer),
        Arc::new(sink),
        fixture_clock(),
    )
}

#[tokio::test]
async fn success_returns_receipt_and_notifies_once() {
    let service = make_service(
        repository_with_client(),
        issuer_replying(IssuerReply::Success {
            message: "New card request successfully created.".to_owned(),
        }),
        sink_expecting(
            "API response for OIB: 12345678903 -> New card request successfully created. @ 2026-05-04T10:00:00Z",
        ),
    );

    let receipt = service.issue(OIB).await.expect("issuance succeeds");

    assert_eq!(receipt.oib.as_str(), OIB);
    assert_eq!(receipt.message, "New card request successfully created.");
}

#[tokio::test]
async fn issuer_rejection_surfaces_description() {
    let service = make_service(
        repository_with_client(),
        issuer_replying(IssuerReply::ApiError(ApiError {
            code: Some("400".to_owned()),
            id: Some("e-1".to_owned()),
            description: Some("Invalid data".to_owned()),
        })),
        sink_expecting(
            "Error while sending data to API for OIB: 12345678903 -> Invalid data @ 2026-05-04T10:00:00Z",
        ),
    );

    let error = service.issue(OIB).await.expect_err("issuer rejected");

    assert_eq!(error.code(), ErrorCode::IssuerRejected);
    assert_eq!(error.message(), "Error: Invalid data");
    let details = error.details().expect("details present");
    assert_eq!(details["issuerCode"], "400");
    assert_eq!(details["issuerErrorId"], "e-1");
}

#[tokio::test]
async fn transport_failure_reports_generic_message() {
    let service = make_service(
        repository_with_client(),
        issuer_replying(IssuerReply::TransportFailure {
            message: "connection refused".to_owned(),
        }),
        sink_expecting(
            "Error while sending data to API for OIB: 12345678903 -> Error sending to API. @ 2026-05-04T10:00:00Z",
        ),
    );

    let error = service.issue(OIB).await.expect_err("issuer unreachable");

    assert_eq!(error.code(), ErrorCode::IssuerUnreachable);
    assert_eq!(error.message(), ISSUER_UNREACHABLE_MESSAGE);
}

#[tokio::test]
async fn unknown_client_skips_issuer_and_notification() {
    let mut repo = MockClientRepository::new();
    repo.expect_find_by_oib().times(1).return_once(|_| Ok(None));
    let mut issuer = MockCardIssuer::new();
    issuer.expect_issue().times(0);
    let mut sink = MockNotificationSink::new();
    sink.expect_publish().times(0);

    let error = make_service(repo, issuer, sink)
        .issue(OIB)
        .await
        .expect_err("client missing");

    assert_eq!(error.code(), ErrorCode::ClientNotFound);
}

#[rstest]
#[case::short("1234")]
#[case::checksum("12345678901")]
#[case::letters("1234567890a")]
#[tokio::test]
async fn invalid_identifier_touches_nothing(#[case] raw: &str) {
    let mut repo = MockClientRepository::new();
    repo.expect_find_by_oib().times(0);
    let mut issuer = MockCardIssuer::new();
    issuer.expect_issue().times(0);
    let mut sink = MockNotificationSink::new();
    sink.expect_publish().times(0);

    let error = make_service(repo, issuer, sink)
        .issue(raw)
        .await
        .expect_err("invalid identifier");

    assert_eq!(error.code(), ErrorCode::InvalidIdentifier);
}

#[tokio::test]
async fn unreadable_record_is_reported_without_issuer_call() {
    let mut repo = MockClientRepository::new();
    repo.expect_find_by_oib()
        .times(1)
        .return_once(|_| Err(ClientRepositoryError::integrity("authentication failed")));
    let mut issuer = MockCardIssuer::new();
    issuer.expect_issue().times(0);
    let mut sink = MockNotificationSink::new();
    sink.expect_publish().times(0);

    let error = make_service(repo, issuer, sink)
        .issue(OIB)
        .await
        .expect_err("record unreadable");

    assert_eq!(error.code(), ErrorCode::MalformedCiphertext);
}

#[tokio::test]
async fn notification_failure_does_not_change_result() {
    let mut sink = MockNotificationSink::new();
    sink.expect_publish()
        .times(1)
        .return_once(|_| Err(NotificationError::rejected("queue full")));
    let service = make_service(
        repository_with_client(),
        issuer_replying(IssuerReply::Success {
            message: "ok".to_owned(),
        }),
        sink,
    );

    let receipt = service.issue(OIB).await.expect("issuance succeeds");

    assert_eq!(receipt.message, "ok");
}

#[tokio::test]
async fn stalled_notification_is_abandoned_after_timeout() {
    let service = make_service(
        repository_with_client(),
        issuer_replying(IssuerReply::Success {
            message: "ok".to_owned(),
        }),
        StalledSink,
    )
    .with_notify_timeout(Duration::from_millis(20));

    let receipt = tokio::time::timeout(Duration::from_secs(5), service.issue(OIB))
        .await
        .expect("issue returns before the outer timeout")
        .expect("issuance succeeds");

    assert_eq!(receipt.message, "ok");
}
