//! End-to-end behaviour of the registry and issuance workflow over the
//! encrypting in-memory store and the card status channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client_card::domain::ports::{CardIssuance, CardIssuer, ClientRegistration, ClientRegistry};
use client_card::domain::{
    ApiError, CardIssuanceService, CardStatus, ClientRegistryService, ErrorCode, IssuanceRequest,
    IssuerReply,
};
use client_card::outbound::persistence::{EncryptedClientRepository, MemoryRecordStore};
use client_card::outbound::queue::{CardStatusConsumer, card_status_channel};
use field_cipher::FieldCipher;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const OIB: &str = "12345678903";
const SECRET: &str = "workflow-test-secret";

/// Issuer double replying with a fixed answer and recording every request.
struct ScriptedIssuer {
    reply: IssuerReply,
    calls: AtomicUsize,
    requests: Mutex<Vec<IssuanceRequest>>,
}

impl ScriptedIssuer {
    fn new(reply: IssuerReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardIssuer for ScriptedIssuer {
    async fn issue(&self, request: &IssuanceRequest) -> IssuerReply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.reply.clone()
    }
}

type Repository = EncryptedClientRepository<MemoryRecordStore>;

struct Harness {
    repository: Arc<Repository>,
    registry: ClientRegistryService<Repository>,
    issuance: CardIssuanceService<
        Repository,
        ScriptedIssuer,
        client_card::outbound::queue::ChannelNotificationSink,
    >,
    issuer: Arc<ScriptedIssuer>,
    consumer: CardStatusConsumer,
}

fn harness(reply: IssuerReply) -> Harness {
    let cipher = Arc::new(FieldCipher::from_secret(SECRET).expect("cipher"));
    let repository = Arc::new(EncryptedClientRepository::new(
        MemoryRecordStore::default(),
        cipher,
    ));
    let issuer = Arc::new(ScriptedIssuer::new(reply));
    let (sink, consumer) = card_status_channel("card-status-topic", 8);
    Harness {
        registry: ClientRegistryService::new(Arc::clone(&repository)),
        issuance: CardIssuanceService::new(
            Arc::clone(&repository),
            Arc::clone(&issuer),
            Arc::new(sink),
            Arc::new(DefaultClock),
        ),
        repository,
        issuer,
        consumer,
    }
}

#[fixture]
fn ana() -> ClientRegistration {
    ClientRegistration {
        first_name: "Ana".to_owned(),
        last_name: "Anić".to_owned(),
        oib: OIB.to_owned(),
        status: Some(CardStatus::Accepted),
    }
}

#[rstest]
#[tokio::test]
async fn registered_client_can_be_found_and_removed(ana: ClientRegistration) {
    let h = harness(IssuerReply::Success {
        message: "unused".to_owned(),
    });

    let stored = h.registry.register(ana).await.expect("register");
    assert!(stored.id().is_some());

    let found = h.registry.find(OIB).await.expect("find");
    assert_eq!(found.first_name().to_string(), "Ana");
    assert_eq!(found.last_name().to_string(), "Anić");
    assert_eq!(found.status(), CardStatus::Accepted);

    h.registry.remove(OIB).await.expect("remove");
    let err = h.registry.find(OIB).await.expect_err("gone");
    assert_eq!(err.code(), ErrorCode::ClientNotFound);
}

#[rstest]
#[tokio::test]
async fn stored_rows_never_contain_plaintext(ana: ClientRegistration) {
    let h = harness(IssuerReply::Success {
        message: "unused".to_owned(),
    });
    h.registry.register(ana).await.expect("register");

    let rows = h.repository.store().rows().expect("rows");
    assert_eq!(rows.len(), 1);
    let sealed = &rows[0].sealed;
    for column in [&sealed.first_name, &sealed.last_name, &sealed.oib] {
        assert!(!column.contains(OIB));
        assert!(!column.contains("Anić"));
    }
    assert_eq!(sealed.card_status, "ACCEPTED");
}

#[rstest]
#[tokio::test]
async fn successful_issuance_publishes_exactly_one_notification(ana: ClientRegistration) {
    let mut h = harness(IssuerReply::Success {
        message: "New card request successfully created.".to_owned(),
    });
    h.registry.register(ana).await.expect("register");

    let receipt = h.issuance.issue(OIB).await.expect("issue");

    assert_eq!(receipt.message, "New card request successfully created.");
    assert_eq!(h.issuer.calls(), 1);
    let sent = h.issuer.requests.lock().expect("requests lock").clone();
    assert_eq!(sent[0].first_name, "Ana");
    assert_eq!(sent[0].oib.as_str(), OIB);

    let message = h.consumer.recv().await.expect("notification");
    assert!(message.payload.starts_with(&format!(
        "API response for OIB: {OIB} -> New card request successfully created. @ "
    )));
    drop(h.issuance);
    assert!(h.consumer.recv().await.is_none());
}

#[rstest]
#[tokio::test]
async fn rejected_issuance_reports_issuer_description(ana: ClientRegistration) {
    let mut h = harness(IssuerReply::ApiError(ApiError {
        code: Some("400".to_owned()),
        id: None,
        description: Some("Invalid data".to_owned()),
    }));
    h.registry.register(ana).await.expect("register");

    let err = h.issuance.issue(OIB).await.expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::IssuerRejected);
    assert_eq!(err.message(), "Error: Invalid data");
    let message = h.consumer.recv().await.expect("notification");
    assert!(message.payload.starts_with(&format!(
        "Error while sending data to API for OIB: {OIB} -> Invalid data @ "
    )));
    drop(h.issuance);
    assert!(h.consumer.recv().await.is_none());
}

#[rstest]
#[tokio::test]
async fn unknown_client_never_reaches_the_issuer() {
    let mut h = harness(IssuerReply::Success {
        message: "unused".to_owned(),
    });

    let err = h.issuance.issue(OIB).await.expect_err("missing");

    assert_eq!(err.code(), ErrorCode::ClientNotFound);
    assert_eq!(h.issuer.calls(), 0);
    drop(h.issuance);
    assert!(h.consumer.recv().await.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_registrations_of_one_oib_store_a_single_record(ana: ClientRegistration) {
    let h = harness(IssuerReply::Success {
        message: "unused".to_owned(),
    });
    let second = ClientRegistration {
        first_name: "Ivo".to_owned(),
        ..ana.clone()
    };

    let tasks = [ana, second].map(|registration| {
        let registry = h.registry.clone();
        tokio::spawn(async move { registry.register(registration).await })
    });
    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        outcomes.push(task.await.expect("registration task"));
    }
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|r| {
            r.as_ref()
                .is_err_and(|e| e.code() == ErrorCode::DuplicateIdentifier)
        })
        .count();
    assert_eq!((successes, duplicates), (1, 1));
    assert_eq!(h.repository.store().len().expect("len"), 1);
}
