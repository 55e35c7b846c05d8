//! Builders wiring domain services to their outbound adapters.

use std::sync::Arc;

use actix_web::web;
use client_card::domain::ports::{CardIssuer, NotificationSink};
use client_card::domain::{CardIssuanceService, ClientRegistryService};
use client_card::inbound::http::state::HttpState;
use client_card::outbound::issuer::HttpCardIssuer;
use client_card::outbound::persistence::{
    ClientRecordStore, DieselRecordStore, EncryptedClientRepository, MemoryRecordStore,
};
use field_cipher::FieldCipher;
use mockable::DefaultClock;
use tracing::info;

use super::ServerConfig;

/// Wire the registry and issuance services over a single record store.
fn services_over<S, I, N>(
    store: S,
    cipher: Arc<FieldCipher>,
    issuer: Arc<I>,
    notifications: Arc<N>,
    config: &ServerConfig,
) -> HttpState
where
    S: ClientRecordStore + 'static,
    I: CardIssuer + 'static,
    N: NotificationSink + 'static,
{
    let repository = Arc::new(EncryptedClientRepository::new(store, cipher));
    let registry = ClientRegistryService::new(Arc::clone(&repository));
    let issuance = CardIssuanceService::new(
        repository,
        issuer,
        notifications,
        Arc::new(DefaultClock),
    )
    .with_notify_timeout(config.notify_timeout);
    HttpState::new(Arc::new(registry), Arc::new(issuance))
}

/// Build the handler state, choosing PostgreSQL when a pool is configured and
/// the in-memory store otherwise.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the issuer HTTP client cannot be built.
pub(crate) fn build_http_state<N>(
    config: &ServerConfig,
    cipher: FieldCipher,
    notifications: Arc<N>,
) -> std::io::Result<web::Data<HttpState>>
where
    N: NotificationSink + 'static,
{
    let cipher = Arc::new(cipher);
    let issuer = HttpCardIssuer::new(config.api_url.clone(), config.issuer_timeout)
        .map_err(|err| std::io::Error::other(format!("issuer client setup failed: {err}")))?;
    let issuer = Arc::new(issuer);

    let state = match &config.db_pool {
        Some(pool) => {
            info!("persisting clients in PostgreSQL");
            services_over(
                DieselRecordStore::new(pool.clone()),
                cipher,
                issuer,
                notifications,
                config,
            )
        }
        None => {
            info!("no database configured; persisting clients in memory");
            services_over(
                MemoryRecordStore::default(),
                cipher,
                issuer,
                notifications,
                config,
            )
        }
    };
    Ok(web::Data::new(state))
}
