//! Backend entry-point: loads settings, wires adapters and serves the client
//! card REST API.

mod server;

use std::time::Duration;

use actix_web::web;
use client_card::inbound::http::health::HealthState;
use client_card::outbound::persistence::{DbPool, PoolConfig};
use client_card::settings::AppSettings;
use field_cipher::FieldCipher;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};

const CONSUMER_DRAIN: Duration = Duration::from_secs(1);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let cipher = FieldCipher::from_env()
        .map_err(|e| std::io::Error::other(format!("field cipher unavailable: {e}")))?;

    let mut config = ServerConfig::from_settings(&settings)?;
    if let Some(url) = settings.database_url() {
        let pool = DbPool::migrated(PoolConfig::new(url))
            .await
            .map_err(|e| std::io::Error::other(format!("database setup failed: {e}")))?;
        config = config.with_db_pool(pool);
    }

    let (sink, consumer) = config.notification_channel();
    let consumer_task = consumer.spawn();

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting client card service");
    let server = create_server(health_state, config, cipher, sink)?;
    let outcome = server.await;

    match tokio::time::timeout(CONSUMER_DRAIN, consumer_task).await {
        Ok(Ok(consumed)) => info!(consumed, "card status consumer finished"),
        Ok(Err(e)) => warn!(error = %e, "card status consumer task failed"),
        Err(_) => warn!("card status consumer still draining at shutdown"),
    }
    outcome
}
