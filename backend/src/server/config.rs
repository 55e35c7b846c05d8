//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use client_card::domain::DEFAULT_NOTIFY_TIMEOUT;
use client_card::outbound::persistence::DbPool;
use client_card::outbound::queue::{CardStatusConsumer, ChannelNotificationSink, card_status_channel};
use client_card::settings::AppSettings;
use url::Url;

/// Resolved configuration for creating the HTTP server and its adapters.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) api_url: Url,
    pub(crate) issuer_timeout: Duration,
    pub(crate) notification_topic: String,
    pub(crate) notification_capacity: usize,
    pub(crate) notify_timeout: Duration,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration with default adapter tuning.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, api_url: Url) -> Self {
        Self {
            bind_addr,
            api_url,
            issuer_timeout: Duration::from_secs(5),
            notification_topic: "card-status-topic".to_owned(),
            notification_capacity: 256,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
            db_pool: None,
        }
    }

    /// Resolve a configuration from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] when the issuer URL or bind address is
    /// malformed.
    pub fn from_settings(settings: &AppSettings) -> std::io::Result<Self> {
        let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
        let api_url = settings.api_url().map_err(std::io::Error::other)?;
        Ok(Self {
            issuer_timeout: settings.issuer_timeout(),
            notification_topic: settings.notification_topic().to_owned(),
            notification_capacity: settings.notification_capacity(),
            notify_timeout: settings.notify_timeout(),
            ..Self::new(bind_addr, api_url)
        })
    }

    /// Attach a database connection pool.
    ///
    /// When provided, client records are persisted in PostgreSQL instead of
    /// the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Open the card status channel on the configured topic and capacity.
    #[must_use]
    pub fn notification_channel(&self) -> (ChannelNotificationSink, CardStatusConsumer) {
        card_status_channel(self.notification_topic.as_str(), self.notification_capacity)
    }
}
