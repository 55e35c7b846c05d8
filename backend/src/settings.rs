//! Application settings loaded via OrthoConfig.
//!
//! Values come from `CLIENT_CARD_*` environment variables, CLI flags or an
//! optional config file. Numeric knobs carry concrete defaults so the
//! defaults layer is never empty; string fields fall back in their
//! accessors. The field encryption key is absent here and is read from
//! `ENC_KEY` by the cipher itself.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8081/api/v1/cards";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_NOTIFICATION_TOPIC: &str = "card-status-topic";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid issuer url `{value}`: {source}")]
    ApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Runtime configuration for the client card service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLIENT_CARD")]
pub struct AppSettings {
    /// Card issuer endpoint.
    pub api_url: Option<String>,
    /// Issuer request timeout in milliseconds.
    #[ortho_config(default = 5000)]
    pub issuer_timeout_ms: u64,
    /// PostgreSQL connection URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// HTTP listen address.
    pub bind_addr: Option<String>,
    /// Topic label attached to card status notifications.
    pub notification_topic: Option<String>,
    /// Bounded notification channel size.
    #[ortho_config(default = 256)]
    pub notification_capacity: usize,
    /// Upper bound on a single notification publish.
    #[ortho_config(default = 250)]
    pub notify_timeout_ms: u64,
}

impl AppSettings {
    /// Return the issuer endpoint, falling back to the local default.
    pub fn api_url(&self) -> Result<Url, SettingsError> {
        let value = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Url::parse(value).map_err(|source| SettingsError::ApiUrl {
            value: value.to_owned(),
            source,
        })
    }

    pub fn issuer_timeout(&self) -> Duration {
        Duration::from_millis(self.issuer_timeout_ms)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// Return the listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn notification_topic(&self) -> &str {
        self.notification_topic
            .as_deref()
            .unwrap_or(DEFAULT_NOTIFICATION_TOPIC)
    }

    pub fn notification_capacity(&self) -> usize {
        self.notification_capacity
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }
}
