//! Driving port for registering, reading and removing clients.

use async_trait::async_trait;

use crate::domain::{CardStatus, Client, Error};

/// Unvalidated registration input as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRegistration {
    pub first_name: String,
    pub last_name: String,
    pub oib: String,
    pub status: Option<CardStatus>,
}

/// Client management use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Validate and store a new client.
    async fn register(&self, registration: ClientRegistration) -> Result<Client, Error>;

    /// Look a client up by identifier.
    async fn find(&self, oib: &str) -> Result<Client, Error>;

    /// Delete a client by identifier.
    async fn remove(&self, oib: &str) -> Result<(), Error>;
}
