//! Port for client persistence.
//!
//! The domain hands plaintext [`Client`] values to this port. Implementations
//! own whatever at-rest representation they use; callers never see it.

use async_trait::async_trait;
use oib::Oib;

use crate::domain::Client;

use super::define_port_error;

define_port_error! {
    /// Errors raised by client repository adapters.
    pub enum ClientRepositoryError {
        /// The backing store could not be reached.
        Unavailable { message: String } =>
            "client store unavailable: {message}",
        /// Another client already holds the identifier.
        Duplicate { message: String } =>
            "client already exists: {message}",
        /// Stored data could not be decrypted or decoded.
        Integrity { message: String } =>
            "stored client data is unreadable: {message}",
        /// A field could not be encrypted for storage.
        Encryption { message: String } =>
            "client data could not be encrypted: {message}",
        /// An update targeted a key that no longer exists.
        Missing { message: String } =>
            "client record is missing: {message}",
    }
}

/// Port for client storage keyed by national identifier.
///
/// At most one client exists per identifier. Concurrent saves of the same
/// identifier resolve to exactly one success; the others receive
/// [`ClientRepositoryError::Duplicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Insert a client without an id, or update the one whose id is set.
    ///
    /// Returns the stored client with its id assigned.
    async fn save(&self, client: &Client) -> Result<Client, ClientRepositoryError>;

    /// Fetch the client registered under `oib`, if any.
    async fn find_by_oib(&self, oib: &Oib) -> Result<Option<Client>, ClientRepositoryError>;

    /// Remove the client registered under `oib`.
    ///
    /// Returns `false` when there was nothing to delete.
    async fn delete_by_oib(&self, oib: &Oib) -> Result<bool, ClientRepositoryError>;
}
