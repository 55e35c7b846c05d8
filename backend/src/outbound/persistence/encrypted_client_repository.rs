//! `ClientRepository` that seals identifying fields before they reach a
//! [`ClientRecordStore`].
//!
//! First name, last name and OIB are encrypted with the shared
//! [`FieldCipher`]; card status is stored as its upper-case name. Because the
//! cipher is deterministic, lookups encrypt the requested OIB and compare
//! ciphertexts.

use std::sync::Arc;

use async_trait::async_trait;
use field_cipher::{CipherError, FieldCipher};
use oib::Oib;
use tracing::{debug, warn};

use crate::domain::ports::{ClientRepository, ClientRepositoryError};
use crate::domain::{CardStatus, Client, ClientId, PersonName};

use super::record_store::{ClientRecordStore, RecordStoreError, SealedClient, StoredRecord};

/// Encrypting adapter over any record store.
pub struct EncryptedClientRepository<S> {
    store: S,
    cipher: Arc<FieldCipher>,
}

impl<S> EncryptedClientRepository<S> {
    /// Wrap `store`, sealing fields with `cipher`.
    pub fn new(store: S, cipher: Arc<FieldCipher>) -> Self {
        Self { store, cipher }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn seal_field(&self, plaintext: &str) -> Result<String, ClientRepositoryError> {
        self.cipher.encrypt(plaintext).map_err(map_encrypt_error)
    }

    fn open_field(
        &self,
        field: &'static str,
        ciphertext: &str,
    ) -> Result<String, ClientRepositoryError> {
        self.cipher.decrypt(ciphertext).map_err(|err| {
            warn!(field, error = %err, "stored field failed to decrypt");
            ClientRepositoryError::integrity(format!("{field}: {err}"))
        })
    }

    fn seal(&self, client: &Client) -> Result<SealedClient, ClientRepositoryError> {
        Ok(SealedClient {
            first_name: self.seal_field(client.first_name().as_ref())?,
            last_name: self.seal_field(client.last_name().as_ref())?,
            oib: self.seal_field(client.oib().as_str())?,
            card_status: client.status().as_str().to_owned(),
        })
    }

    fn open(&self, record: StoredRecord) -> Result<Client, ClientRepositoryError> {
        let StoredRecord { id, sealed } = record;
        let first_name = PersonName::new(self.open_field("first_name", &sealed.first_name)?)
            .map_err(|err| integrity("first_name", err))?;
        let last_name = PersonName::new(self.open_field("last_name", &sealed.last_name)?)
            .map_err(|err| integrity("last_name", err))?;
        let oib = Oib::parse(&self.open_field("oib", &sealed.oib)?)
            .map_err(|err| integrity("oib", err))?;
        let status = sealed
            .card_status
            .parse::<CardStatus>()
            .map_err(|err| integrity("card_status", err))?;
        Ok(Client::new(first_name, last_name, oib, status).with_id(ClientId::new(id)))
    }
}

fn integrity(field: &'static str, err: impl std::fmt::Display) -> ClientRepositoryError {
    warn!(field, error = %err, "stored field failed validation");
    ClientRepositoryError::integrity(format!("{field}: {err}"))
}

fn map_encrypt_error(error: CipherError) -> ClientRepositoryError {
    ClientRepositoryError::encryption(error.to_string())
}

/// Map record store errors to client repository errors.
fn map_store_error(error: RecordStoreError) -> ClientRepositoryError {
    match error {
        RecordStoreError::Connection { message } => ClientRepositoryError::unavailable(message),
        RecordStoreError::Duplicate { message } => ClientRepositoryError::duplicate(message),
        RecordStoreError::Missing { message } => ClientRepositoryError::missing(message),
        RecordStoreError::Query { message } => ClientRepositoryError::unavailable(message),
    }
}

#[async_trait]
impl<S> ClientRepository for EncryptedClientRepository<S>
where
    S: ClientRecordStore,
{
    async fn save(&self, client: &Client) -> Result<Client, ClientRepositoryError> {
        let sealed = self.seal(client)?;
        let stored = match client.id() {
            Some(id) => {
                self.store
                    .update(StoredRecord {
                        id: id.as_i64(),
                        sealed,
                    })
                    .await
            }
            None => self.store.insert(sealed).await,
        }
        .map_err(map_store_error)?;
        debug!(client_id = stored.id, "client row written");
        Ok(client.clone().with_id(ClientId::new(stored.id)))
    }

    async fn find_by_oib(&self, oib: &Oib) -> Result<Option<Client>, ClientRepositoryError> {
        let sealed_oib = self.seal_field(oib.as_str())?;
        self.store
            .find_by_oib(&sealed_oib)
            .await
            .map_err(map_store_error)?
            .map(|record| self.open(record))
            .transpose()
    }

    async fn delete_by_oib(&self, oib: &Oib) -> Result<bool, ClientRepositoryError> {
        let sealed_oib = self.seal_field(oib.as_str())?;
        self.store
            .delete_by_oib(&sealed_oib)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
#[path = "encrypted_client_repository_tests.rs"]
mod tests;
