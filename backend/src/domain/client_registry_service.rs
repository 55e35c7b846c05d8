//! Client registration domain service.
//!
//! Implements the [`ClientRegistry`] driving port on top of any
//! [`ClientRepository`]. Validation happens here so repositories only ever
//! see well-formed clients.

use std::sync::Arc;

use async_trait::async_trait;
use oib::Oib;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::domain::ports::{
    ClientRegistration, ClientRegistry, ClientRepository, ClientRepositoryError,
};
use crate::domain::{Client, Error, PersonName};

/// Client registry backed by a repository port.
pub struct ClientRegistryService<R> {
    repository: Arc<R>,
}

impl<R> Clone for ClientRegistryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> ClientRegistryService<R> {
    /// Create a new service over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

/// Parse a caller-supplied identifier, reporting failures as
/// [`crate::domain::ErrorCode::InvalidIdentifier`].
pub(crate) fn parse_identifier(raw: &str) -> Result<Oib, Error> {
    Oib::parse(raw).map_err(|err| {
        debug!(reason = %err, "identifier rejected");
        Error::invalid_identifier("Invalid OIB").with_details(json!({
            "field": "oib",
            "reason": err.to_string(),
        }))
    })
}

/// Translate repository failures into domain errors.
pub(crate) fn map_repository_error(error: ClientRepositoryError) -> Error {
    match error {
        ClientRepositoryError::Unavailable { message } => {
            Error::store_unavailable(format!("client store unavailable: {message}"))
        }
        ClientRepositoryError::Duplicate { .. } => {
            Error::duplicate_identifier("Client with this OIB already exists")
        }
        ClientRepositoryError::Integrity { message } => {
            Error::malformed_ciphertext(format!("stored client data is unreadable: {message}"))
        }
        ClientRepositoryError::Encryption { message } => {
            Error::internal(format!("client data could not be encrypted: {message}"))
        }
        ClientRepositoryError::Missing { .. } => Error::client_not_found("Client not found"),
    }
}

fn validate(registration: ClientRegistration) -> Result<Client, Error> {
    let ClientRegistration {
        first_name,
        last_name,
        oib,
        status,
    } = registration;

    let mut field_errors = Map::new();
    let first_name = PersonName::new(first_name)
        .map_err(|err| field_errors.insert("firstName".to_owned(), err.to_string().into()))
        .ok();
    let last_name = PersonName::new(last_name)
        .map_err(|err| field_errors.insert("lastName".to_owned(), err.to_string().into()))
        .ok();
    let oib = Oib::parse(&oib)
        .map_err(|err| field_errors.insert("oib".to_owned(), err.to_string().into()))
        .ok();
    if status.is_none() {
        field_errors.insert(
            "cardStatus".to_owned(),
            Value::from("card status must not be null"),
        );
    }

    match (first_name, last_name, oib, status) {
        (Some(first_name), Some(last_name), Some(oib), Some(status)) => {
            Ok(Client::new(first_name, last_name, oib, status))
        }
        _ => {
            debug!(fields = ?field_errors.keys().collect::<Vec<_>>(), "registration rejected");
            Err(Error::invalid_request("Invalid client data")
                .with_details(json!({ "fieldErrors": field_errors })))
        }
    }
}

#[async_trait]
impl<R> ClientRegistry for ClientRegistryService<R>
where
    R: ClientRepository,
{
    async fn register(&self, registration: ClientRegistration) -> Result<Client, Error> {
        let client = validate(registration)?;
        let saved = self
            .repository
            .save(&client)
            .await
            .map_err(map_repository_error)?;
        info!(
            client_id = ?saved.id(),
            oib = %saved.oib().masked(),
            status = %saved.status(),
            "client registered"
        );
        Ok(saved)
    }

    async fn find(&self, oib: &str) -> Result<Client, Error> {
        let oib = parse_identifier(oib)?;
        match self
            .repository
            .find_by_oib(&oib)
            .await
            .map_err(map_repository_error)?
        {
            Some(client) => Ok(client),
            None => {
                debug!(oib = %oib.masked(), "client not found");
                Err(Error::client_not_found("Client not found"))
            }
        }
    }

    async fn remove(&self, oib: &str) -> Result<(), Error> {
        let oib = parse_identifier(oib)?;
        let deleted = self
            .repository
            .delete_by_oib(&oib)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            info!(oib = %oib.masked(), "client deleted");
            Ok(())
        } else {
            debug!(oib = %oib.masked(), "nothing to delete");
            Err(Error::client_not_found("Client not found"))
        }
    }
}

#[cfg(test)]
#[path = "client_registry_service_tests.rs"]
mod tests;
