//! PostgreSQL-backed [`ClientRecordStore`] using Diesel ORM.
//!
//! Uniqueness of the sealed identifier is enforced by the `clients_oib_key`
//! constraint, so racing inserts surface as unique violations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::models::{ClientFields, ClientRow};
use super::pool::{DbPool, PoolError};
use super::record_store::{ClientRecordStore, RecordStoreError, SealedClient, StoredRecord};
use super::schema::clients;

/// Diesel-backed implementation of the record store.
#[derive(Clone)]
pub struct DieselRecordStore {
    pool: DbPool,
}

impl DieselRecordStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecordStoreError {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Migration { message } => RecordStoreError::connection(message),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RecordStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RecordStoreError::duplicate("oib already stored")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecordStoreError::connection("database connection error")
        }
        DieselError::NotFound => RecordStoreError::missing("record not found"),
        DieselError::QueryBuilderError(_) => RecordStoreError::query("database query error"),
        _ => RecordStoreError::query("database error"),
    }
}

#[async_trait]
impl ClientRecordStore for DieselRecordStore {
    async fn insert(&self, sealed: SealedClient) -> Result<StoredRecord, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: ClientRow = diesel::insert_into(clients::table)
            .values(ClientFields::from(&sealed))
            .returning(ClientRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row.into())
    }

    async fn update(&self, record: StoredRecord) -> Result<StoredRecord, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ClientRow> = diesel::update(clients::table.find(record.id))
            .set(ClientFields::from(&record.sealed))
            .returning(ClientRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(StoredRecord::from)
            .ok_or_else(|| RecordStoreError::missing(format!("id {}", record.id)))
    }

    async fn find_by_oib(
        &self,
        sealed_oib: &str,
    ) -> Result<Option<StoredRecord>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ClientRow> = clients::table
            .filter(clients::oib.eq(sealed_oib))
            .select(ClientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(StoredRecord::from))
    }

    async fn delete_by_oib(&self, sealed_oib: &str) -> Result<bool, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(clients::table.filter(clients::oib.eq(sealed_oib)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
