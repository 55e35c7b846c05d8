//! Storage seam for encrypted client rows.
//!
//! Record stores only ever see ciphertext. Lookups compare the sealed
//! identifier byte for byte, which works because the field cipher is
//! deterministic.

use async_trait::async_trait;

use crate::domain::ports::define_port_error;

define_port_error! {
    /// Errors raised by record store backends.
    pub enum RecordStoreError {
        /// The backend could not be reached.
        Connection { message: String } => "record store connection failed: {message}",
        /// Another row already holds the sealed identifier.
        Duplicate { message: String } => "record already exists: {message}",
        /// The row targeted by an update does not exist.
        Missing { message: String } => "record not found: {message}",
        /// Any other backend failure.
        Query { message: String } => "record store query failed: {message}",
    }
}

/// Encrypted client fields as written to storage.
///
/// `card_status` stays in plaintext; it carries no personal data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedClient {
    pub first_name: String,
    pub last_name: String,
    pub oib: String,
    pub card_status: String,
}

/// A sealed row together with its surrogate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: i64,
    pub sealed: SealedClient,
}

/// Persistence backend for sealed client rows.
///
/// Every method is atomic with respect to the unique sealed identifier: two
/// concurrent inserts of the same `oib` yield one row and one
/// [`RecordStoreError::Duplicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRecordStore: Send + Sync {
    /// Insert a new row and return it with its assigned id.
    async fn insert(&self, sealed: SealedClient) -> Result<StoredRecord, RecordStoreError>;

    /// Overwrite the row with `record.id`.
    async fn update(&self, record: StoredRecord) -> Result<StoredRecord, RecordStoreError>;

    /// Fetch the row whose sealed identifier equals `sealed_oib`.
    async fn find_by_oib(&self, sealed_oib: &str)
    -> Result<Option<StoredRecord>, RecordStoreError>;

    /// Delete the row whose sealed identifier equals `sealed_oib`.
    async fn delete_by_oib(&self, sealed_oib: &str) -> Result<bool, RecordStoreError>;
}
