//! Client persistence adapters.
//!
//! [`EncryptedClientRepository`] implements the domain's `ClientRepository`
//! port and seals identifying fields before handing rows to a
//! [`ClientRecordStore`]. Two stores exist:
//!
//! - [`DieselRecordStore`]: PostgreSQL via Diesel with `diesel-async` and
//!   `bb8` pooling. Migrations are embedded and applied at startup.
//! - [`MemoryRecordStore`]: process-local map used when no database is
//!   configured and in tests.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.
//!
//! # Example
//!
//! ```ignore
//! use client_card::outbound::persistence::{DbPool, DieselRecordStore, PoolConfig};
//!
//! let pool = DbPool::migrated(PoolConfig::new("postgres://localhost/clients")).await?;
//! let store = DieselRecordStore::new(pool);
//! ```

mod diesel_record_store;
mod encrypted_client_repository;
mod memory_record_store;
mod models;
mod pool;
pub mod record_store;
mod schema;

pub use diesel_record_store::DieselRecordStore;
pub use encrypted_client_repository::EncryptedClientRepository;
pub use memory_record_store::MemoryRecordStore;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use record_store::{ClientRecordStore, RecordStoreError, SealedClient, StoredRecord};
