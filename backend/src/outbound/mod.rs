//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: encrypting client repository over PostgreSQL (Diesel)
//!   or an in-memory record store
//! - **issuer**: reqwest client for the card-issuance service
//! - **queue**: bounded tokio channel carrying card status notifications
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod issuer;
pub mod persistence;
pub mod queue;
