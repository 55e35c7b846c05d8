//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when the migrations change.

diesel::table! {
    /// Encrypted client records.
    ///
    /// `first_name`, `last_name` and `oib` hold base64 field ciphertext. The
    /// unique index on `oib` enforces one client per identifier.
    clients (id) {
        /// Surrogate key assigned by the database.
        id -> Int8,
        /// Sealed first name.
        first_name -> Text,
        /// Sealed last name.
        last_name -> Text,
        /// Sealed national identifier.
        oib -> Text,
        /// Card lifecycle state, stored as its upper-case name.
        card_status -> Varchar,
    }
}
