//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;

use super::record_store::{SealedClient, StoredRecord};
use super::schema::clients;

/// Row struct for reading from the clients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClientRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub oib: String,
    pub card_status: String,
}

impl From<ClientRow> for StoredRecord {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            sealed: SealedClient {
                first_name: row.first_name,
                last_name: row.last_name,
                oib: row.oib,
                card_status: row.card_status,
            },
        }
    }
}

/// Insertable and changeset struct for writing client rows.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = clients)]
pub(crate) struct ClientFields<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub oib: &'a str,
    pub card_status: &'a str,
}

impl<'a> From<&'a SealedClient> for ClientFields<'a> {
    fn from(sealed: &'a SealedClient) -> Self {
        Self {
            first_name: &sealed.first_name,
            last_name: &sealed.last_name,
            oib: &sealed.oib,
            card_status: &sealed.card_status,
        }
    }
}
