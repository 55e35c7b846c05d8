//! Helpers shared by the PostgreSQL-backed integration suites.

pub mod pg_embed;

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

/// Render a `postgres` error including the server message and SQLSTATE.
///
/// The plain `Display` output collapses most server errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    match error.as_db_error() {
        Some(db) => {
            let mut rendered = format!("postgres error {:?}: {}", db.code(), db.message());
            if let Some(detail) = db.detail() {
                rendered.push_str("; detail: ");
                rendered.push_str(detail);
            }
            rendered
        }
        None => error.to_string(),
    }
}

/// Create an empty database on the cluster and return its URL.
pub fn create_database(cluster: &TestCluster) -> Result<String, String> {
    let name = format!("client_card_{}", Uuid::new_v4().simple());
    let admin_url = cluster.connection().database_url("postgres");
    let mut admin = Client::connect(&admin_url, NoTls).map_err(|e| format_postgres_error(&e))?;
    admin
        .batch_execute(&format!(r#"CREATE DATABASE "{name}""#))
        .map_err(|e| format_postgres_error(&e))?;
    Ok(cluster.connection().database_url(&name))
}

/// Whether `SKIP_TEST_CLUSTER` asks for cluster-backed tests to be skipped.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .is_ok_and(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Skip when the environment allows it, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        return None;
    }
    panic!("embedded PostgreSQL unavailable: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
}
