//! Contains database models and interaction code for the student profile store.
pub mod models;
use crate::constants::db as constants;
use sqlx::postgres::PgPoolOptions;

/// An alias for the underlying DBMS specific pool type.
pub type ConnectionPool = sqlx::PgPool;

/// Initiate a pooled connection to the student profile database. This service
/// only ever reads student records; enrolment tooling owns the writes.
pub async fn connect() -> Result<ConnectionPool, errors::DatabaseError> {
    Ok(PgPoolOptions::new()
        .max_connections(*constants::DB_MAX_CONNECTIONS)
        .connect(&constants::DB_URL)
        .await?)
}

pub mod errors {
    use thiserror::Error;

    /// A profile store failure. Callers surface this as a storage outage.
    #[derive(Error, Debug)]
    #[error(transparent)]
    pub struct DatabaseError(#[from] sqlx::Error);
}
