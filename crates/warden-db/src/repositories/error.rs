//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use warden_core::error::DomainError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Bit-cast a slice of ids for a `BIGINT[]` bind
pub fn ids_to_db(ids: &[warden_core::Snowflake]) -> Vec<i64> {
    ids.iter().map(|id| id.to_db()).collect()
}
