//! Application error types.

use thiserror::Error;

/// Errors returned by sessions, templates and backends.
///
/// Every variant is recoverable by the caller. Nothing is retried at this
/// layer.
#[derive(Error, Debug)]
pub enum AppError {
    // Driver errors
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {message}")]
    Query { message: String, query: String },

    #[error("Failed to commit transaction: {0}")]
    Commit(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    // Cardinality errors
    #[error("Query for {label} returned no records")]
    EmptyResult { label: String },

    #[error("Query for {label} returned more than one record")]
    MultipleResults { label: String },

    // Mapping errors
    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true for the wrong-cardinality errors of single-record queries.
    pub fn is_cardinality(&self) -> bool {
        matches!(
            self,
            AppError::EmptyResult { .. } | AppError::MultipleResults { .. }
        )
    }
}
