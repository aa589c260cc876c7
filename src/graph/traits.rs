//! Core traits for graph database abstraction.
//!
//! This module defines the trait hierarchy that backends must implement:
//!
//! - [`CypherExecutor`] - Run Cypher inside a transaction
//! - [`Transaction`] - Transaction lifecycle management
//! - [`GraphClient`] - Connection pool and transaction creation

use async_trait::async_trait;

use crate::error::AppError;
use crate::graph::cursor::Cursor;
use crate::graph::row::Params;

/// Executes Cypher queries against a graph database.
#[async_trait]
pub trait CypherExecutor: Send {
    /// Executes a Cypher query and returns a cursor over the result records.
    ///
    /// The cursor borrows the executor, so only one result can be open at
    /// a time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Query`] if the database rejects the query.
    async fn execute_cypher(&mut self, cypher: &str, params: Params)
        -> Result<Cursor<'_>, AppError>;
}

/// Transaction lifecycle management.
///
/// Both operations consume the transaction, so it is finalized at most once.
#[async_trait]
pub trait Transaction: CypherExecutor {
    /// Commits the transaction, making all changes permanent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Commit`] if the database refuses the commit.
    async fn commit(self) -> Result<(), AppError>;

    /// Rolls back the transaction, discarding all changes.
    async fn rollback(self) -> Result<(), AppError>;
}

/// A graph database client that can begin transactions.
///
/// Implementations typically wrap a connection pool.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// The transaction type returned by this client.
    type Tx: Transaction;

    /// Begins a new transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Connection`] if no transaction can be opened.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut txn = client.begin().await?;
    /// txn.execute_cypher("CREATE (n:Node {id: $id})", params).await?;
    /// txn.commit().await?;
    /// ```
    async fn begin(&self) -> Result<Self::Tx, AppError>;
}
