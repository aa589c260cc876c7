//! Sessions and transaction context resolution.

use crate::error::AppError;
use crate::graph::traits::{GraphClient, Transaction};

/// A transaction resolved for a single executor call.
///
/// `Ambient` transactions belong to the session and are left untouched by
/// [`finish`](TxContext::finish). `Owned` transactions were opened for this
/// call and are committed or rolled back exactly once.
pub enum TxContext<'c, T> {
    Ambient(&'c mut T),
    Owned(T),
}

impl<'c, T: Transaction> TxContext<'c, T> {
    /// Returns true if the executor opened this transaction itself.
    pub fn is_owned(&self) -> bool {
        matches!(self, TxContext::Owned(_))
    }

    /// The transaction to run queries on.
    pub fn tx(&mut self) -> &mut T {
        match self {
            TxContext::Ambient(tx) => &mut **tx,
            TxContext::Owned(tx) => tx,
        }
    }

    /// Finalizes an owned transaction: commit on success, rollback otherwise.
    ///
    /// Ambient transactions are never finalized here. Rollback failures are
    /// swallowed since they must not mask the error that caused them.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Commit`] if committing fails.
    pub async fn finish(self, success: bool) -> Result<(), AppError> {
        match self {
            TxContext::Ambient(_) => Ok(()),
            TxContext::Owned(tx) if success => tx.commit().await.map_err(|e| match e {
                AppError::Commit(_) => e,
                other => AppError::Commit(other.to_string()),
            }),
            TxContext::Owned(tx) => {
                if let Err(e) = tx.rollback().await {
                    tracing::debug!(error = %e, "rollback failed");
                }
                Ok(())
            }
        }
    }
}

/// A logical session to the graph database.
///
/// The session never opens or closes connections itself; it owns a client
/// and, optionally, one ambient transaction started with [`begin`](Conn::begin).
/// Templates built over the session reuse that transaction instead of
/// opening their own.
///
/// # Example
///
/// ```ignore
/// let mut conn = Conn::new(Neo4jClient::connect(&config.neo4j).await?);
///
/// conn.begin().await?;
/// Template::<Person, _>::new(&mut conn).query(&create, mapper::raw()).await?;
/// Template::<Person, _>::new(&mut conn).query(&link, mapper::raw()).await?;
/// conn.commit().await?;
/// ```
pub struct Conn<C: GraphClient> {
    client: C,
    tx: Option<C::Tx>,
}

impl<C: GraphClient> Conn<C> {
    /// Creates a session over the given client with no active transaction.
    pub fn new(client: C) -> Self {
        Self { client, tx: None }
    }

    /// Returns a reference to the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns true if an ambient transaction is active.
    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Starts an ambient transaction on this session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transaction`] if one is already active, or
    /// [`AppError::Connection`] if the client cannot open one.
    pub async fn begin(&mut self) -> Result<(), AppError> {
        if self.tx.is_some() {
            return Err(AppError::Transaction(
                "a transaction is already active on this session".to_string(),
            ));
        }
        self.tx = Some(self.client.begin().await?);
        Ok(())
    }

    /// Commits the ambient transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transaction`] if there is no active transaction.
    pub async fn commit(&mut self) -> Result<(), AppError> {
        match self.tx.take() {
            Some(tx) => tx.commit().await,
            None => Err(AppError::Transaction(
                "no active transaction to commit".to_string(),
            )),
        }
    }

    /// Rolls back the ambient transaction. A no-op when none is active.
    pub async fn rollback(&mut self) -> Result<(), AppError> {
        match self.tx.take() {
            Some(tx) => tx.rollback().await,
            None => Ok(()),
        }
    }

    /// Resolves the transaction for one executor call.
    ///
    /// Reuses the ambient transaction when present, otherwise begins a new
    /// one owned by the caller. Begin failures are returned as-is, without
    /// retry.
    pub async fn transaction(&mut self) -> Result<TxContext<'_, C::Tx>, AppError> {
        if let Some(tx) = self.tx.as_mut() {
            return Ok(TxContext::Ambient(tx));
        }
        let tx = self.client.begin().await?;
        Ok(TxContext::Owned(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testing::{Event, MockClient};

    #[tokio::test]
    async fn test_transaction_owned_without_ambient() {
        let client = MockClient::new();
        let mut conn = Conn::new(client.clone());

        let ctx = conn.transaction().await.unwrap();
        assert!(ctx.is_owned());
        ctx.finish(true).await.unwrap();

        assert_eq!(client.events(), vec![Event::Begin, Event::Commit]);
    }

    #[tokio::test]
    async fn test_transaction_reuses_ambient() {
        let client = MockClient::new();
        let mut conn = Conn::new(client.clone());
        conn.begin().await.unwrap();

        let ctx = conn.transaction().await.unwrap();
        assert!(!ctx.is_owned());
        ctx.finish(true).await.unwrap();

        assert_eq!(client.events(), vec![Event::Begin]);
        assert!(conn.in_transaction());
    }

    #[tokio::test]
    async fn test_begin_failure_is_connection_error() {
        let client = MockClient::new();
        client.fail_begin("connection refused");
        let mut conn = Conn::new(client.clone());

        let result = conn.transaction().await;
        assert!(matches!(result, Err(AppError::Connection(_))));
    }

    #[tokio::test]
    async fn test_begin_twice_fails() {
        let mut conn = Conn::new(MockClient::new());
        conn.begin().await.unwrap();

        assert!(matches!(
            conn.begin().await,
            Err(AppError::Transaction(_))
        ));
    }

    #[tokio::test]
    async fn test_commit_without_transaction_fails() {
        let mut conn = Conn::new(MockClient::new());
        assert!(matches!(
            conn.commit().await,
            Err(AppError::Transaction(_))
        ));
    }

    #[tokio::test]
    async fn test_rollback_is_idempotent() {
        let client = MockClient::new();
        let mut conn = Conn::new(client.clone());
        conn.begin().await.unwrap();

        conn.rollback().await.unwrap();
        conn.rollback().await.unwrap();

        assert_eq!(client.events(), vec![Event::Begin, Event::Rollback]);
        assert!(!conn.in_transaction());
    }

    #[tokio::test]
    async fn test_finish_failure_swallows_rollback_error() {
        let client = MockClient::new();
        client.fail_rollback("already closed");
        let mut conn = Conn::new(client.clone());

        let ctx = conn.transaction().await.unwrap();
        assert!(ctx.finish(false).await.is_ok());
    }

    #[tokio::test]
    async fn test_finish_reports_commit_error() {
        let client = MockClient::new();
        client.fail_commit("constraint violated");
        let mut conn = Conn::new(client.clone());

        let ctx = conn.transaction().await.unwrap();
        assert!(matches!(
            ctx.finish(true).await,
            Err(AppError::Commit(_))
        ));
    }
}
