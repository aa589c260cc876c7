//! Typed query execution over a session.

use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::AppError;
use crate::graph::cursor::Summary;
use crate::graph::label::default_label;
use crate::graph::mapper::Mapper;
use crate::graph::request::Request;
use crate::graph::session::{Conn, TxContext};
use crate::graph::traits::{CypherExecutor, GraphClient, Transaction};

/// Records mapped by [`Template::query`] together with the query summary.
#[derive(Debug, Clone)]
pub struct QueryResult<T> {
    /// One mapped value per record, in the order the cursor produced them.
    pub records: Vec<T>,
    /// Best-effort metadata; `None` if the cursor could not be consumed.
    pub summary: Option<Summary>,
}

impl<T> QueryResult<T> {
    /// Discards the summary and returns the mapped records.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

/// Runs Cypher requests on a session and maps the records to `T`.
///
/// Each call uses the session's ambient transaction when one is active.
/// Otherwise it opens its own and commits it on success or rolls it back
/// on any failure, including a panicking mapper. Requests are logged at
/// debug level together with the template label.
///
/// # Example
///
/// ```ignore
/// let mut conn = Conn::new(client);
/// let mut people = Template::<Person, _>::new(&mut conn);
///
/// let all = people
///     .query(&request!("MATCH (p:Person) RETURN p.name AS name"), mapper::row())
///     .await?
///     .into_records();
///
/// let ada = people
///     .query_single(
///         &request!("MATCH (p:Person {name: $name}) RETURN p.name AS name", name = "Ada"),
///         mapper::row(),
///     )
///     .await?;
/// ```
pub struct Template<'c, T, C: GraphClient> {
    conn: &'c mut Conn<C>,
    label: String,
    _marker: PhantomData<fn() -> T>,
}

impl<'c, T, C: GraphClient> Template<'c, T, C> {
    /// Creates a template labelled after the bare name of `T`.
    pub fn new(conn: &'c mut Conn<C>) -> Self {
        Self::with_label(conn, default_label::<T>())
    }

    /// Creates a template with an explicit label.
    pub fn with_label(conn: &'c mut Conn<C>, label: impl Into<String>) -> Self {
        Self {
            conn,
            label: label.into(),
            _marker: PhantomData,
        }
    }

    /// The label used in logs and cardinality errors.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Executes the request and maps every record through `mapper`.
    ///
    /// An empty result yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a blank query; no transaction is opened
    /// - [`AppError::Connection`] if no transaction could be obtained
    /// - [`AppError::Query`] if the database rejects the query
    /// - any error returned by `mapper`
    /// - [`AppError::Commit`] if an owned transaction fails to commit
    pub async fn query<M>(
        &mut self,
        request: &Request,
        mapper: M,
    ) -> Result<QueryResult<T>, AppError>
    where
        M: Mapper<T>,
    {
        ensure_not_blank(request)?;
        tracing::debug!(label = %self.label, query = request.query(), "executing query");

        let mut ctx = self.conn.transaction().await?;
        let outcome = AssertUnwindSafe(collect_all(ctx.tx(), request, mapper))
            .catch_unwind()
            .await;
        settle(ctx, outcome).await
    }

    /// Executes the request and maps exactly one record through `mapper`.
    ///
    /// # Errors
    ///
    /// Same as [`query`](Template::query), plus [`AppError::EmptyResult`]
    /// when there is no record and [`AppError::MultipleResults`] when there
    /// is more than one. An owned transaction is rolled back, not committed,
    /// in both cases. The value mapped from the first record is dropped
    /// when the query returns more than one record.
    pub async fn query_single<M>(&mut self, request: &Request, mapper: M) -> Result<T, AppError>
    where
        M: Mapper<T>,
    {
        ensure_not_blank(request)?;
        tracing::debug!(
            label = %self.label,
            query = request.query(),
            "executing single-record query"
        );

        let mut ctx = self.conn.transaction().await?;
        let outcome = AssertUnwindSafe(collect_one(ctx.tx(), request, mapper, &self.label))
            .catch_unwind()
            .await;
        settle(ctx, outcome).await
    }
}

fn ensure_not_blank(request: &Request) -> Result<(), AppError> {
    if request.is_blank() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }
    Ok(())
}

async fn collect_all<E, T, M>(
    tx: &mut E,
    request: &Request,
    mut mapper: M,
) -> Result<QueryResult<T>, AppError>
where
    E: CypherExecutor,
    M: Mapper<T>,
{
    let mut cursor = tx
        .execute_cypher(request.query(), request.params().clone())
        .await?;

    let mut records = Vec::new();
    while let Some(row) = cursor.next().await? {
        records.push(mapper.map(row)?);
    }

    let summary = cursor.consume().await.ok();
    Ok(QueryResult { records, summary })
}

async fn collect_one<E, T, M>(
    tx: &mut E,
    request: &Request,
    mut mapper: M,
    label: &str,
) -> Result<T, AppError>
where
    E: CypherExecutor,
    M: Mapper<T>,
{
    let mut cursor = tx
        .execute_cypher(request.query(), request.params().clone())
        .await?;

    let row = cursor.next().await?.ok_or_else(|| AppError::EmptyResult {
        label: label.to_string(),
    })?;
    let value = mapper.map(row)?;

    if cursor.next().await?.is_some() {
        return Err(AppError::MultipleResults {
            label: label.to_string(),
        });
    }
    Ok(value)
}

/// Finalizes the transaction for the outcome of one executor call.
///
/// A panic rolls back an owned transaction before unwinding resumes.
async fn settle<X, R>(
    ctx: TxContext<'_, X>,
    outcome: std::thread::Result<Result<R, AppError>>,
) -> Result<R, AppError>
where
    X: Transaction,
{
    let owned = ctx.is_owned();
    match outcome {
        Ok(Ok(value)) => {
            ctx.finish(true).await?;
            Ok(value)
        }
        Ok(Err(err)) => {
            tracing::debug!(owned, error = %err, "query failed, rolling back");
            ctx.finish(false).await?;
            Err(err)
        }
        Err(panic) => {
            let _ = ctx.finish(false).await;
            std::panic::resume_unwind(panic)
        }
    }
}
