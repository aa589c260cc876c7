//! Forward-only result cursors and query summaries.

use std::time::{Duration, Instant};

use futures::StreamExt;
use serde::Serialize;

use crate::error::AppError;
use crate::graph::row::{Row, RowStream};

/// Metadata about a completed query.
///
/// Obtained on a best-effort basis by [`Cursor::consume`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The Cypher text that was executed.
    pub query: String,
    /// Number of bound parameters.
    pub parameters: usize,
    /// Records streamed from the server, including ones drained on consume.
    pub records: u64,
    /// Time from execution until the first record (or end of stream) was available.
    pub available_after: Option<Duration>,
    /// Time from execution until the stream was exhausted.
    pub consumed_after: Duration,
}

/// A lazy, forward-only sequence of records produced by executing a query.
///
/// Wraps a backend [`RowStream`] and keeps the bookkeeping needed to build
/// a [`Summary`] once the stream is consumed.
pub struct Cursor<'a> {
    rows: RowStream<'a>,
    query: String,
    parameters: usize,
    started: Instant,
    available_after: Option<Duration>,
    records: u64,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over a stream of rows for the given query.
    pub fn new(query: impl Into<String>, parameters: usize, rows: RowStream<'a>) -> Self {
        Self {
            rows,
            query: query.into(),
            parameters,
            started: Instant::now(),
            available_after: None,
            records: 0,
        }
    }

    /// Advances the cursor, returning the next record or `None` at the end.
    pub async fn next(&mut self) -> Result<Option<Row>, AppError> {
        let row = self.rows.next().await.transpose()?;
        if self.available_after.is_none() {
            self.available_after = Some(self.started.elapsed());
        }
        if row.is_some() {
            self.records += 1;
        }
        Ok(row)
    }

    /// Number of records produced so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Drains any remaining records and returns the query summary.
    pub async fn consume(mut self) -> Result<Summary, AppError> {
        while self.next().await?.is_some() {}

        Ok(Summary {
            query: self.query,
            parameters: self.parameters,
            records: self.records,
            available_after: self.available_after,
            consumed_after: self.started.elapsed(),
        })
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("query", &self.query)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}
