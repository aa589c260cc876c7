//! Recording in-memory backend for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::AppError;
use crate::graph::cursor::Cursor;
use crate::graph::row::{Params, Row};
use crate::graph::traits::{CypherExecutor, GraphClient, Transaction};

/// Something the backend was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin,
    Run(String),
    Commit,
    Rollback,
}

/// Scripted outcome of one `execute_cypher` call.
#[derive(Debug, Clone)]
pub enum Response {
    Rows(Vec<Row>),
    /// Yields the rows, then a record fetch error.
    RowsThenFail(Vec<Row>, String),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockData {
    events: Vec<Event>,
    params: Vec<Params>,
    responses: VecDeque<Response>,
    begin_error: Option<String>,
    commit_error: Option<String>,
    rollback_error: Option<String>,
}

/// Mock graph client that records every lifecycle call.
#[derive(Clone, Default)]
pub struct MockClient {
    data: Arc<Mutex<MockData>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the rows returned by the next query.
    pub fn respond(&self, rows: Vec<Row>) -> &Self {
        self.data
            .lock()
            .unwrap()
            .responses
            .push_back(Response::Rows(rows));
        self
    }

    /// Makes the next query fail with the given message.
    pub fn respond_error(&self, message: &str) -> &Self {
        self.data
            .lock()
            .unwrap()
            .responses
            .push_back(Response::Fail(message.to_string()));
        self
    }

    /// Streams `rows` for the next query, then fails while fetching.
    pub fn respond_then_fail(&self, rows: Vec<Row>, message: &str) -> &Self {
        self.data
            .lock()
            .unwrap()
            .responses
            .push_back(Response::RowsThenFail(rows, message.to_string()));
        self
    }

    pub fn fail_begin(&self, message: &str) {
        self.data.lock().unwrap().begin_error = Some(message.to_string());
    }

    pub fn fail_commit(&self, message: &str) {
        self.data.lock().unwrap().commit_error = Some(message.to_string());
    }

    pub fn fail_rollback(&self, message: &str) {
        self.data.lock().unwrap().rollback_error = Some(message.to_string());
    }

    pub fn events(&self) -> Vec<Event> {
        self.data.lock().unwrap().events.clone()
    }

    pub fn params(&self) -> Vec<Params> {
        self.data.lock().unwrap().params.clone()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }
}

#[async_trait]
impl GraphClient for MockClient {
    type Tx = MockTransaction;

    async fn begin(&self) -> Result<Self::Tx, AppError> {
        let mut data = self.data.lock().unwrap();
        if let Some(message) = &data.begin_error {
            return Err(AppError::Connection(message.clone()));
        }
        data.events.push(Event::Begin);
        Ok(MockTransaction {
            data: self.data.clone(),
        })
    }
}

/// Transaction handed out by [`MockClient`].
pub struct MockTransaction {
    data: Arc<Mutex<MockData>>,
}

#[async_trait]
impl CypherExecutor for MockTransaction {
    async fn execute_cypher(
        &mut self,
        cypher: &str,
        params: Params,
    ) -> Result<Cursor<'_>, AppError> {
        let mut data = self.data.lock().unwrap();
        data.events.push(Event::Run(cypher.to_string()));
        let parameters = params.len();
        data.params.push(params);

        match data
            .responses
            .pop_front()
            .unwrap_or(Response::Rows(Vec::new()))
        {
            Response::Rows(rows) => {
                let stream = futures::stream::iter(rows.into_iter().map(Ok::<Row, AppError>));
                Ok(Cursor::new(cypher, parameters, Box::pin(stream)))
            }
            Response::RowsThenFail(rows, message) => {
                let failure = AppError::Query {
                    message,
                    query: cypher.to_string(),
                };
                let stream = futures::stream::iter(
                    rows.into_iter()
                        .map(Ok::<Row, AppError>)
                        .chain(std::iter::once(Err(failure))),
                );
                Ok(Cursor::new(cypher, parameters, Box::pin(stream)))
            }
            Response::Fail(message) => Err(AppError::Query {
                message,
                query: cypher.to_string(),
            }),
        }
    }
}

#[async_trait]
impl Transaction for MockTransaction {
    async fn commit(self) -> Result<(), AppError> {
        let mut data = self.data.lock().unwrap();
        if let Some(message) = &data.commit_error {
            return Err(AppError::Commit(message.clone()));
        }
        data.events.push(Event::Commit);
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        let mut data = self.data.lock().unwrap();
        data.events.push(Event::Rollback);
        match &data.rollback_error {
            Some(message) => Err(AppError::Internal(message.clone())),
            None => Ok(()),
        }
    }
}

/// Builds a row from column/value pairs.
pub fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
    Row::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}
