//! Neo4j backend implementation on top of `neo4rs`.
//!
//! # Example
//!
//! ```ignore
//! use cypher_template::config::Config;
//! use cypher_template::graph::backends::neo4j::Neo4jClient;
//! use cypher_template::graph::{mapper, Conn, Template};
//!
//! let config = Config::load()?;
//! let mut conn = Conn::new(Neo4jClient::connect(&config.neo4j).await?);
//!
//! let names = Template::<String, _>::with_label(&mut conn, "Person")
//!     .query(&request!("MATCH (p:Person) RETURN p.name AS name"), mapper::column("name"))
//!     .await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use neo4rs::{BoltNull, BoltType, ConfigBuilder, Graph, Query, Txn};
use serde_json::Value as JsonValue;

use crate::config::Neo4jConfig;
use crate::error::AppError;
use crate::graph::cursor::Cursor;
use crate::graph::row::{Params, Row, RowStream};
use crate::graph::traits::{CypherExecutor, GraphClient, Transaction};

/// Neo4j graph client.
///
/// Connection pooling, routing and retries are handled by `neo4rs`.
/// This type is cheap to clone - the underlying pool is `Arc`-based.
#[derive(Clone)]
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

impl Neo4jClient {
    /// Connects to Neo4j using the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Connection`] if the driver configuration is
    /// invalid or the server cannot be reached.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, AppError> {
        let driver_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_deref().unwrap_or(""))
            .db(config.db.as_str())
            .fetch_size(config.fetch_size)
            .max_connections(config.max_connections)
            .build()
            .map_err(|e| AppError::Connection(format!("Invalid Neo4j configuration: {}", e)))?;

        tracing::info!(uri = %config.uri, db = %config.db, "Connecting to Neo4j");
        let graph = Graph::connect(driver_config)
            .await
            .map_err(|e| AppError::Connection(format!("Failed to connect to Neo4j: {}", e)))?;

        Ok(Self::from_graph(graph))
    }

    /// Wraps an already connected graph.
    pub fn from_graph(graph: Graph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }
}

#[async_trait]
impl GraphClient for Neo4jClient {
    type Tx = Neo4jTransaction;

    async fn begin(&self) -> Result<Self::Tx, AppError> {
        let txn = self
            .graph
            .start_txn()
            .await
            .map_err(|e| AppError::Connection(format!("Failed to begin transaction: {}", e)))?;

        Ok(Neo4jTransaction { txn: Some(txn) })
    }
}

/// An explicit Neo4j transaction.
///
/// Must be committed or rolled back; dropping it unfinished logs a warning
/// and leaves the server to roll it back when the connection is reset.
pub struct Neo4jTransaction {
    txn: Option<Txn>,
}

impl Neo4jTransaction {
    fn finished() -> AppError {
        AppError::Transaction("transaction already finished".to_string())
    }
}

#[async_trait]
impl CypherExecutor for Neo4jTransaction {
    async fn execute_cypher(
        &mut self,
        cypher: &str,
        params: Params,
    ) -> Result<Cursor<'_>, AppError> {
        let txn = self.txn.as_mut().ok_or_else(Self::finished)?;
        let parameters = params.len();

        let mut result = txn
            .execute(build_query(cypher, params))
            .await
            .map_err(|e| AppError::Query {
                message: format!("Cypher query failed: {}", e),
                query: cypher.to_string(),
            })?;

        let query = cypher.to_string();
        let rows: RowStream<'_> = Box::pin(async_stream::try_stream! {
            while let Some(row) = result.next(txn.handle()).await.map_err(|e| AppError::Query {
                message: format!("Failed to fetch record: {}", e),
                query: query.clone(),
            })? {
                yield parse_neo4j_row(&row)?;
            }
        });

        Ok(Cursor::new(cypher, parameters, rows))
    }
}

#[async_trait]
impl Transaction for Neo4jTransaction {
    async fn commit(mut self) -> Result<(), AppError> {
        let txn = self.txn.take().ok_or_else(Self::finished)?;
        txn.commit()
            .await
            .map(|_| ())
            .map_err(|e| AppError::Commit(e.to_string()))
    }

    async fn rollback(mut self) -> Result<(), AppError> {
        let txn = self.txn.take().ok_or_else(Self::finished)?;
        txn.rollback()
            .await
            .map(|_| ())
            .map_err(|e| AppError::Transaction(format!("Failed to rollback transaction: {}", e)))
    }
}

impl Drop for Neo4jTransaction {
    fn drop(&mut self) {
        if self.txn.is_some() {
            tracing::warn!("Neo4jTransaction dropped without commit or rollback");
        }
    }
}

/// Builds a driver query, binding every parameter as a Bolt value.
fn build_query(cypher: &str, params: Params) -> Query {
    params
        .into_iter()
        .fold(Query::new(cypher.to_string()), |query, (name, value)| {
            query.param(&name, json_to_bolt(value))
        })
}

/// Converts a JSON parameter value into its Bolt equivalent.
///
/// Integers that fit in `i64` stay integers, other numbers become floats.
fn json_to_bolt(value: JsonValue) -> BoltType {
    match value {
        JsonValue::Null => BoltType::Null(BoltNull),
        JsonValue::Bool(b) => b.into(),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or(f64::NAN).into(),
        },
        JsonValue::String(s) => s.into(),
        JsonValue::Array(items) => items
            .into_iter()
            .map(json_to_bolt)
            .collect::<Vec<BoltType>>()
            .into(),
        JsonValue::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k, json_to_bolt(v)))
            .collect::<HashMap<String, BoltType>>()
            .into(),
    }
}

/// Parses a driver row into our generic Row type.
fn parse_neo4j_row(row: &neo4rs::Row) -> Result<Row, AppError> {
    row.to::<HashMap<String, JsonValue>>()
        .map(Row::new)
        .map_err(|e| AppError::Mapping(format!("Failed to decode record: {}", e)))
}
