//! Backend implementations for different graph databases.
//!
//! Each backend implements the core traits from [`crate::graph::traits`]:
//!
//! - [`CypherExecutor`](crate::graph::CypherExecutor) - on the transaction type
//! - [`Transaction`](crate::graph::Transaction) - on the transaction type
//! - [`GraphClient`](crate::graph::GraphClient) - on the client type
//!
//! # Available Backends
//!
//! | Backend | Module | Status |
//! |---------|--------|--------|
//! | Neo4j (`neo4rs`) | [`neo4j`] | Available |
//!
//! # Implementing a Backend
//!
//! 1. Create a client struct (e.g., `Neo4jClient`)
//! 2. Create a transaction struct (e.g., `Neo4jTransaction`)
//! 3. Implement `CypherExecutor` and `Transaction` for the transaction struct
//! 4. Implement `GraphClient` for the client struct

pub mod neo4j;
