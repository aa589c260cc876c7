//! cypher-template - typed query helpers over Neo4j
//!
//! Runs Cypher requests through a [`graph::Template`], mapping each record to
//! a typed value and managing the transaction lifecycle for the caller.

pub mod config;
pub mod error;
pub mod graph;

pub use error::AppError;
