//! Graph access layer: sessions, requests and typed query templates.
//!
//! # Architecture
//!
//! - [`GraphClient`], [`Transaction`], [`CypherExecutor`] - backend seams
//! - [`Conn`] - a session holding an optional ambient transaction
//! - [`Request`] - immutable query text plus parameters
//! - [`Mapper`] - converts one [`Row`] into a typed value
//! - [`Template`] - runs requests and finalizes the transactions it opens
//!
//! # Usage
//!
//! ```ignore
//! use cypher_template::graph::{mapper, Conn, Template};
//! use cypher_template::request;
//!
//! let mut conn = Conn::new(client);
//!
//! // Each call commits its own transaction
//! let people = Template::<Person, _>::new(&mut conn)
//!     .query(&request!("MATCH (p:Person) RETURN p.name AS name"), mapper::row())
//!     .await?;
//!
//! // Calls made inside an ambient transaction share it
//! conn.begin().await?;
//! let mut template = Template::<Person, _>::new(&mut conn);
//! template.query(&request!("CREATE (p:Person {name: $name})", name = "Ada"), mapper::raw()).await?;
//! let ada = template
//!     .query_single(&request!("MATCH (p:Person {name: 'Ada'}) RETURN p.name AS name"), mapper::row())
//!     .await?;
//! conn.commit().await?;
//! ```

mod cursor;
mod label;
mod macros;
mod request;
mod row;
mod session;
mod template;
mod traits;

pub mod backends;
pub mod mapper;

#[cfg(test)]
pub(crate) mod testing;

// Re-export core types
pub use cursor::{Cursor, Summary};
pub use label::default_label;
pub use mapper::Mapper;
pub use request::Request;
pub use row::{Params, Row, RowStream};
pub use session::{Conn, TxContext};
pub use template::{QueryResult, Template};
pub use traits::{CypherExecutor, GraphClient, Transaction};

// Re-export macro (defined at crate root via #[macro_export])
#[doc(inline)]
pub use crate::request;
