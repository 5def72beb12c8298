//! Warehouse-side loading for siloflow
//!
//! Two concerns live here: deriving a column-typed CREATE TABLE statement
//! from a sampled CSV prefix ([`schema`]), and replaying one file into the
//! warehouse over a SQL connection with transactional drop/create/copy
//! ([`loader`]). The SQL session sits behind the [`session`] traits so the
//! loader's commit/rollback/close discipline is testable without a cluster;
//! the real `tokio-postgres` session lives in [`postgres`].

pub mod error;
pub mod fakes;
pub mod loader;
pub mod postgres;
pub mod schema;
pub mod session;

// Re-exports
pub use error::{Result, WarehouseError};
pub use loader::{BulkLoader, WarehouseCredentials};
pub use postgres::PgConnector;
pub use schema::{InferredSchema, SqlType, infer_schema};
pub use session::{WarehouseConnector, WarehouseSession};
