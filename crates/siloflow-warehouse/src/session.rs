//! SQL session traits
//!
//! Seam between the loader and the actual warehouse connection. A session
//! is scoped to exactly one file's load: connected, used inside a single
//! transaction, then committed or rolled back and closed before the next
//! file begins. No pooling, no reuse.

use crate::error::Result;
use crate::loader::WarehouseCredentials;
use async_trait::async_trait;
use siloflow_core::Endpoint;

/// Opens one session per load against a resolved cluster endpoint.
#[async_trait]
pub trait WarehouseConnector: Send + Sync {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        credentials: &WarehouseCredentials,
    ) -> Result<Box<dyn WarehouseSession>>;
}

/// A live connection executing inside one open transaction.
#[async_trait]
pub trait WarehouseSession: Send {
    /// Execute a statement within the session's transaction.
    async fn execute(&mut self, sql: &str) -> Result<()>;

    /// Commit the transaction.
    async fn commit(&mut self) -> Result<()>;

    /// Roll the transaction back.
    async fn rollback(&mut self) -> Result<()>;

    /// Release the connection. Runs on every outcome.
    async fn close(self: Box<Self>);
}
