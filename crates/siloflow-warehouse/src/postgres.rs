//! tokio-postgres warehouse session
//!
//! Redshift speaks the postgres wire protocol, so the real session is a
//! plain `tokio-postgres` client. A transaction is opened as soon as the
//! connection is established; the loader drives commit or rollback.

use crate::error::{Result, WarehouseError};
use crate::loader::WarehouseCredentials;
use crate::session::{WarehouseConnector, WarehouseSession};
use async_trait::async_trait;
use siloflow_core::Endpoint;
use std::time::Duration;
use tokio_postgres::NoTls;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PgConnector;

#[async_trait]
impl WarehouseConnector for PgConnector {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        credentials: &WarehouseCredentials,
    ) -> Result<Box<dyn WarehouseSession>> {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&endpoint.address)
            .port(endpoint.port)
            .dbname(&credentials.database)
            .user(&credentials.username)
            .password(&credentials.password)
            .connect_timeout(CONNECT_TIMEOUT);

        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(|err| WarehouseError::Connection(err.to_string()))?;

        // The connection object drives the socket; it finishes when the
        // client is dropped.
        let driver = tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::warn!(error = %err, "warehouse connection closed with error");
            }
        });

        client.batch_execute("BEGIN").await?;
        Ok(Box::new(PgSession {
            client,
            driver,
        }))
    }
}

struct PgSession {
    client: tokio_postgres::Client,
    driver: tokio::task::JoinHandle<()>,
}

#[async_trait]
impl WarehouseSession for PgSession {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.client.batch_execute(sql).await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.client.batch_execute("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.client.batch_execute("ROLLBACK").await?;
        Ok(())
    }

    async fn close(self: Box<Self>) {
        // Dropping the client hangs up; wait for the driver task so the
        // socket is fully released before the next file connects.
        let PgSession { client, driver } = *self;
        drop(client);
        let _ = driver.await;
    }
}
