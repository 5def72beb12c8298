//! Transactional bulk loader
//!
//! Replays one uploaded file into the warehouse: authorize ingress for the
//! caller, resolve the cluster endpoint, then drop/create/copy inside a
//! single transaction. Each file is an isolated unit: a failed load rolls
//! back, logs, and leaves the remaining files unaffected.

use crate::error::Result;
use crate::session::WarehouseConnector;
use siloflow_cloud::{ClusterProvisioner, IngressAuthorizer};
use siloflow_core::LoadJob;
use std::sync::Arc;

/// Connection parameters for the warehouse database.
#[derive(Debug, Clone)]
pub struct WarehouseCredentials {
    pub database: String,
    pub username: String,
    pub password: String,
}

pub struct BulkLoader {
    authorizer: IngressAuthorizer,
    clusters: ClusterProvisioner,
    connector: Arc<dyn WarehouseConnector>,
}

impl BulkLoader {
    pub fn new(
        authorizer: IngressAuthorizer,
        clusters: ClusterProvisioner,
        connector: Arc<dyn WarehouseConnector>,
    ) -> Self {
        Self {
            authorizer,
            clusters,
            connector,
        }
    }

    /// Load one file into its target table.
    ///
    /// Ingress is re-authorized on every call before the connection opens.
    /// On any execution error the transaction is rolled back; the session
    /// is closed on every outcome.
    pub async fn load(
        &self,
        cluster_identifier: &str,
        credentials: &WarehouseCredentials,
        job: &LoadJob,
    ) -> Result<()> {
        self.authorizer.authorize(cluster_identifier).await?;

        let endpoint = self.clusters.endpoint(cluster_identifier).await?;
        tracing::info!(
            cluster = cluster_identifier,
            address = %endpoint.address,
            table = %job.table_name,
            "connecting to warehouse"
        );
        let mut session = self.connector.connect(&endpoint, credentials).await?;

        let outcome = Self::replace_and_copy(session.as_mut(), job).await;
        if let Err(err) = &outcome {
            tracing::error!(table = %job.table_name, error = %err, "load failed, rolling back");
            if let Err(rollback_err) = session.rollback().await {
                tracing::warn!(table = %job.table_name, error = %rollback_err, "rollback failed");
            }
        }
        session.close().await;
        outcome
    }

    async fn replace_and_copy(
        session: &mut dyn crate::session::WarehouseSession,
        job: &LoadJob,
    ) -> Result<()> {
        session
            .execute(&format!("DROP TABLE IF EXISTS {}", job.table_name))
            .await?;
        session.execute(&job.create_sql).await?;
        tracing::info!(table = %job.table_name, "created table");

        session.execute(&copy_statement(job)).await?;
        session.commit().await?;
        tracing::info!(table = %job.table_name, bucket = %job.bucket, key = %job.key, "loaded data");
        Ok(())
    }
}

/// Bulk copy from object storage, tolerant of invalid characters and empty
/// or blank fields, skipping the header row, with a bounded error budget.
fn copy_statement(job: &LoadJob) -> String {
    format!(
        "COPY {table}\n\
         FROM 's3://{bucket}/{key}'\n\
         IAM_ROLE '{role}'\n\
         FORMAT AS CSV\n\
         ACCEPTINVCHARS\n\
         EMPTYASNULL\n\
         BLANKSASNULL\n\
         IGNOREHEADER 1\n\
         MAXERROR 100;",
        table = job.table_name,
        bucket = job.bucket,
        key = job.key,
        role = job.role_arn,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WarehouseError;
    use crate::fakes::FakeConnector;
    use siloflow_cloud::fakes::{FakeAddressResolver, FakeControlPlane, FakeNetworkSecurity};

    fn loader(control: Arc<FakeControlPlane>, connector: Arc<FakeConnector>) -> BulkLoader {
        let authorizer = IngressAuthorizer::new(
            control.clone(),
            Arc::new(FakeNetworkSecurity::new()),
            Arc::new(FakeAddressResolver::new("203.0.113.9")),
        );
        BulkLoader::new(authorizer, ClusterProvisioner::new(control), connector)
    }

    fn job() -> LoadJob {
        LoadJob {
            table_name: "scores".to_string(),
            create_sql: "CREATE TABLE scores (\n  \"id\" INTEGER\n);".to_string(),
            bucket: "reports".to_string(),
            key: "scores.csv".to_string(),
            role_arn: "arn:aws:iam::000000000000:role/loader".to_string(),
        }
    }

    fn credentials() -> WarehouseCredentials {
        WarehouseCredentials {
            database: "warehouse".to_string(),
            username: "admin".to_string(),
            password: "hunter2hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn successful_load_commits_and_closes() {
        let control = Arc::new(FakeControlPlane::with_available_cluster("analytics"));
        let connector = Arc::new(FakeConnector::new());
        loader(control, connector.clone())
            .load("analytics", &credentials(), &job())
            .await
            .unwrap();

        let session = connector.last_session();
        assert!(session.committed());
        assert!(!session.rolled_back());
        assert!(session.closed());

        let statements = session.statements();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0], "DROP TABLE IF EXISTS scores");
        assert!(statements[1].starts_with("CREATE TABLE scores"));
        assert!(statements[2].starts_with("COPY scores"));
    }

    #[tokio::test]
    async fn copy_statement_carries_the_load_options() {
        let statement = copy_statement(&job());
        assert!(statement.contains("FROM 's3://reports/scores.csv'"));
        assert!(statement.contains("IAM_ROLE 'arn:aws:iam::000000000000:role/loader'"));
        for option in [
            "FORMAT AS CSV",
            "ACCEPTINVCHARS",
            "EMPTYASNULL",
            "BLANKSASNULL",
            "IGNOREHEADER 1",
            "MAXERROR 100",
        ] {
            assert!(statement.contains(option), "missing option: {option}");
        }
    }

    #[tokio::test]
    async fn failed_copy_rolls_back_and_closes() {
        let control = Arc::new(FakeControlPlane::with_available_cluster("analytics"));
        let connector = Arc::new(FakeConnector::new());
        connector.fail_statements_containing("COPY");

        let result = loader(control, connector.clone())
            .load("analytics", &credentials(), &job())
            .await;
        assert!(matches!(result, Err(WarehouseError::Sql(_))));

        let session = connector.last_session();
        assert!(session.rolled_back());
        assert!(!session.committed());
        assert!(session.closed());
    }

    #[tokio::test]
    async fn each_load_opens_its_own_session() {
        let control = Arc::new(FakeControlPlane::with_available_cluster("analytics"));
        let connector = Arc::new(FakeConnector::new());
        let loader = loader(control, connector.clone());

        loader.load("analytics", &credentials(), &job()).await.unwrap();
        loader.load("analytics", &credentials(), &job()).await.unwrap();

        assert_eq!(connector.sessions().len(), 2);
    }
}
