//! Warehouse cluster provisioner

use crate::error::{CloudError, Result};
use crate::services::WarehouseControlPlane;
use siloflow_core::{ClusterSpec, Endpoint, Probe, ensure};
use std::sync::Arc;
use std::time::Duration;

/// Cluster creation takes several minutes; poll at a coarse interval.
const AVAILABILITY_POLL_INTERVAL: Duration = Duration::from_secs(30);
const AVAILABILITY_POLL_ATTEMPTS: u32 = 60;

/// Ensures a warehouse cluster exists and, when freshly created, waits for
/// it to become available.
pub struct ClusterProvisioner {
    control: Arc<dyn WarehouseControlPlane>,
}

impl ClusterProvisioner {
    pub fn new(control: Arc<dyn WarehouseControlPlane>) -> Self {
        Self { control }
    }

    /// Ensure a cluster with the spec's identifier exists.
    ///
    /// An existing cluster returns immediately regardless of its
    /// configuration; drift against the spec is never re-validated. A
    /// missing cluster is created and this call blocks until the control
    /// plane reports it available.
    pub async fn ensure_cluster(&self, spec: &ClusterSpec) -> Result<()> {
        ensure(
            || async {
                match self.control.describe_cluster(&spec.identifier).await? {
                    Some(_) => {
                        tracing::info!(cluster = %spec.identifier, "cluster already exists");
                        Ok(Probe::Found(()))
                    }
                    None => Ok(Probe::Absent),
                }
            },
            || self.create_and_wait(spec),
        )
        .await
    }

    /// Resolve the SQL endpoint of an existing cluster.
    pub async fn endpoint(&self, identifier: &str) -> Result<Endpoint> {
        let info = self
            .control
            .describe_cluster(identifier)
            .await?
            .ok_or_else(|| CloudError::ControlPlane(format!("cluster '{identifier}' not found")))?;
        info.endpoint
            .ok_or_else(|| CloudError::ControlPlane(format!("cluster '{identifier}' has no endpoint yet")))
    }

    async fn create_and_wait(&self, spec: &ClusterSpec) -> Result<()> {
        tracing::info!(cluster = %spec.identifier, node_type = %spec.node_type, "creating cluster");
        self.control
            .create_cluster(spec)
            .await
            .map_err(|err| CloudError::ClusterCreation(format!("'{}': {err}", spec.identifier)))?;

        tracing::info!(cluster = %spec.identifier, "waiting for cluster to become available");
        for _ in 0..AVAILABILITY_POLL_ATTEMPTS {
            if let Some(info) = self.control.describe_cluster(&spec.identifier).await? {
                if info.is_available() {
                    tracing::info!(cluster = %spec.identifier, "cluster is now available");
                    return Ok(());
                }
                tracing::debug!(cluster = %spec.identifier, status = %info.status, "still waiting");
            }
            tokio::time::sleep(AVAILABILITY_POLL_INTERVAL).await;
        }

        Err(CloudError::Timeout(format!(
            "cluster '{}' to become available",
            spec.identifier
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeControlPlane;

    fn spec() -> ClusterSpec {
        ClusterSpec::single_node(
            "analytics",
            "warehouse",
            "admin",
            "hunter2hunter2",
            "arn:aws:iam::123456789012:role/loader",
        )
    }

    #[tokio::test]
    async fn existing_cluster_issues_zero_creations() {
        let control = Arc::new(FakeControlPlane::with_available_cluster("analytics"));
        let provisioner = ClusterProvisioner::new(control.clone());

        provisioner.ensure_cluster(&spec()).await.unwrap();
        assert_eq!(control.create_calls(), 0);
    }

    #[tokio::test]
    async fn missing_cluster_is_created_and_waited_on() {
        let control = Arc::new(FakeControlPlane::new());
        let provisioner = ClusterProvisioner::new(control.clone());

        provisioner.ensure_cluster(&spec()).await.unwrap();
        assert_eq!(control.create_calls(), 1);
    }

    #[tokio::test]
    async fn endpoint_resolves_for_available_cluster() {
        let control = Arc::new(FakeControlPlane::with_available_cluster("analytics"));
        let provisioner = ClusterProvisioner::new(control);

        let endpoint = provisioner.endpoint("analytics").await.unwrap();
        assert_eq!(endpoint.port, siloflow_core::WAREHOUSE_PORT);
        assert!(!endpoint.address.is_empty());
    }

    #[tokio::test]
    async fn endpoint_for_unknown_cluster_is_an_error() {
        let control = Arc::new(FakeControlPlane::new());
        let provisioner = ClusterProvisioner::new(control);

        let err = provisioner.endpoint("missing").await.unwrap_err();
        assert!(matches!(err, CloudError::ControlPlane(_)));
    }
}
