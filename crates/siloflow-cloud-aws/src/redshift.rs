//! Redshift control-plane adapter

use async_trait::async_trait;
use siloflow_cloud::error::{CloudError, Result};
use siloflow_cloud::services::WarehouseControlPlane;
use siloflow_core::{ClusterInfo, ClusterSpec, Endpoint, WAREHOUSE_PORT};

pub struct RedshiftControlPlane {
    client: aws_sdk_redshift::Client,
}

impl RedshiftControlPlane {
    pub fn new(client: aws_sdk_redshift::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WarehouseControlPlane for RedshiftControlPlane {
    async fn describe_cluster(&self, identifier: &str) -> Result<Option<ClusterInfo>> {
        let output = match self
            .client
            .describe_clusters()
            .cluster_identifier(identifier)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_cluster_not_found_fault() {
                    return Ok(None);
                }
                return Err(CloudError::ControlPlane(service_error.to_string()));
            }
        };

        let cluster = output.clusters().first().cloned().ok_or_else(|| {
            CloudError::ControlPlane(format!("describe returned no cluster for '{identifier}'"))
        })?;

        Ok(Some(ClusterInfo {
            identifier: cluster.cluster_identifier().unwrap_or(identifier).to_string(),
            status: cluster.cluster_status().unwrap_or_default().to_string(),
            endpoint: cluster.endpoint().and_then(|endpoint| {
                endpoint.address().map(|address| Endpoint {
                    address: address.to_string(),
                    port: endpoint.port().unwrap_or(WAREHOUSE_PORT as i32) as u16,
                })
            }),
            vpc_id: cluster.vpc_id().map(str::to_string),
            security_group_ids: cluster
                .vpc_security_groups()
                .iter()
                .filter_map(|group| group.vpc_security_group_id().map(str::to_string))
                .collect(),
        }))
    }

    async fn create_cluster(&self, spec: &ClusterSpec) -> Result<()> {
        self.client
            .create_cluster()
            .cluster_identifier(&spec.identifier)
            .node_type(&spec.node_type)
            .cluster_type(&spec.cluster_type)
            .master_username(&spec.master_username)
            .master_user_password(&spec.master_password)
            .db_name(&spec.database)
            .iam_roles(&spec.role_arn)
            .publicly_accessible(spec.publicly_accessible)
            .send()
            .await
            .map_err(|err| CloudError::ControlPlane(err.to_string()))?;
        Ok(())
    }
}
