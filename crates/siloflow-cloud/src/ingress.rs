//! Network ingress authorization
//!
//! Opens a temporary network path from the operator's machine to the
//! warehouse cluster: resolve the cluster's security group, discover the
//! caller's public IP, and add a single-address ingress rule for the
//! warehouse port. Re-run before every load; the duplicate-rule condition
//! from the network service makes repeats no-ops.

use crate::error::{CloudError, Result};
use crate::services::{AddressResolver, IngressOutcome, NetworkSecurity, WarehouseControlPlane};
use siloflow_core::{IngressRule, WAREHOUSE_PORT};
use std::sync::Arc;

const RULE_DESCRIPTION: &str = "Allow Redshift access from CLI uploader";

pub struct IngressAuthorizer {
    control: Arc<dyn WarehouseControlPlane>,
    network: Arc<dyn NetworkSecurity>,
    resolver: Arc<dyn AddressResolver>,
}

impl IngressAuthorizer {
    pub fn new(
        control: Arc<dyn WarehouseControlPlane>,
        network: Arc<dyn NetworkSecurity>,
        resolver: Arc<dyn AddressResolver>,
    ) -> Self {
        Self {
            control,
            network,
            resolver,
        }
    }

    /// Ensure an ingress rule permitting the caller's current public IP to
    /// reach the cluster's warehouse port exists.
    ///
    /// The caller IP is re-resolved on every invocation rather than cached;
    /// a rule the service already holds is treated as success.
    pub async fn authorize(&self, cluster_identifier: &str) -> Result<()> {
        let info = self
            .control
            .describe_cluster(cluster_identifier)
            .await
            .map_err(|err| CloudError::NetworkContext(err.to_string()))?
            .ok_or_else(|| {
                CloudError::NetworkContext(format!("cluster '{cluster_identifier}' not found"))
            })?;

        let vpc_id = info.vpc_id.ok_or_else(|| {
            CloudError::NetworkContext(format!("cluster '{cluster_identifier}' reports no VPC"))
        })?;
        let security_group_id = info.security_group_ids.first().cloned().ok_or_else(|| {
            CloudError::NetworkContext(format!(
                "cluster '{cluster_identifier}' has no attached security group"
            ))
        })?;
        tracing::debug!(vpc = %vpc_id, security_group = %security_group_id, "resolved network context");

        let ip = self.resolver.public_ip().await?;
        let rule = IngressRule {
            security_group_id,
            port: WAREHOUSE_PORT,
            cidr_ip: format!("{ip}/32"),
            description: RULE_DESCRIPTION.to_string(),
        };

        match self.network.authorize_ingress(&rule).await? {
            IngressOutcome::Authorized => {
                tracing::info!(cidr = %rule.cidr_ip, port = rule.port, "ingress rule added");
            }
            IngressOutcome::AlreadyExists => {
                tracing::info!(cidr = %rule.cidr_ip, "ingress rule already exists");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeAddressResolver, FakeControlPlane, FakeNetworkSecurity};

    fn authorizer(
        control: Arc<FakeControlPlane>,
        network: Arc<FakeNetworkSecurity>,
    ) -> IngressAuthorizer {
        IngressAuthorizer::new(
            control,
            network,
            Arc::new(FakeAddressResolver::new("203.0.113.9")),
        )
    }

    #[tokio::test]
    async fn adds_a_single_address_rule_on_the_warehouse_port() {
        let control = Arc::new(FakeControlPlane::with_available_cluster("analytics"));
        let network = Arc::new(FakeNetworkSecurity::new());
        authorizer(control, network.clone())
            .authorize("analytics")
            .await
            .unwrap();

        let rules = network.rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].cidr_ip, "203.0.113.9/32");
        assert_eq!(rules[0].port, WAREHOUSE_PORT);
    }

    #[tokio::test]
    async fn second_authorization_with_same_ip_is_a_no_op() {
        let control = Arc::new(FakeControlPlane::with_available_cluster("analytics"));
        let network = Arc::new(FakeNetworkSecurity::new());
        let authorizer = authorizer(control, network.clone());

        authorizer.authorize("analytics").await.unwrap();
        authorizer.authorize("analytics").await.unwrap();

        assert_eq!(network.rules().len(), 1);
        assert_eq!(network.authorize_calls(), 2);
    }

    #[tokio::test]
    async fn unknown_cluster_cannot_resolve_network_context() {
        let control = Arc::new(FakeControlPlane::new());
        let network = Arc::new(FakeNetworkSecurity::new());
        let err = authorizer(control, network)
            .authorize("missing")
            .await
            .unwrap_err();

        assert!(matches!(err, CloudError::NetworkContext(_)));
    }

    #[tokio::test]
    async fn failed_address_lookup_is_fatal() {
        let control = Arc::new(FakeControlPlane::with_available_cluster("analytics"));
        let authorizer = IngressAuthorizer::new(
            control,
            Arc::new(FakeNetworkSecurity::new()),
            Arc::new(FakeAddressResolver::failing()),
        );

        let err = authorizer.authorize("analytics").await.unwrap_err();
        assert!(matches!(err, CloudError::AddressLookup(_)));
    }
}
