//! Data model for the provisioning and load pipeline

/// Region that needs no location constraint when creating a bucket.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Fixed SQL port exposed by the warehouse cluster.
pub const WAREHOUSE_PORT: u16 = 5439;

/// Desired configuration for the warehouse cluster.
///
/// Only consulted when the cluster does not exist yet; an existing cluster
/// is never re-validated against this spec.
#[derive(Debug, Clone)]
pub struct ClusterSpec {
    pub identifier: String,
    pub node_type: String,
    pub cluster_type: String,
    pub master_username: String,
    pub master_password: String,
    pub database: String,
    pub role_arn: String,
    pub publicly_accessible: bool,
}

impl ClusterSpec {
    /// Single-node `dc2.large` cluster with public access, the only
    /// topology this tool provisions.
    pub fn single_node(
        identifier: impl Into<String>,
        database: impl Into<String>,
        master_username: impl Into<String>,
        master_password: impl Into<String>,
        role_arn: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            node_type: "dc2.large".to_string(),
            cluster_type: "single-node".to_string(),
            master_username: master_username.into(),
            master_password: master_password.into(),
            database: database.into(),
            role_arn: role_arn.into(),
            publicly_accessible: true,
        }
    }
}

/// Resolved SQL endpoint of a running cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub address: String,
    pub port: u16,
}

/// Everything a describe-cluster call reports that the pipeline consumes.
///
/// Endpoint and network fields are only populated once the cluster has been
/// observed by the control plane; a freshly requested cluster may report
/// `None` for all of them.
#[derive(Debug, Clone, Default)]
pub struct ClusterInfo {
    pub identifier: String,
    pub status: String,
    pub endpoint: Option<Endpoint>,
    pub vpc_id: Option<String>,
    pub security_group_ids: Vec<String>,
}

impl ClusterInfo {
    pub fn is_available(&self) -> bool {
        self.status == "available"
    }
}

/// Firewall permission to request on the cluster's security group.
///
/// The idempotency key is (security group, source CIDR, port); the network
/// service reports duplicates and the caller treats those as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressRule {
    pub security_group_id: String,
    pub port: u16,
    pub cidr_ip: String,
    pub description: String,
}

/// One file's bulk-load unit. Ephemeral; built per file and dropped after
/// the load finishes or fails.
#[derive(Debug, Clone)]
pub struct LoadJob {
    pub table_name: String,
    pub create_sql: String,
    pub bucket: String,
    pub key: String,
    pub role_arn: String,
}
