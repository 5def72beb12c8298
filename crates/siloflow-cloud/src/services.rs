//! Service traits consumed by the provisioners
//!
//! Each trait models one external control plane. Implementations are
//! explicitly constructed and passed in as handles (no ambient singletons),
//! so tests can substitute the fakes from [`crate::fakes`] without any
//! runtime patching.

use crate::error::Result;
use async_trait::async_trait;
use siloflow_core::{ClusterInfo, ClusterSpec, IngressRule};
use std::path::Path;

/// Outcome of a bucket metadata probe, tagged so call sites can
/// pattern-match instead of unwinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketProbe {
    /// The bucket exists and is reachable by this account.
    Exists,
    /// The service reported the bucket as absent.
    Missing,
    /// The bucket exists but belongs to another account, or this account
    /// lacks permission to probe it.
    Forbidden,
}

/// Outcome of an ingress-authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressOutcome {
    /// A new rule was added to the security group.
    Authorized,
    /// An identical rule was already present; the service's duplicate
    /// condition is swallowed and reported as this outcome.
    AlreadyExists,
}

/// Object storage (bucket head/create, file upload).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Probe a bucket's existence via a metadata request.
    async fn head_bucket(&self, name: &str) -> Result<BucketProbe>;

    /// Create a bucket. `location_constraint` is `None` only for the
    /// default region; every other region requires one.
    async fn create_bucket(&self, name: &str, location_constraint: Option<&str>) -> Result<()>;

    /// Upload a local file under the given key.
    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()>;
}

/// Identity service (role lookup/creation, policy attachment).
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Look up a role by name; `None` means the role does not exist.
    /// Any other lookup failure is an error.
    async fn get_role_arn(&self, name: &str) -> Result<Option<String>>;

    /// Create a role with the given trust policy document and return its ARN.
    async fn create_role(
        &self,
        name: &str,
        trust_policy: &str,
        description: &str,
    ) -> Result<String>;

    /// Attach a managed policy to a role.
    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> Result<()>;
}

/// Warehouse cluster control plane (describe/create).
#[async_trait]
pub trait WarehouseControlPlane: Send + Sync {
    /// Describe a cluster by identifier; `None` means the cluster does not
    /// exist. Any other failure is an error.
    async fn describe_cluster(&self, identifier: &str) -> Result<Option<ClusterInfo>>;

    /// Request cluster creation. Returns as soon as the request is
    /// accepted; callers poll [`Self::describe_cluster`] for readiness.
    async fn create_cluster(&self, spec: &ClusterSpec) -> Result<()>;
}

/// Network security control plane (security-group ingress).
#[async_trait]
pub trait NetworkSecurity: Send + Sync {
    /// Submit an ingress-authorization request. A duplicate rule must be
    /// reported as [`IngressOutcome::AlreadyExists`], not as an error.
    async fn authorize_ingress(&self, rule: &IngressRule) -> Result<IngressOutcome>;
}

/// Third-party lookup of the caller's current public IP address.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn public_ip(&self) -> Result<String>;
}
