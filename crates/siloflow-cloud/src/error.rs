//! Cloud provisioning error types

use thiserror::Error;

/// Errors surfaced by the provisioning layer.
///
/// "Not found" conditions are not represented here: they feed the create
/// path of the ensure primitive instead of erroring. Likewise a duplicate
/// ingress rule is reported as a success outcome, never as an error.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("access to bucket '{0}' is forbidden (owned by another account or missing permissions)")]
    Forbidden(String),

    #[error("object store error: {0}")]
    ObjectStore(String),

    #[error("bucket creation failed: {0}")]
    BucketCreation(String),

    #[error("identity service error: {0}")]
    Identity(String),

    #[error("failed to create role: {0}")]
    RoleCreation(String),

    #[error("failed to attach policy: {0}")]
    PolicyAttachment(String),

    #[error("warehouse control plane error: {0}")]
    ControlPlane(String),

    #[error("cluster creation failed: {0}")]
    ClusterCreation(String),

    #[error("cannot resolve network context: {0}")]
    NetworkContext(String),

    #[error("cannot determine caller address: {0}")]
    AddressLookup(String),

    #[error("network security error: {0}")]
    NetworkSecurity(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
