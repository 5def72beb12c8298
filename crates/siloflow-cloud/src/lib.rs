//! Cloud service abstraction for siloflow
//!
//! This crate defines **generic traits** for the external services the
//! provisioning pipeline consumes (object storage, identity, warehouse
//! control plane, network security, public-IP lookup) and implements the
//! idempotent provisioners on top of them:
//!
//! - [`BucketProvisioner`]: ensure a storage bucket exists
//! - [`RoleProvisioner`]: ensure an access role with a trust policy exists
//! - [`ClusterProvisioner`]: ensure a warehouse cluster exists and is ready
//! - [`IngressAuthorizer`]: open a network path from the caller to the cluster
//!
//! Concrete AWS implementations of the service traits live in
//! `siloflow-cloud-aws`; in-memory fakes for tests live in [`fakes`].
//! Keeping the provisioner logic behind trait seams means every
//! state-dependent path (probe hit, probe miss, forbidden, duplicate rule)
//! is exercisable without a cloud account.

pub mod bucket;
pub mod cluster;
pub mod error;
pub mod fakes;
pub mod ingress;
pub mod role;
pub mod services;

// Re-exports
pub use bucket::BucketProvisioner;
pub use cluster::ClusterProvisioner;
pub use error::{CloudError, Result};
pub use ingress::IngressAuthorizer;
pub use role::RoleProvisioner;
pub use services::{
    AddressResolver, BucketProbe, IdentityService, IngressOutcome, NetworkSecurity, ObjectStore,
    WarehouseControlPlane,
};
