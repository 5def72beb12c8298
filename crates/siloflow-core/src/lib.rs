//! Core types for siloflow
//!
//! This crate holds the data model shared by the provisioning and load
//! crates, plus the probe-then-create idempotency primitive that every
//! provisioner is built on. It deliberately knows nothing about AWS or
//! any other concrete service.

pub mod ensure;
pub mod types;

// Re-exports
pub use ensure::{Probe, ensure};
pub use types::{
    ClusterInfo, ClusterSpec, Endpoint, IngressRule, LoadJob, DEFAULT_REGION, WAREHOUSE_PORT,
};
