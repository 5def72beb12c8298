//! AWS implementations of the siloflow service traits
//!
//! Thin adapters from the `siloflow-cloud` traits onto the AWS SDK
//! clients: S3 (object store), IAM (identity), Redshift (warehouse control
//! plane), EC2 (security-group ingress), plus an `api.ipify.org` resolver
//! for the caller's public IP. All provisioning decisions live upstream in
//! `siloflow-cloud`; this crate only translates calls and error shapes.

pub mod ec2;
pub mod iam;
pub mod ipify;
pub mod redshift;
pub mod s3;

pub use ec2::Ec2NetworkSecurity;
pub use iam::IamIdentityService;
pub use ipify::IpifyResolver;
pub use redshift::RedshiftControlPlane;
pub use s3::S3ObjectStore;

use aws_config::{BehaviorVersion, Region};

/// One concrete client per external service, built from the shared AWS
/// configuration. Constructed once per run and handed into the pipeline.
pub struct AwsClients {
    pub object_store: S3ObjectStore,
    pub identity: IamIdentityService,
    pub control_plane: RedshiftControlPlane,
    pub network: Ec2NetworkSecurity,
}

impl AwsClients {
    /// Load credentials from the environment and build clients pinned to
    /// the given region.
    pub async fn connect(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            object_store: S3ObjectStore::new(aws_sdk_s3::Client::new(&config)),
            identity: IamIdentityService::new(aws_sdk_iam::Client::new(&config)),
            control_plane: RedshiftControlPlane::new(aws_sdk_redshift::Client::new(&config)),
            network: Ec2NetworkSecurity::new(aws_sdk_ec2::Client::new(&config)),
        }
    }
}
