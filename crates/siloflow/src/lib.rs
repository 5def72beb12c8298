//! One-shot batch ingestion into an AWS data warehouse
//!
//! The `silo` binary provisions an S3 bucket, an IAM access role and a
//! Redshift cluster (all idempotently), uploads a directory of CSV files,
//! and bulk-loads each file into its own table via COPY. The pipeline
//! itself lives in [`pipeline`] and runs against injected service handles,
//! so the integration tests drive it end to end with in-memory fakes.

pub mod cli;
pub mod pipeline;

use siloflow_cloud_aws::{AwsClients, IpifyResolver};
use siloflow_warehouse::PgConnector;
use std::sync::Arc;

/// Build the real AWS-backed services and run the pipeline once.
pub async fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let config = cli.into_config();
    let clients = AwsClients::connect(&config.region).await;

    let services = pipeline::PipelineServices {
        object_store: Arc::new(clients.object_store),
        identity: Arc::new(clients.identity),
        control_plane: Arc::new(clients.control_plane),
        network: Arc::new(clients.network),
        resolver: Arc::new(IpifyResolver::new()),
        connector: Arc::new(PgConnector),
    };

    pipeline::run(&config, &services).await
}
