//! Command-line surface for the `silo` binary

use crate::pipeline::PipelineConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "silo",
    about = "Provision AWS warehouse infrastructure and bulk-load CSV files into Redshift",
    version
)]
pub struct Cli {
    /// Directory containing CSV files
    #[arg(long, value_name = "DIR")]
    pub directory: PathBuf,

    /// S3 bucket name to create/use
    #[arg(long)]
    pub bucket: String,

    /// Redshift cluster identifier
    #[arg(long)]
    pub cluster_id: String,

    /// Redshift database name
    #[arg(long)]
    pub db_name: String,

    /// Redshift master username
    #[arg(long)]
    pub user: String,

    /// Redshift master password
    #[arg(long, env = "SILO_MASTER_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// IAM role name for Redshift to access S3
    #[arg(long, default_value = "RedshiftS3AccessRole")]
    pub role_name: String,

    /// AWS region
    #[arg(long, default_value = "us-east-1")]
    pub region: String,
}

impl Cli {
    pub fn into_config(self) -> PipelineConfig {
        PipelineConfig {
            directory: self.directory,
            bucket: self.bucket,
            cluster_id: self.cluster_id,
            db_name: self.db_name,
            user: self.user,
            password: self.password,
            role_name: self.role_name,
            region: self.region,
        }
    }
}
