//! Pipeline orchestration
//!
//! Strictly linear and single-threaded: bucket → role → cluster → upload →
//! per-file (infer → authorize ingress → load). A failure in any of the
//! three provisioning stages halts the run; a per-file failure is logged
//! and the loop moves on to the next file.

use colored::Colorize;
use siloflow_cloud::services::{
    AddressResolver, IdentityService, NetworkSecurity, ObjectStore, WarehouseControlPlane,
};
use siloflow_cloud::{BucketProvisioner, ClusterProvisioner, IngressAuthorizer, RoleProvisioner};
use siloflow_core::{ClusterSpec, LoadJob};
use siloflow_warehouse::{BulkLoader, WarehouseConnector, WarehouseCredentials, infer_schema};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything the run needs from the command line.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub directory: PathBuf,
    pub bucket: String,
    pub cluster_id: String,
    pub db_name: String,
    pub user: String,
    pub password: String,
    pub role_name: String,
    pub region: String,
}

/// Explicitly constructed service handles, one per external service.
/// Injected rather than ambient so tests can run the whole pipeline
/// against the in-memory fakes.
pub struct PipelineServices {
    pub object_store: Arc<dyn ObjectStore>,
    pub identity: Arc<dyn IdentityService>,
    pub control_plane: Arc<dyn WarehouseControlPlane>,
    pub network: Arc<dyn NetworkSecurity>,
    pub resolver: Arc<dyn AddressResolver>,
    pub connector: Arc<dyn WarehouseConnector>,
}

/// Run the full provisioning-and-load pipeline once.
///
/// Returns an error only when a provisioning stage fails; per-file load
/// failures are reported but leave the overall run successful.
pub async fn run(config: &PipelineConfig, services: &PipelineServices) -> anyhow::Result<()> {
    if !config.directory.is_dir() {
        anyhow::bail!("directory '{}' does not exist", config.directory.display());
    }
    let files = csv_files(&config.directory)?;

    println!("{}", "=== Step 1: Create or Verify S3 Bucket ===".bold());
    let buckets = BucketProvisioner::new(services.object_store.clone());
    if !buckets.ensure_bucket(&config.bucket, &config.region).await {
        anyhow::bail!("bucket provisioning failed for '{}'", config.bucket);
    }

    println!("{}", "=== Step 2: Create or Reuse IAM Role ===".bold());
    let roles = RoleProvisioner::new(services.identity.clone());
    let role_arn = roles.ensure_role(&config.role_name).await?;

    println!("{}", "=== Step 3: Create Redshift Cluster ===".bold());
    let clusters = ClusterProvisioner::new(services.control_plane.clone());
    let spec = ClusterSpec::single_node(
        &config.cluster_id,
        &config.db_name,
        &config.user,
        &config.password,
        &role_arn,
    );
    clusters.ensure_cluster(&spec).await?;

    println!("{}", "=== Step 4: Upload CSV Files to S3 ===".bold());
    upload_files(config, services, &files).await;

    println!("{}", "=== Step 5: Create Tables and COPY Data ===".bold());
    let authorizer = IngressAuthorizer::new(
        services.control_plane.clone(),
        services.network.clone(),
        services.resolver.clone(),
    );
    let loader = BulkLoader::new(authorizer, clusters, services.connector.clone());
    let credentials = WarehouseCredentials {
        database: config.db_name.clone(),
        username: config.user.clone(),
        password: config.password.clone(),
    };

    for path in &files {
        let name = file_name(path);
        println!("-> Processing file: {}", name.cyan());
        let schema = match infer_schema(path) {
            Ok(schema) => schema,
            Err(err) => {
                tracing::error!(file = %name, error = %err, "schema inference failed");
                eprintln!("  {} schema inference failed for {name}: {err}", "✗".red());
                continue;
            }
        };
        let job = LoadJob {
            table_name: schema.table_name.clone(),
            create_sql: schema.create_statement(),
            bucket: config.bucket.clone(),
            key: name.clone(),
            role_arn: role_arn.clone(),
        };
        if let Err(err) = loader.load(&config.cluster_id, &credentials, &job).await {
            tracing::error!(file = %name, table = %job.table_name, error = %err, "load failed");
            eprintln!("  {} load failed for {name}: {err}", "✗".red());
        }
    }

    println!(
        "{}",
        "✓ All CSVs processed and loaded into Redshift.".green()
    );
    Ok(())
}

/// Upload every CSV under its base name. Upload errors are logged per file
/// and do not halt the run.
async fn upload_files(config: &PipelineConfig, services: &PipelineServices, files: &[PathBuf]) {
    let mut uploaded = 0;
    for path in files {
        let key = file_name(path);
        match services
            .object_store
            .upload_file(&config.bucket, &key, path)
            .await
        {
            Ok(()) => {
                println!(
                    "  {} {} → s3://{}/{}",
                    "✓".green(),
                    key,
                    config.bucket,
                    key
                );
                uploaded += 1;
            }
            Err(err) => {
                tracing::warn!(file = %key, error = %err, "upload failed");
                eprintln!("  {} upload failed for {key}: {err}", "✗".red());
            }
        }
    }
    if uploaded == 0 {
        println!("  no CSV files found in the directory");
    } else {
        println!("  uploaded {uploaded} file(s)");
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// CSV files in the source directory, sorted by name so runs are
/// deterministic.
fn csv_files(directory: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().map(|ext| ext == "csv").unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
