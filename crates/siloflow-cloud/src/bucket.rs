//! Object-store bucket provisioner

use crate::error::{CloudError, Result};
use crate::services::{BucketProbe, ObjectStore};
use siloflow_core::{DEFAULT_REGION, Probe, ensure};
use std::sync::Arc;
use std::time::Duration;

/// How often and how long to re-probe a freshly created bucket until the
/// store reports it as visible.
const VISIBILITY_POLL_INTERVAL: Duration = Duration::from_secs(5);
const VISIBILITY_POLL_ATTEMPTS: u32 = 20;

/// Ensures a storage bucket exists, creating it when absent.
pub struct BucketProvisioner {
    store: Arc<dyn ObjectStore>,
}

impl BucketProvisioner {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Ensure the bucket exists.
    ///
    /// Returns `true` when the bucket exists (already or after creation)
    /// and `false` on any non-recoverable condition: a forbidden probe, a
    /// creation failure, or a bucket that never becomes visible. Failures
    /// are logged, never raised; the caller decides whether a missing
    /// bucket is fatal for the run.
    pub async fn ensure_bucket(&self, name: &str, region: &str) -> bool {
        let result = ensure(
            || async {
                match self.store.head_bucket(name).await? {
                    BucketProbe::Exists => {
                        tracing::info!(bucket = name, "bucket already exists");
                        Ok(Probe::Found(()))
                    }
                    BucketProbe::Missing => Ok(Probe::Absent),
                    BucketProbe::Forbidden => Err(CloudError::Forbidden(name.to_string())),
                }
            },
            || self.create_and_wait(name, region),
        )
        .await;

        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(bucket = name, error = %err, "bucket provisioning failed");
                false
            }
        }
    }

    async fn create_and_wait(&self, name: &str, region: &str) -> Result<()> {
        tracing::info!(bucket = name, region, "creating bucket");

        // The default region rejects an explicit location constraint.
        let constraint = (region != DEFAULT_REGION).then_some(region);
        self.store
            .create_bucket(name, constraint)
            .await
            .map_err(|err| CloudError::BucketCreation(err.to_string()))?;

        for _ in 0..VISIBILITY_POLL_ATTEMPTS {
            if let Ok(BucketProbe::Exists) = self.store.head_bucket(name).await {
                tracing::info!(bucket = name, region, "bucket created");
                return Ok(());
            }
            tokio::time::sleep(VISIBILITY_POLL_INTERVAL).await;
        }

        Err(CloudError::Timeout(format!(
            "bucket '{name}' to become visible after creation"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeObjectStore;

    #[tokio::test]
    async fn existing_bucket_is_not_recreated() {
        let store = Arc::new(FakeObjectStore::with_bucket("reports"));
        let provisioner = BucketProvisioner::new(store.clone());

        assert!(provisioner.ensure_bucket("reports", "us-east-1").await);
        assert_eq!(store.create_calls(), 0);
    }

    #[tokio::test]
    async fn missing_bucket_is_created_without_constraint_in_default_region() {
        let store = Arc::new(FakeObjectStore::new());
        let provisioner = BucketProvisioner::new(store.clone());

        assert!(provisioner.ensure_bucket("reports", "us-east-1").await);
        assert_eq!(store.created_constraints(), vec![None]);
    }

    #[tokio::test]
    async fn missing_bucket_gets_location_constraint_outside_default_region() {
        let store = Arc::new(FakeObjectStore::new());
        let provisioner = BucketProvisioner::new(store.clone());

        assert!(provisioner.ensure_bucket("reports", "eu-west-1").await);
        assert_eq!(
            store.created_constraints(),
            vec![Some("eu-west-1".to_string())]
        );
    }

    #[tokio::test]
    async fn forbidden_bucket_returns_false_without_creating() {
        let store = Arc::new(FakeObjectStore::new());
        store.set_forbidden("reports");
        let provisioner = BucketProvisioner::new(store.clone());

        assert!(!provisioner.ensure_bucket("reports", "us-east-1").await);
        assert_eq!(store.create_calls(), 0);
    }

    #[tokio::test]
    async fn creation_failure_returns_false() {
        let store = Arc::new(FakeObjectStore::new());
        store.fail_creates();
        let provisioner = BucketProvisioner::new(store.clone());

        assert!(!provisioner.ensure_bucket("reports", "us-east-1").await);
    }
}
