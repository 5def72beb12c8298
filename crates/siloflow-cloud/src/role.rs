//! Access-role provisioner

use crate::error::{CloudError, Result};
use crate::services::IdentityService;
use siloflow_core::{Probe, ensure};
use std::sync::Arc;

/// Managed read-only policy attached to a freshly created role.
pub const S3_READ_ONLY_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AmazonS3ReadOnlyAccess";

const ROLE_DESCRIPTION: &str = "Allows Redshift to access S3 for COPY operations";

/// Trust policy granting the warehouse service permission to assume the role.
fn trust_policy() -> serde_json::Value {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": "redshift.amazonaws.com" },
            "Action": "sts:AssumeRole"
        }]
    })
}

/// Ensures an identity role with the warehouse trust policy and read-only
/// storage access exists.
pub struct RoleProvisioner {
    identity: Arc<dyn IdentityService>,
}

impl RoleProvisioner {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self { identity }
    }

    /// Ensure the role exists and return its ARN.
    ///
    /// An existing role is returned untouched; its trust policy and
    /// attachments are never re-validated. A missing role is created and
    /// gets the read-only storage policy attached. Any lookup failure other
    /// than "not found" is fatal, as is any creation or attachment failure.
    pub async fn ensure_role(&self, name: &str) -> Result<String> {
        ensure(
            || async {
                match self.identity.get_role_arn(name).await? {
                    Some(arn) => {
                        tracing::info!(role = name, "role already exists");
                        Ok(Probe::Found(arn))
                    }
                    None => Ok(Probe::Absent),
                }
            },
            || self.create_role(name),
        )
        .await
    }

    async fn create_role(&self, name: &str) -> Result<String> {
        tracing::info!(role = name, "creating role");

        let document = trust_policy().to_string();
        let arn = self
            .identity
            .create_role(name, &document, ROLE_DESCRIPTION)
            .await
            .map_err(|err| CloudError::RoleCreation(format!("'{name}': {err}")))?;
        tracing::info!(role = name, arn = %arn, "role created");

        self.identity
            .attach_role_policy(name, S3_READ_ONLY_POLICY_ARN)
            .await
            .map_err(|err| CloudError::PolicyAttachment(format!("'{name}': {err}")))?;
        tracing::info!(role = name, policy = S3_READ_ONLY_POLICY_ARN, "policy attached");

        Ok(arn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeIdentityService;

    #[tokio::test]
    async fn existing_role_returns_arn_without_mutation() {
        let identity = Arc::new(FakeIdentityService::with_role(
            "loader",
            "arn:aws:iam::123456789012:role/loader",
        ));
        let provisioner = RoleProvisioner::new(identity.clone());

        let arn = provisioner.ensure_role("loader").await.unwrap();
        assert_eq!(arn, "arn:aws:iam::123456789012:role/loader");
        assert_eq!(identity.create_calls(), 0);
        assert!(identity.attachments().is_empty());
    }

    #[tokio::test]
    async fn missing_role_is_created_and_policy_attached() {
        let identity = Arc::new(FakeIdentityService::new());
        let provisioner = RoleProvisioner::new(identity.clone());

        let arn = provisioner.ensure_role("loader").await.unwrap();
        assert!(arn.ends_with("role/loader"));
        assert_eq!(identity.create_calls(), 1);
        assert_eq!(
            identity.attachments(),
            vec![("loader".to_string(), S3_READ_ONLY_POLICY_ARN.to_string())]
        );
    }

    #[tokio::test]
    async fn second_ensure_reuses_the_first_arn() {
        let identity = Arc::new(FakeIdentityService::new());
        let provisioner = RoleProvisioner::new(identity.clone());

        let first = provisioner.ensure_role("loader").await.unwrap();
        let second = provisioner.ensure_role("loader").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(identity.create_calls(), 1);
        assert_eq!(identity.attachments().len(), 1);
    }

    #[tokio::test]
    async fn trust_policy_names_the_warehouse_service() {
        let document = trust_policy();
        assert_eq!(
            document["Statement"][0]["Principal"]["Service"],
            "redshift.amazonaws.com"
        );
        assert_eq!(document["Statement"][0]["Action"], "sts:AssumeRole");
    }
}
