//! IAM identity-service adapter

use async_trait::async_trait;
use siloflow_cloud::error::{CloudError, Result};
use siloflow_cloud::services::IdentityService;

pub struct IamIdentityService {
    client: aws_sdk_iam::Client,
}

impl IamIdentityService {
    pub fn new(client: aws_sdk_iam::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityService for IamIdentityService {
    async fn get_role_arn(&self, name: &str) -> Result<Option<String>> {
        match self.client.get_role().role_name(name).send().await {
            Ok(output) => {
                let role = output
                    .role()
                    .ok_or_else(|| CloudError::Identity("get_role returned no role".into()))?;
                Ok(Some(role.arn().to_string()))
            }
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_no_such_entity_exception() {
                    Ok(None)
                } else {
                    Err(CloudError::Identity(service_error.to_string()))
                }
            }
        }
    }

    async fn create_role(
        &self,
        name: &str,
        trust_policy: &str,
        description: &str,
    ) -> Result<String> {
        let output = self
            .client
            .create_role()
            .role_name(name)
            .assume_role_policy_document(trust_policy)
            .description(description)
            .send()
            .await
            .map_err(|err| CloudError::Identity(err.to_string()))?;

        output
            .role()
            .map(|role| role.arn().to_string())
            .ok_or_else(|| CloudError::Identity("create_role returned no role".into()))
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        self.client
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|err| CloudError::Identity(err.to_string()))?;
        Ok(())
    }
}
