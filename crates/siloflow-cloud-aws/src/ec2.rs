//! EC2 security-group adapter

use async_trait::async_trait;
use aws_sdk_ec2::error::ProvideErrorMetadata;
use aws_sdk_ec2::types::{IpPermission, IpRange};
use siloflow_cloud::error::{CloudError, Result};
use siloflow_cloud::services::{IngressOutcome, NetworkSecurity};
use siloflow_core::IngressRule;

/// EC2 reports an already-present rule with this error code.
const DUPLICATE_PERMISSION: &str = "InvalidPermission.Duplicate";

pub struct Ec2NetworkSecurity {
    client: aws_sdk_ec2::Client,
}

impl Ec2NetworkSecurity {
    pub fn new(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NetworkSecurity for Ec2NetworkSecurity {
    async fn authorize_ingress(&self, rule: &IngressRule) -> Result<IngressOutcome> {
        let range = IpRange::builder()
            .cidr_ip(&rule.cidr_ip)
            .description(&rule.description)
            .build();
        let permission = IpPermission::builder()
            .ip_protocol("tcp")
            .from_port(rule.port as i32)
            .to_port(rule.port as i32)
            .ip_ranges(range)
            .build();

        match self
            .client
            .authorize_security_group_ingress()
            .group_id(&rule.security_group_id)
            .ip_permissions(permission)
            .send()
            .await
        {
            Ok(_) => Ok(IngressOutcome::Authorized),
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.meta().code() == Some(DUPLICATE_PERMISSION) {
                    Ok(IngressOutcome::AlreadyExists)
                } else {
                    Err(CloudError::NetworkSecurity(service_error.to_string()))
                }
            }
        }
    }
}
