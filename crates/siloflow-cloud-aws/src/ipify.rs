//! Public IP resolution via api.ipify.org
//!
//! The one network call in the pipeline that goes to a third party outside
//! the provisioned services: a plain GET returning the caller's address as
//! text.

use async_trait::async_trait;
use siloflow_cloud::error::{CloudError, Result};
use siloflow_cloud::services::AddressResolver;

const IPIFY_URL: &str = "https://api.ipify.org";

pub struct IpifyResolver {
    client: reqwest::Client,
}

impl IpifyResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for IpifyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressResolver for IpifyResolver {
    async fn public_ip(&self) -> Result<String> {
        let response = self
            .client
            .get(IPIFY_URL)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| CloudError::AddressLookup(err.to_string()))?;

        let ip = response
            .text()
            .await
            .map_err(|err| CloudError::AddressLookup(err.to_string()))?
            .trim()
            .to_string();

        if ip.is_empty() {
            return Err(CloudError::AddressLookup(
                "address service returned an empty response".into(),
            ));
        }
        tracing::debug!(ip = %ip, "resolved caller public IP");
        Ok(ip)
    }
}
