//! S3 object-store adapter

use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use siloflow_cloud::error::{CloudError, Result};
use siloflow_cloud::services::{BucketProbe, ObjectStore};
use std::path::Path;

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_bucket(&self, name: &str) -> Result<BucketProbe> {
        match self.client.head_bucket().bucket(name).send().await {
            Ok(_) => Ok(BucketProbe::Exists),
            Err(SdkError::ServiceError(context)) => {
                let status = context.raw().status().as_u16();
                if context.err().is_not_found() || status == 404 {
                    Ok(BucketProbe::Missing)
                } else if status == 403 {
                    Ok(BucketProbe::Forbidden)
                } else {
                    Err(CloudError::ObjectStore(format!(
                        "head_bucket on '{name}' returned status {status}"
                    )))
                }
            }
            Err(err) => Err(CloudError::ObjectStore(err.to_string())),
        }
    }

    async fn create_bucket(&self, name: &str, location_constraint: Option<&str>) -> Result<()> {
        let mut request = self.client.create_bucket().bucket(name);
        if let Some(region) = location_constraint {
            let configuration = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build();
            request = request.create_bucket_configuration(configuration);
        }
        request
            .send()
            .await
            .map_err(|err| CloudError::ObjectStore(err.to_string()))?;
        Ok(())
    }

    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|err| CloudError::ObjectStore(format!("cannot read '{}': {err}", path.display())))?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|err| CloudError::ObjectStore(err.to_string()))?;
        tracing::debug!(bucket, key, "uploaded object");
        Ok(())
    }
}
