//! S3 blob store.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::types::ObjectCannedAcl;

use crate::store::{BlobStore, StorageError, StoredBlob, error_chain, join_url, validate_key};

/// Configuration for the S3 store.
#[derive(Clone, Debug)]
pub struct S3Config {
    /// S3 bucket name.
    pub bucket: String,
    /// AWS region.
    pub region: String,
    /// S3-compatible endpoint URL.
    pub endpoint: Option<String>,
    /// Base URL objects are served from (CDN or public bucket domain).
    pub public_base_url: Option<String>,
    /// Upload objects with the `public-read` canned ACL.
    pub public_read: bool,
}

/// Uploads documents to an S3 bucket.
pub struct S3BlobStore {
    client: Client,
    config: S3Config,
}

impl S3BlobStore {
    /// Create a store, loading AWS credentials from the environment.
    pub async fn connect(config: S3Config) -> Self {
        let client = build_client(&config).await;
        Self { client, config }
    }

    /// Public URL for an object key.
    pub(crate) fn object_url(config: &S3Config, key: &str) -> String {
        if let Some(base) = &config.public_base_url {
            join_url(base, key)
        } else if let Some(endpoint) = &config.endpoint {
            join_url(&format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket), key)
        } else {
            join_url(
                &format!("https://{}.s3.{}.amazonaws.com", config.bucket, config.region),
                key,
            )
        }
    }
}

async fn build_client(config: &S3Config) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;

    // Custom endpoints (LocalStack, MinIO) require path-style addressing
    // (endpoint/bucket/key) instead of virtual-hosted-style (bucket.endpoint/key).
    if config.endpoint.is_some() {
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();
        return Client::from_conf(s3_config);
    }

    Client::new(&sdk_config)
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredBlob, StorageError> {
        validate_key(key)?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(body.into())
            .content_type(content_type);
        if self.config.public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }
        request
            .send()
            .await
            .map_err(|e| StorageError::S3(error_chain(&e)))?;

        tracing::debug!(bucket = %self.config.bucket, key = %key, "Uploaded");

        Ok(StoredBlob {
            key: key.to_owned(),
            url: Self::object_url(&self.config, key),
        })
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> S3Config {
        S3Config {
            bucket: "docs".to_owned(),
            region: "eu-west-1".to_owned(),
            endpoint: None,
            public_base_url: None,
            public_read: false,
        }
    }

    #[test]
    fn object_url_default_aws_domain() {
        assert_eq!(
            S3BlobStore::object_url(&config(), "id/a.docx"),
            "https://docs.s3.eu-west-1.amazonaws.com/id/a.docx"
        );
    }

    #[test]
    fn object_url_custom_endpoint_is_path_style() {
        let config = S3Config {
            endpoint: Some("http://localhost:9000/".to_owned()),
            ..config()
        };
        assert_eq!(
            S3BlobStore::object_url(&config, "id/a.docx"),
            "http://localhost:9000/docs/id/a.docx"
        );
    }

    #[test]
    fn object_url_public_base_wins() {
        let config = S3Config {
            endpoint: Some("http://localhost:9000".to_owned()),
            public_base_url: Some("https://cdn.example.com".to_owned()),
            ..config()
        };
        assert_eq!(
            S3BlobStore::object_url(&config, "id/a b.docx"),
            "https://cdn.example.com/id/a%20b.docx"
        );
    }
}
