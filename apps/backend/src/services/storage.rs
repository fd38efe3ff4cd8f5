//! S3/R2 object storage for course documents and certificate snapshots.

use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client, Config,
};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 error: {0}")]
    S3(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Object is not valid UTF-8: {0}")]
    Encoding(String),
}

/// Object storage client for an S3-compatible bucket.
///
/// Configured from environment variables:
/// - S3_BUCKET: bucket name
/// - S3_REGION: region ("auto" for Cloudflare R2)
/// - S3_ENDPOINT: custom endpoint URL (required for R2)
/// - S3_ACCESS_KEY / S3_SECRET_KEY: credentials
pub struct StorageService {
    client: Client,
    bucket: String,
}

impl StorageService {
    pub async fn from_env() -> Result<Self, StorageError> {
        let bucket = require_env("S3_BUCKET")?;
        let access_key = require_env("S3_ACCESS_KEY")?;
        let secret_key = require_env("S3_SECRET_KEY")?;
        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "auto".to_string());
        let endpoint = std::env::var("S3_ENDPOINT").ok();

        let credentials = Credentials::new(access_key, secret_key, None, None, "env");

        let mut builder = Config::builder()
            .region(Region::new(region))
            .credentials_provider(credentials)
            .behavior_version_latest();

        if let Some(endpoint_url) = endpoint {
            builder = builder.endpoint_url(endpoint_url);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket,
        })
    }

    /// Store a text document, returning its key.
    pub async fn put_text(
        &self,
        key: &str,
        content: &str,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(content.as_bytes().to_vec()));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        tracing::info!("Stored object: {}", key);
        Ok(key.to_string())
    }

    /// Fetch a text document by key.
    pub async fn get_text(&self, key: &str) -> Result<String, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.contains("NoSuchKey") || message.contains("not found") {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::S3(message)
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?
            .into_bytes();

        String::from_utf8(bytes.to_vec()).map_err(|_| StorageError::Encoding(key.to_string()))
    }

    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        tracing::info!("Deleted object: {}", key);
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let message = e.to_string();
                if message.contains("NotFound") || message.contains("not found") {
                    Ok(false)
                } else {
                    Err(StorageError::S3(message))
                }
            }
        }
    }

    /// Key for an uploaded course document.
    pub fn resource_key(course_id: Uuid, file_name: &str) -> String {
        format!("courses/{}/{}", course_id, file_name.trim_start_matches('/'))
    }

    /// Key for an issued certificate snapshot.
    pub fn certificate_key(serial: &str) -> String {
        format!("certificates/{}.json", serial)
    }
}

fn require_env(name: &str) -> Result<String, StorageError> {
    std::env::var(name).map_err(|_| StorageError::Config(format!("{} not set", name)))
}

/// SHA-256 hex digest of a document, for change detection.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
