use s3::creds::Credentials;
use s3::{Bucket, Region};
use uuid::Uuid;

/// S3-compatible object store for generated images.
///
/// Persistence is an optimization: callers must absorb any failure here and
/// keep the inline payload instead.
pub struct ImageStore {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl ImageStore {
    pub fn new(
        bucket_name: &str,
        endpoint: &str,
        access_key: &str,
        secret_key: &str,
        public_base_url: &str,
    ) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: "auto".to_string(),
            endpoint: endpoint.to_string(),
        };

        let credentials = Credentials::new(Some(access_key), Some(secret_key), None, None, None)
            .map_err(|e| StorageError::Config(e.to_string()))?;

        let bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self {
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload image bytes under a fresh key; returns the durable public URL.
    pub async fn store(&self, data: &[u8], content_type: &str) -> Result<String, StorageError> {
        let key = format!("tryon/{}.jpg", Uuid::new_v4());
        self.bucket
            .put_object_with_content_type(&key, data, content_type)
            .await
            .map_err(StorageError::S3)?;
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("S3 operation failed: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("Storage configuration error: {0}")]
    Config(String),
}
