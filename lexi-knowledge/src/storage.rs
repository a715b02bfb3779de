//! Supabase Storage client for the audio cache bucket.

use reqwest::header::CONTENT_TYPE;

use crate::errors::{KnowledgeError, KnowledgeResult};
use crate::store::auth_headers;

/// Key-value blob storage with public, durable references.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Whether an object with this key exists in the bucket.
    async fn exists(&self, key: &str) -> KnowledgeResult<bool>;

    /// Upload bytes under the key, overwriting any existing object.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> KnowledgeResult<()>;

    /// Durable public URL for the key.
    fn public_url(&self, key: &str) -> String;
}

/// Supabase Storage REST client scoped to one bucket.
#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(
        base_url: impl Into<String>,
        service_key: &str,
        bucket: impl Into<String>,
    ) -> KnowledgeResult<Self> {
        let client = reqwest::Client::builder()
            .default_headers(auth_headers(service_key)?)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        })
    }
}

#[async_trait::async_trait]
impl BlobStore for SupabaseStorage {
    async fn exists(&self, key: &str) -> KnowledgeResult<bool> {
        let url = format!("{}/storage/v1/object/list/{}", self.base_url, self.bucket);
        let body = serde_json::json!({ "prefix": "", "search": key });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(KnowledgeError::Storage {
                status: status.as_u16(),
                message,
            });
        }

        let objects: Vec<serde_json::Value> = response.json().await?;
        Ok(!objects.is_empty())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> KnowledgeResult<()> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(KnowledgeError::Storage {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }
}
