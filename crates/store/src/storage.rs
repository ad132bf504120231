use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;

use crate::{SupabaseConfig, error_message};

/// Bucketed object storage with public read URLs
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload `bytes` to `bucket/path`, replacing any existing object
    async fn upload(
        &self,
        access_token: &str,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    fn public_url(&self, bucket: &str, path: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct SupabaseStorage {
    config: SupabaseConfig,
    client: reqwest::Client,
}

impl SupabaseStorage {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// `{base}/{bucket}/{path...}` with every segment percent-encoded
    fn object_url(&self, base: &str, bucket: &str, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint(base))
            .with_context(|| format!("Invalid storage URL: {}", self.config.url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Storage URL cannot take a path: {}", self.config.url))?
            .push(bucket)
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        access_token: &str,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let url = self.object_url("storage/v1/object", bucket, path)?;

        let response = self.client
            .post(url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .header("x-upsert", "true")
            .header("cache-control", "max-age=3600")
            .header("content-type", content_type)
            .body(bytes)
            .send()
            .await
            .context("Failed to reach storage")?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{}", error_message(&body));
        }

        tracing::debug!(bucket, path, "Uploaded object");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String> {
        Ok(self.object_url("storage/v1/object/public", bucket, path)?.to_string())
    }
}
