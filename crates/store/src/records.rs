use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::record::{NewPropertyRecord, PropertyRecord};
use crate::{SupabaseConfig, error_message};

/// The properties table. Inserts run with the caller's own credential so
/// row-level policies see the real user.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn insert(&self, access_token: &str, record: &NewPropertyRecord) -> Result<PropertyRecord>;
}

#[derive(Clone)]
pub struct RestPropertyStore {
    config: SupabaseConfig,
    table: String,
    client: reqwest::Client,
}

impl RestPropertyStore {
    pub const DEFAULT_TABLE: &'static str = "properties";

    pub fn new(config: SupabaseConfig) -> Self {
        Self::with_table(config, Self::DEFAULT_TABLE.to_string())
    }

    pub fn with_table(config: SupabaseConfig, table: String) -> Self {
        Self {
            config,
            table,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PropertyStore for RestPropertyStore {
    async fn insert(&self, access_token: &str, record: &NewPropertyRecord) -> Result<PropertyRecord> {
        let url = self.config.endpoint(&format!("rest/v1/{}", self.table));

        let response = self.client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .header("Prefer", "return=representation")
            // single-object response instead of a one-element array
            .header("Accept", "application/vnd.pgrst.object+json")
            .json(record)
            .send()
            .await
            .context("Database insert error: request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, table = %self.table, "Insert rejected");
            anyhow::bail!("Database insert error: {}", error_message(&body));
        }

        response
            .json()
            .await
            .context("Database insert error: unreadable row")
    }
}
