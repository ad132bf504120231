use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{SupabaseConfig, error_message};

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Access token plus the user it belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: Identity,
}

/// Resolves a bearer credential to the caller behind it
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, access_token: &str) -> Result<Identity>;
}

#[derive(Clone)]
pub struct SupabaseAuth {
    config: SupabaseConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Email/password sign-in, for clients that have no browser session
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.config.endpoint("auth/v1/token?grant_type=password");

        let response = self.client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .context("Failed to reach auth server")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Sign-in failed ({}): {}", status, error_message(&body));
        }

        response.json().await.context("Failed to parse sign-in response")
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn resolve(&self, access_token: &str) -> Result<Identity> {
        let url = self.config.endpoint("auth/v1/user");

        let response = self.client
            .get(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .context("Failed to reach auth server")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("User not found ({}): {}", status, error_message(&body));
        }

        response.json().await.context("Failed to parse user response")
    }
}
