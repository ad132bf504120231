use anyhow::{Context, Result};
use std::str::FromStr;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub log_format: LogFormat,
    pub supabase: SupabaseSettings,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
}

#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" | "" => Ok(LogFormat::Pretty),
            other => anyhow::bail!("Unknown LOG_FORMAT: {}", other),
        }
    }
}

impl AppConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:3000";

    /// Read from the process environment, after loading `.env` if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            bind_addr: optional("BIND_ADDR", Self::DEFAULT_BIND_ADDR),
            log_format: optional("LOG_FORMAT", "pretty").parse()?,
            supabase: SupabaseSettings {
                url: required("SUPABASE_URL")?,
                anon_key: required("SUPABASE_ANON_KEY")?,
            },
            llm: LlmConfig {
                api_key: required("OPENAI_API_KEY")?,
                base_url: optional("OPENAI_BASE_URL", extract::OpenAiClient::DEFAULT_BASE_URL),
                model: optional("OPENAI_MODEL", extract::OpenAiClient::DEFAULT_MODEL),
            },
        })
    }
}
