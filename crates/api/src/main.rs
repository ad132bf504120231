mod config;
mod error;
mod import;
mod metrics;
mod routes;
mod state;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, LogFormat};
use extract::{OpenAiClient, PropertyExtractor};
use ingest::HttpPdfFetcher;
use metrics::Metrics;
use state::AppState;
use store::{RestPropertyStore, SupabaseAuth, SupabaseConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);

    let supabase = SupabaseConfig::new(config.supabase.url.clone(), config.supabase.anon_key.clone());

    // Create completion client
    let llm_client = OpenAiClient::new(
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        config.llm.api_key.clone(),
    );

    let state = Arc::new(AppState {
        identity: Arc::new(SupabaseAuth::new(supabase.clone())),
        store: Arc::new(RestPropertyStore::new(supabase)),
        fetcher: Arc::new(HttpPdfFetcher::default()),
        extractor: PropertyExtractor::new(Arc::new(llm_client)),
        metrics: Metrics::new(),
    });

    // Build router
    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!(model = %config.llm.model, "Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
