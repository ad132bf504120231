use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use store::{IdentityProvider, Session, SupabaseAuth, SupabaseConfig, SupabaseStorage};
use uploader::{FunctionClient, SelectedFile, UploadForm, Uploader};

/// Upload a real-estate listing PDF and import it as a property record
#[derive(Parser, Debug)]
#[command(name = "upload", version)]
struct Args {
    /// PDF listing to import
    file: PathBuf,

    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: String,

    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    anon_key: String,

    /// Existing access token; takes precedence over email/password
    #[arg(long, env = "SUPABASE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[arg(long, env = "SUPABASE_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "SUPABASE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long, default_value = Uploader::DEFAULT_BUCKET)]
    bucket: String,

    #[arg(long, default_value = Uploader::DEFAULT_FUNCTION)]
    function: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` when the import itself failed and was already reported
async fn run(args: Args) -> Result<bool> {
    let config = SupabaseConfig::new(args.supabase_url, args.anon_key);
    let auth = SupabaseAuth::new(config.clone());

    let session = open_session(&auth, args.access_token, args.email, args.password).await?;

    let file = SelectedFile::from_path(&args.file).await?;
    let mut form = UploadForm::new();
    form.select(file);
    if let Some(notification) = form.notification() {
        eprintln!("❌ {}", notification.message());
        return Ok(false);
    }
    if let Some(selected) = form.selected() {
        println!("Selected file: {} ({})", selected.name, selected.size_label());
    }

    let uploader = Uploader::new(
        Arc::new(SupabaseStorage::new(config.clone())),
        FunctionClient::new(config),
        args.bucket,
        args.function,
    );

    println!("Processing document...");
    let notification = form.submit(&uploader, session.as_ref()).await;
    if notification.is_error() {
        eprintln!("❌ {}", notification.message());
        Ok(false)
    } else {
        println!("✅ {}", notification.message());
        Ok(true)
    }
}

/// No credentials at all is not an error here: the form reports it
async fn open_session(
    auth: &SupabaseAuth,
    access_token: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<Option<Session>> {
    if let Some(access_token) = access_token {
        let user = auth
            .resolve(&access_token)
            .await
            .context("Access token rejected")?;
        return Ok(Some(Session { access_token, user }));
    }

    match (email, password) {
        (Some(email), Some(password)) => {
            let session = auth.sign_in_with_password(&email, &password).await?;
            Ok(Some(session))
        }
        _ => Ok(None),
    }
}
