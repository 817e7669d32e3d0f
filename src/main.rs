use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use decision_helper::config::{self, Config, DEFAULT_LOG_FILTER};
use decision_helper::http::start_http_server;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "decision-helper", about = "Decision factors and recommendations over HTTP")]
struct Cli {
    /// Address to listen on (overrides DECISION_HTTP_BIND)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// TOML config path (overrides DECISION_HELPER_CONFIG)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Env file first so RUST_LOG and DECISION_HELPER_CONFIG from it take effect
    config::load_env_file(std::env::var("DECISION_ENV_FILE").ok().as_deref());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    if config.model.api_key.is_none() {
        warn!("GROQ_API_KEY not set; every answer will use the fallback payload");
    }
    info!(
        "Starting decision-helper (model {} via {})",
        config.model.model, config.model.api_url
    );

    start_http_server(Arc::new(config)).await?;
    Ok(())
}
