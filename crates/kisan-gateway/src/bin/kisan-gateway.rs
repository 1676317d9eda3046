//! Kisan Gateway Binary
//!
//! HTTP gateway serving crop timing, yield, weather and speech advice.
//!
//! # Usage
//! ```bash
//! GEMINI_API_KEY=... kisan-gateway [--port 8787] [--host 127.0.0.1] [--config gateway.toml] [--verbose]
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kisan_gateway::{Gateway, GatewayConfig};
use tracing_subscriber::EnvFilter;

/// Kisan Gateway - Agricultural advice over HTTP
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (default: 8787)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (default: 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(args.verbose)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let mut config = match &args.config {
        Some(path) => GatewayConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GatewayConfig::default(),
    };
    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    config.advisor = config
        .advisor
        .apply_env(|key| std::env::var(key).ok())
        .context("reading advisor settings from the environment")?;

    print_banner(&config);

    let gateway = Gateway::new(config).context("GEMINI_API_KEY or GOOGLE_API_KEY must be set")?;
    gateway.start().await?;

    Ok(())
}

fn print_banner(config: &GatewayConfig) {
    println!();
    println!("Kisan Gateway v{}", kisan_gateway::VERSION);
    println!("   └─ http://{}:{}", config.host, config.port);
    println!();
    println!("Models");
    println!("   ├─ advice  {}", config.advisor.text_model);
    println!("   └─ speech  {}", config.advisor.speech_model);
    println!();
    println!("HTTP Endpoints");
    println!("   ├─ POST /api/crop-timing");
    println!("   ├─ POST /api/yield-prediction");
    println!("   ├─ POST /api/weather-advice");
    println!("   ├─ POST /api/speech");
    println!("   ├─ GET  /api/forecast");
    println!("   ├─ GET  /api/languages");
    println!("   └─ GET  /health");
    println!();
    println!("Press Ctrl+C to stop the gateway");
    println!();
}
