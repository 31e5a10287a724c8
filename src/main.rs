//! Payroll engine server backed by an in-memory store.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;

#[derive(Debug, Parser)]
#[command(name = "payroll-engine")]
#[command(about = "Payroll computation and finalization service")]
struct Args {
    /// Configuration directory (contains engine.yaml and optional seed.yaml)
    #[arg(long, default_value = "./config/payroll")]
    config: PathBuf,

    /// Address to bind, overriding server.bind from engine.yaml
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("payroll_engine=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = ConfigLoader::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let addr = match args.bind {
        Some(addr) => addr,
        None => config
            .config()
            .server
            .bind
            .parse()
            .with_context(|| format!("invalid server.bind '{}'", config.config().server.bind))?,
    };

    info!(
        engine = %config.engine().name,
        version = %config.engine().version,
        seeded = config.seed().is_some(),
        "starting payroll-engine"
    );

    let app = create_router(AppState::in_memory(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
