use anyhow::Context;
use clap::Parser;
use showcase_core::ShowcaseCore;
use showcase_core::types::{AppConfig, Config};
use showcase_server::{AppState, router};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "showcase", about = "Admin backend for the showcase website")]
struct Cli {
    /// Path to the TOML config file. Defaults apply when it does not exist.
    #[arg(long, default_value = "showcase.toml")]
    config: PathBuf,

    /// Overrides `server.bind` from the config file.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("showcase error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let mut app_config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(bind) = cli.bind {
        app_config.server.bind = bind;
    }

    let problems = app_config.validate();
    for problem in &problems {
        tracing::warn!(%problem, "invalid config value replaced with default");
    }
    if !problems.is_empty() {
        app_config = app_config.with_defaults_for_invalid();
    }

    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .context("invalid bind address")?;
    let max_upload_bytes = usize::try_from(app_config.server.max_upload_bytes).unwrap_or(usize::MAX);

    let core = ShowcaseCore::open(Config::from(&app_config)).context("failed to open storage")?;
    let app = router(AppState::new(core), max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SHOWCASE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
