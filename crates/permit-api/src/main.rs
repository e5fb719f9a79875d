//! # permit-api - Binary Entry Point
//!
//! `serve` starts the HTTP server and, unless disabled, the in-process
//! sweep scheduler. `sweep` runs only the scheduler (or a single sweep)
//! as a separate worker.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use permit_api::config::{AppConfig, LogFormat};
use permit_api::store::{MemoryPermitStore, PermitStore, PgPermitStore};
use permit_api::sweep::{self, SweepScheduler};
use permit_api::AppState;
use permit_state::ExpiryPolicy;

/// Residential parking permit service.
#[derive(Parser, Debug)]
#[command(name = "permit-api", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API (default).
    Serve(ServeArgs),
    /// Run the expiry sweep without the HTTP API.
    Sweep(SweepArgs),
}

#[derive(clap::Args, Debug, Default)]
struct ServeArgs {
    /// Bind port; overrides `PORT`.
    #[arg(long)]
    port: Option<u16>,
    /// Do not run the sweep scheduler in this process.
    #[arg(long)]
    no_sweep: bool,
}

#[derive(clap::Args, Debug, Default)]
struct SweepArgs {
    /// Run a single sweep and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;

    init_tracing(config.log_format);
    tracing::info!(?config, "configuration loaded");

    if config.broker_url.is_some() {
        tracing::info!("BROKER_URL is set but unused; the sweep runs on an in-process timer");
    }

    let policy = ExpiryPolicy::new(config.expiry_threshold)?;
    let store = connect_store(&config).await?;
    store.ping().await.context("permit store is not reachable")?;
    tracing::info!(store = store.backend(), "permit store ready");

    let result = match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => serve(&config, args, store.clone(), policy).await,
        Commands::Sweep(args) => run_sweep(&config, args, store.clone(), policy).await,
    };

    store.close().await;
    result
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn PermitStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PgPermitStore::connect(url, &config.database_name)
                .await
                .context("database initialization failed")?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set, running with the in-memory store. \
                 Permits will not survive restarts."
            );
            Ok(Arc::new(MemoryPermitStore::new()))
        }
    }
}

async fn serve(
    config: &AppConfig,
    args: ServeArgs,
    store: Arc<dyn PermitStore>,
    policy: ExpiryPolicy,
) -> anyhow::Result<()> {
    let state = AppState::with_store(store).with_expiry(policy);

    let scheduler =
        (!args.no_sweep).then(|| SweepScheduler::for_state(&state, config.sweep_interval));

    let port = args.port.unwrap_or(config.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "permit API listening");

    let app = permit_api::app(state);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await;
    }

    served.context("HTTP server error")
}

async fn run_sweep(
    config: &AppConfig,
    args: SweepArgs,
    store: Arc<dyn PermitStore>,
    policy: ExpiryPolicy,
) -> anyhow::Result<()> {
    let state = AppState::with_store(store).with_expiry(policy);

    if args.once {
        let expired = sweep::run_once(state.store.as_ref(), &state.expiry, &state.metrics).await?;
        tracing::info!(expired, store = state.store.backend(), "single sweep complete");
        return Ok(());
    }

    let scheduler = SweepScheduler::for_state(&state, config.sweep_interval);
    shutdown_signal().await;
    scheduler.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
