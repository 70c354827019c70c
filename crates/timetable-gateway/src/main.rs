use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use timetable_core::TimetableConfig;
use timetable_gateway::app;
use timetable_table::Table;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "timetable-gateway", version, about = "Serve a CSV timetable over HTTP")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, env = "TIMETABLE_CONFIG")]
    config: Option<String>,

    /// CSV data file, overrides `dataset.path`
    #[arg(short, long)]
    data: Option<String>,

    /// Listen port, overrides `gateway.port`
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind address, overrides `gateway.bind`
    #[arg(long)]
    bind: Option<String>,
}

/// `--config` / TIMETABLE_CONFIG > ./timetable.toml > defaults.
/// An explicitly named file must load; only the implicit one may fall back.
fn load_config(explicit: Option<&str>) -> anyhow::Result<TimetableConfig> {
    match TimetableConfig::load(explicit) {
        Ok(config) => Ok(config),
        Err(e) if explicit.is_some() => {
            Err(e).context("failed to load the requested config file")
        }
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            Ok(TimetableConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "timetable_gateway=info,timetable_table=info,tower_http=debug".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.dataset.path = data;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if let Some(bind) = cli.bind {
        config.gateway.bind = bind;
    }

    // the dataset is required; a server without it has nothing to serve
    let table = Table::load(&config.dataset.path, &config.dataset)
        .with_context(|| format!("failed to load dataset {}", config.dataset.path))?;

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let state = Arc::new(app::AppState::new(config, table));
    let router = app::build_router(state);

    info!("Timetable gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
