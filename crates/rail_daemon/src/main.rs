mod routes;
mod state;
mod views;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rail_world::load_content;
use state::{AppState, SimState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rail_daemon", about = "Rail hazard simulation HTTP daemon")]
struct Cli {
    #[arg(long, default_value = "./content")]
    content_dir: String,
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// Seed for train speed jitter and run ids. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Origin allowed to call the API from a browser.
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {err}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rail_daemon=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let content = load_content(&cli.content_dir)
        .with_context(|| format!("loading content from {}", cli.content_dir))?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        stations = content.network.stations.len(),
        network_version = %content.network.network_version,
        "content loaded"
    );

    let app_state = AppState {
        sim: Arc::new(Mutex::new(SimState::new(
            content,
            ChaCha8Rng::seed_from_u64(seed),
            seed,
        ))),
    };
    let app = routes::make_router_with_cors(app_state, &cli.cors_origin)?;

    let listener = tokio::net::TcpListener::bind((cli.bind.as_str(), cli.port))
        .await
        .with_context(|| format!("binding {}:{}", cli.bind, cli.port))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;
    tracing::info!("shut down");
    Ok(())
}
