use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rail_core::{Event, RunId, Session, SimContent, StartConfig, StatusReport, TrainSlot};
use rail_world::{load_content, load_start_config};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "rail_cli", about = "Headless rail hazard simulation runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one configuration to completion with a fixed time step.
    Run {
        /// Run configuration (same shape as the daemon's /start body).
        #[arg(long)]
        config: PathBuf,
        #[arg(long, default_value = "./content")]
        content_dir: String,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Seconds per step. Clamped to the content's max_step_seconds.
        #[arg(long, default_value_t = 0.5)]
        dt: f64,
        #[arg(long, default_value_t = 10_000)]
        max_steps: u64,
        /// Raise a fire alarm at this station before starting. Repeatable.
        #[arg(long = "hazard")]
        hazards: Vec<String>,
        /// Log a status line every N steps (0 disables).
        #[arg(long, default_value_t = 10)]
        print_every: u64,
    },
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct RunSummary {
    run_id: Option<RunId>,
    seed: u64,
    steps: u64,
    simulated_seconds: f64,
    /// Where each train actually ran, after fire-alarm redirection.
    routes: Vec<Route>,
    status: StatusReport,
}

#[derive(Debug, Serialize)]
struct Route {
    train: TrainSlot,
    start: String,
    dest: String,
}

struct RunOptions {
    seed: u64,
    dt: f64,
    max_steps: u64,
    print_every: u64,
}

fn log_events(events: &[Event], step: u64) {
    for event in events {
        tracing::info!(step, "{event}");
    }
}

fn run(
    content: &SimContent,
    config: &StartConfig,
    hazards: &[String],
    options: &RunOptions,
) -> Result<RunSummary> {
    if options.dt <= 0.0 {
        bail!("--dt must be positive, got {}", options.dt);
    }
    let dt = options.dt.min(content.constants.max_step_seconds);
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let now = Instant::now();
    let mut session = Session::new(now);

    for station in hazards {
        if !session.set_hazard(station, true, &content.network) {
            tracing::warn!(%station, "unknown station, alarm ignored");
        }
    }

    let events = session.start(config, content, &mut rng, now);
    log_events(&events, 0);

    let mut steps = 0;
    while session.is_running() && steps < options.max_steps {
        let events = session.step(dt, &content.constants);
        steps += 1;
        log_events(&events, steps);
        if options.print_every > 0 && steps.is_multiple_of(options.print_every) {
            let status = session.status();
            tracing::info!(
                step = steps,
                active = status.active_trains,
                total_distance_km = status.total_distance,
                "progress"
            );
        }
    }
    if session.is_running() {
        tracing::warn!(steps, "stopped at --max-steps before all trains arrived");
    }

    Ok(RunSummary {
        run_id: session.run_id(),
        seed: options.seed,
        steps,
        simulated_seconds: steps as f64 * dt,
        routes: session
            .trains()
            .iter()
            .map(|train| Route {
                train: train.slot,
                start: train.start_station.clone(),
                dest: train.dest_station.clone(),
            })
            .collect(),
        status: session.status(),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rail_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            content_dir,
            seed,
            dt,
            max_steps,
            hazards,
            print_every,
        } => {
            let content = load_content(&content_dir)?;
            let start_config = load_start_config(&config)?;
            let options = RunOptions {
                seed,
                dt,
                max_steps,
                print_every,
            };
            let summary = run(&content, &start_config, &hazards, &options)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
