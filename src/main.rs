//! Coordinate Quest - headless script runner
//!
//! Loads a script file, runs it against the active actor, logs every event
//! and prints the final stage as JSON. Ctrl-C stops the run cooperatively.

use clap::Parser;
use tokio::runtime::Runtime;
use tokio::sync::broadcast::error::RecvError;

use coordinate_quest::core::error::{Result, SandboxError};
use coordinate_quest::core::{EngineConfig, Point};
use coordinate_quest::progress::{self, Progress};
use coordinate_quest::runner::{RunEvent, Session};
use coordinate_quest::script::ScriptFile;

/// Run a block script against the sandbox stage
#[derive(Parser, Debug)]
#[command(name = "coordinate-quest")]
#[command(about = "Run a go-to / glide-to / say script and report the score")]
struct Args {
    /// Script file (.toml with [[commands]] or .json)
    #[arg(long)]
    script: std::path::PathBuf,

    /// Engine config file (TOML)
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Theme id (1-6) selecting the starting character
    #[arg(long)]
    theme: Option<u32>,

    /// Starting x of the actor
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    actor_x: i32,

    /// Starting y of the actor
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    actor_y: i32,

    /// Target x, overrides the config
    #[arg(long, requires = "target_y", allow_hyphen_values = true)]
    target_x: Option<i32>,

    /// Target y, overrides the config
    #[arg(long, requires = "target_x", allow_hyphen_values = true)]
    target_y: Option<i32>,

    /// Playback speed multiplier (2.0 runs twice as fast)
    #[arg(long)]
    speed: Option<f64>,

    /// Random seed for deterministic target respawns
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coordinate_quest=info".into()),
        )
        .init();

    let args = Args::parse();
    let rt = Runtime::new()?;
    rt.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(speed) = args.speed {
        config.time_scale = 1.0 / speed;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let (Some(x), Some(y)) = (args.target_x, args.target_y) {
        config.initial_target = Point::new(x, y);
    }

    let session = Session::new(config)?;
    if let Some(id) = args.theme {
        let theme = progress::theme(id)
            .ok_or_else(|| SandboxError::InvalidConfig(format!("no theme with id {id}")))?;
        session.select_theme(theme);
    }

    let script = ScriptFile::load(&args.script)?.into_script();
    tracing::info!("Loaded {} commands from {}", script.len(), args.script.display());
    session.load_script(script);

    let actor = session.snapshot().active_actor;
    session.move_actor(actor, Point::new(args.actor_x, args.actor_y));

    let mut events = session.events();
    let Some(handle) = session.run(actor) else {
        tracing::warn!("Nothing to run");
        return print_snapshot(&session);
    };

    let mut tracker = Progress::new();
    let logger = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(RunEvent::CommandStarted { index, kind, .. }) => {
                    tracing::info!("Command {}: {}", index, kind.label())
                }
                Ok(RunEvent::Scored(score)) => {
                    if let Some(unlock) = tracker.record(score) {
                        tracing::info!("NEW CHARACTER UNLOCKED! {}", unlock.character);
                    }
                }
                Ok(RunEvent::Finished(_)) | Err(RecvError::Closed) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event log fell behind, {} events skipped", skipped)
                }
            }
        }
    });

    let stopper = session.clone();
    tokio::select! {
        report = handle.wait() => {
            let report = report?;
            tracing::info!(
                "{:?}: {} commands, {} points",
                report.outcome,
                report.executed,
                report.scores.len()
            );
            // Finished is already queued, so the logger drains and exits.
            logger.await?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, stopping run");
            stopper.stop();
            // The suspended run may not reach Finished before we exit.
            logger.abort();
        }
    }

    print_snapshot(&session)
}

fn print_snapshot(session: &Session) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}
