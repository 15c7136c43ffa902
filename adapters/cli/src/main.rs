#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Synaptic Wars session.

mod script;

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use synaptic_wars_core::{
    config::GameConfig, duration_millis, Command, Event, GameSnapshot, Sample,
};
use synaptic_wars_system_session::Session;
use synaptic_wars_world::query;
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

use crate::script::Script;

/// Headless driver for the neuro-adaptive game loop.
#[derive(Debug, Parser)]
#[command(name = "synaptic-wars", version, about)]
struct CliArgs {
    /// TOML file overriding the built-in tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Root seed for every random stream; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run for.
    #[arg(long, default_value_t = 30.0)]
    duration: f32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
    /// Initial EEG simulation mode (dynamic, focused, stressed, relaxed).
    #[arg(long, value_name = "MODE")]
    mode: Option<String>,
    /// TOML input script with timed key presses and commands.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Directory the session export is written to when the run ends.
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,
    /// Treat the remote classifier as unreachable and use local rules.
    #[arg(long)]
    offline: bool,
}

/// Entry point for the Synaptic Wars command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let config = load_config(&args)?;
    let mut script = match &args.script {
        Some(path) => Script::load(path)?,
        None => Script::default(),
    };

    let mut session = Session::new(config);
    println!("{}", query::welcome_banner(session.world()));
    session.set_sample_observer(Box::new(|sample: &Sample| -> Result<()> {
        trace!(?sample, "EEG sample");
        Ok(())
    }));

    let mut events = Vec::new();
    let mut commands = Vec::new();
    session.handle(Command::StartGame, &mut events);
    if let Some(mode) = args.mode.clone() {
        session.handle(Command::SetEegMode { mode }, &mut events);
    }
    let _ = report(&mut events);

    let dt = Duration::from_millis(args.tick_ms.max(1));
    let ticks = (args.duration.max(0.0) / dt.as_secs_f32()).ceil() as u64;
    let mut last = None;
    for _ in 0..ticks {
        script.advance(session.clock(), &mut commands);
        for command in commands.drain(..) {
            session.handle(command, &mut events);
        }
        session.tick(dt, script.keys(), &mut events);
        if let Some(snapshot) = report(&mut events) {
            last = Some(snapshot);
        }
        if !session.state().game_active {
            break;
        }
    }

    session.handle(Command::EndGame, &mut events);
    let _ = report(&mut events);
    if let Some(snapshot) = last {
        print_summary(&snapshot);
    }

    if let Some(dir) = &args.export_dir {
        let path = export(&session, dir)?;
        println!("Exported session data to {}", path.display());
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &CliArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            GameConfig::from_toml_str(&contents)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.offline {
        config.classifier.remote_available = false;
    }
    Ok(config)
}

/// Logs the buffered events and returns the latest published snapshot.
fn report(events: &mut Vec<Event>) -> Option<GameSnapshot> {
    let mut latest = None;
    for event in events.drain(..) {
        match event {
            Event::GameStateUpdate(snapshot) => latest = Some(*snapshot),
            Event::TanglerEliminated { tangler } => info!(%tangler, "tangler eliminated"),
            Event::EmotionalStateClassified { state } => info!(
                label = %state.label,
                intensity = state.intensity,
                narrative = %state.narrative,
                "emotional state"
            ),
            Event::AbilityRejected { reason } => info!(%reason, "ability rejected"),
            other => debug!(event = ?other, "session event"),
        }
    }
    latest
}

fn print_summary(snapshot: &GameSnapshot) {
    let performance = &snapshot.performance;
    println!("Score: {}", snapshot.state.score);
    println!("Energy: {:.1}/{:.1}", snapshot.state.player_energy, snapshot.state.max_energy);
    println!("Live Tanglers: {}", snapshot.tangler_count);
    println!(
        "Emotional state: {} ({:.0}%)",
        snapshot.emotional_state.label,
        snapshot.emotional_state.intensity * 100.0
    );
    println!(
        "Adaptations: {}/{} successful, engagement {:.2}, trend {:?}",
        performance.adaptation_success,
        performance.adaptation_total,
        performance.engagement_score,
        performance.emotional_trend
    );
}

fn export(session: &Session, dir: &Path) -> Result<PathBuf> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before the Unix epoch")?;
    let document = session.export(duration_millis(now));
    let json = document
        .to_json()
        .context("failed to serialize session export")?;

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(document.file_name());
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
