//! Hegemon self-play - run an all-AI game headless and print a summary.
//!
//! `RUST_LOG=hegemon_core=debug` shows every AI decision.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use hegemon_core::{
    protocol::{Civilization, Event, PlayerId},
    EngineConfig, GameEngine, JsonFilePersistence, PlayerSpec, ScatterMapSource,
};

const CIVS: [Civilization; 6] = [
    Civilization::Rome,
    Civilization::Egypt,
    Civilization::Greece,
    Civilization::China,
    Civilization::Mongolia,
    Civilization::England,
];

#[derive(Parser)]
#[command(name = "hegemon-selfplay")]
#[command(about = "Run an all-AI Hegemon game", version)]
struct Cli {
    /// Engine config (YAML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map width in tiles
    #[arg(long, default_value_t = 40)]
    width: u32,

    /// Map height in tiles
    #[arg(long, default_value_t = 30)]
    height: u32,

    /// Number of AI players
    #[arg(short, long, default_value_t = 4)]
    players: usize,

    /// Stop after this many rounds even without a winner
    #[arg(short, long, default_value_t = 200)]
    turns: u32,

    /// Override the configured seed
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for autosaves; saving is off when omitted
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("hegemon_core=debug")
        } else {
            EnvFilter::new("hegemon_core=info")
        }
    });
    fmt().with_env_filter(filter).with_target(false).init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let specs: Vec<PlayerSpec> = (0..cli.players)
        .map(|i| PlayerSpec::ai(format!("AI {}", i + 1), CIVS[i % CIVS.len()]))
        .collect();
    let mut source = ScatterMapSource::new(cli.width, cli.height, config.seed);
    let mut engine = GameEngine::start(config, &mut source, &specs).context("starting game")?;
    if let Some(dir) = cli.save_dir {
        engine = engine.with_persistence(Box::new(JsonFilePersistence::new(dir)));
    }

    let mut battles = 0usize;
    let mut captures = 0usize;
    engine.add_observer(Box::new(move |event: &Event| {
        if let Event::GameEnded { winner, kind, turn } = event {
            info!(?winner, ?kind, turn, "game ended");
        }
    }));

    while !engine.is_over() && engine.turn() < cli.turns {
        let events = engine.end_turn().context("ending turn")?;
        for event in &events {
            match event {
                Event::CombatResolved { .. } => battles += 1,
                Event::CityCaptured { .. } => captures += 1,
                _ => {}
            }
        }
        let violations = engine.state().invariant_violations();
        anyhow::ensure!(
            violations.is_empty(),
            "board inconsistent at turn {}: {}",
            engine.turn(),
            violations.join("; ")
        );
    }

    println!("Hegemon self-play");
    println!("  rounds played: {}", engine.turn());
    match engine.outcome() {
        Some(outcome) => {
            let winner = outcome
                .winner
                .and_then(|w| engine.state().player(w))
                .map_or("nobody", |p| p.name.as_str());
            println!("  result:        {:?} victory for {winner} on turn {}", outcome.kind, outcome.turn);
        }
        None => println!("  result:        undecided"),
    }
    println!("  battles:       {battles}");
    println!("  captures:      {captures}");
    println!();
    println!("  {:<8} {:>6} {:>6} {:>6} {:>6}", "player", "cities", "units", "techs", "score");
    for p in &engine.state().players {
        let id: PlayerId = p.id;
        println!(
            "  {:<8} {:>6} {:>6} {:>6} {:>6}{}",
            p.name,
            engine.state().city_count(id),
            engine.state().units_of(id).count(),
            p.techs.len(),
            engine.score(id).total(),
            if p.alive { "" } else { "  (eliminated)" }
        );
    }
    Ok(())
}
