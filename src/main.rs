//! Windowed entry point: loads tuning, installs logging and runs the game.

use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use brood::{init_logging, spawn_world, BroodPlugin, GameConfig, PresentationPlugin};
use clap::Parser;
use log::info;

/// Lead the lost ducklings home
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON file overriding the default tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible world and duckling behaviour
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ducklings to scatter
    #[arg(long)]
    ducklings: Option<u32>,
}

fn load_config(args: &Args) -> anyhow::Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(count) = args.ducklings {
        config.world.total_ducklings = count;
    }
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = load_config(&args)?;
    let world_settings = config.world.clone();

    let mut app = App::new();
    config.insert_into(&mut app);
    app.add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .add_plugins((BroodPlugin, PresentationPlugin));

    let summary = spawn_world(app.world_mut(), &world_settings).context("setting up the world")?;
    info!(
        "Find all {} ducklings and lead them to the nest!",
        summary.ducklings
    );

    if app.run().is_error() {
        anyhow::bail!("game exited with an error");
    }
    Ok(())
}
