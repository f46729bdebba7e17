//! Launcher: parses the command line, loads optional config files and starts
//! the windowed game.

use std::path::PathBuf;

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;

use bubble_trap::common::tunables::Tunables;
use bubble_trap::game::{self, GameSetup};
use bubble_trap::plugins::audio::AudioOut;
use bubble_trap::plugins::audio::wav::WavCapture;
use bubble_trap::plugins::level::{LaunchOptions, LevelCatalog};

#[derive(Parser)]
#[command(name = "bubble-trap")]
#[command(about = "Single-screen platformer: trap enemies in bubbles, pop them for combos")]
struct Args {
    /// Level to start (unknown ids start level 1)
    #[arg(short, long, default_value_t = 1)]
    level: u32,

    /// TOML file with `[[level]]` tables replacing the built-in levels
    #[arg(long)]
    levels: Option<PathBuf>,

    /// TOML file overriding gameplay constants
    #[arg(long)]
    tunables: Option<PathBuf>,

    /// Record every synthesized tone to this WAV file
    #[arg(long)]
    capture_audio: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let tunables = match &args.tunables {
        Some(path) => Tunables::load(path)
            .with_context(|| format!("loading tunables from {}", path.display()))?,
        None => Tunables::default(),
    };

    let catalog = match &args.levels {
        Some(path) => LevelCatalog::load(path)
            .with_context(|| format!("loading levels from {}", path.display()))?,
        None => LevelCatalog::builtin(),
    };

    let audio = match &args.capture_audio {
        Some(path) => AudioOut::with_sink(
            WavCapture::create(path)
                .with_context(|| format!("creating audio capture {}", path.display()))?,
        ),
        None => AudioOut::default(),
    };

    let exit = game::run(GameSetup {
        options: LaunchOptions {
            start_level: args.level,
        },
        tunables,
        catalog,
        audio,
    });

    if let AppExit::Error(code) = exit {
        anyhow::bail!("game exited with code {code}");
    }
    Ok(())
}
