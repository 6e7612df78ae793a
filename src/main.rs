mod clock;
mod config;
mod egg;
mod game;
mod grid;
mod snake;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::config::Settings;
use crate::game::SnakeGame;
use crate::term::{install_panic_hook, TermManager};

pub type TermInt = u16;
pub type Coord = i32;
pub type Coords = (Coord, Coord);

fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    if let Some(path) = &settings.log_file {
        let file = File::create(path)
            .with_context(|| format!("Error creating log file {}", path.display()))?;
        WriteLogger::init(LevelFilter::Debug, Config::default(), file)
            .context("Error initializing logger")?;
    }

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("Starting eggsnake (seed: {:?})", settings.seed);

    install_panic_hook();
    let mut term = TermManager::new();
    term.setup()?;

    let mut game = SnakeGame::new(settings, rng);
    let res = game.play(&mut term);

    term.restore()?;
    res
}
