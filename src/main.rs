//! Flooditui: the Flood-It colour flooding puzzle in the terminal.

mod app;
mod error;
mod flood;
mod game;
mod grid;
mod input;
mod logging;
mod propagate;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use error::ConfigError;
use game::GameState;
use grid::{MAX_COLORS, MAX_GRID_SIZE, MIN_COLORS};
use std::time::Duration;

/// Everything a game needs at construction; fixed for the whole session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Cells per row and per column.
    pub grid_size: usize,
    /// How many palette colours are in play (the first `num_colors` of the palette).
    pub num_colors: u8,
    /// Budget divisor: moves = grid_size / difficulty * num_colors.
    pub difficulty: usize,
    /// Simulated time per clock tick; one reveal ring per tick.
    pub tick_interval: Duration,
    /// Seed of the board colour stream.
    pub seed: u64,
}

impl GameConfig {
    pub fn validate(&self) -> error::Result<()> {
        if !(MIN_COLORS..=MAX_COLORS).contains(&self.num_colors) {
            return Err(ConfigError::ColorCount {
                requested: self.num_colors,
                min: MIN_COLORS,
                max: MAX_COLORS,
            });
        }
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                requested: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        if self.difficulty == 0 {
            return Err(ConfigError::ZeroDifficulty);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        logging::init(path, args.verbose.log_level_filter())?;
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|err| {
        log::warn!("theme not loaded, using defaults: {}", err);
        theme::Theme::default_for_palette(args.palette)
    });
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("board seed {}", seed);
    let config = GameConfig {
        grid_size: args.size,
        num_colors: args.colors,
        difficulty: args.difficulty,
        tick_interval: Duration::from_secs_f64(1.0 / args.tick_rate.clamp(1.0, 1000.0)),
        seed,
    };
    let state = GameState::new(config).context("cannot start game")?;
    let mut app = App::new(state, theme, args.no_animation);
    app.run()?;
    Ok(())
}

/// Flood-It in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "flooditui",
    version,
    about = "Flood-It in the terminal. Repaint the top-left region until the whole board is one colour.",
    long_about = "Flooditui is a terminal version of the Flood-It puzzle.\n\n\
        Every move repaints the region you control (grown from the top-left cell) with a new \
        colour; neighbouring cells of that colour join the region. Unify the board before the \
        move budget runs out.\n\n\
        CONTROLS:\n  1-8          Choose colour     Arrows/hjkl  Move cursor\n  Enter/Space  Choose colour under cursor     Mouse click  Choose clicked colour\n  R            New board         P            Pause      Q / Esc    Quit"
)]
pub struct Args {
    /// Board size: cells per row and column.
    #[arg(short, long, default_value = "22", value_name = "CELLS")]
    pub size: usize,

    /// Number of colours in play (3 to 8).
    #[arg(short, long, default_value = "6", value_name = "N")]
    pub colors: u8,

    /// Difficulty divisor: the move budget is size / difficulty * colours.
    #[arg(short, long, default_value = "3", value_name = "N")]
    pub difficulty: usize,

    /// Seed for board generation. Random if not set.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Clock ticks per second (stopwatch and flood reveal).
    #[arg(long, default_value = "100.0", value_name = "RATE", value_parser = parse_tick_rate)]
    pub tick_rate: f64,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the fade shown when a game is lost.
    #[arg(long)]
    pub no_animation: bool,

    /// Write log output to this file (the terminal itself is used by the game).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

/// Ticks per second: a finite number above zero.
fn parse_tick_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("tick rate must be a positive finite number, got `{s}`"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
