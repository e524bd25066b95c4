//! Game state: board, controlled region, move budget, reveal scheduling, stopwatch.

use crate::GameConfig;
use crate::error::Result;
use crate::flood::{Region, flood};
use crate::grid::{ColorId, ColorSource, Grid, ORIGIN, SeededColors, color_name};
use crate::propagate::Propagation;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Ongoing,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Why a colour choice did not become a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    Finished,
    Revealing,
    SameColor,
    UnknownColor,
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// `absorbed` counts cells that joined the region with this move.
    Accepted { absorbed: usize },
    Ignored(Ignored),
}

#[derive(Debug)]
pub struct GameState {
    config: GameConfig,
    colors: Box<dyn ColorSource>,
    grid: Grid,
    region: Region,
    propagation: Propagation,
    /// Colour of the controlled region (the target of the latest move).
    current_color: ColorId,
    moves_used: u32,
    elapsed: Duration,
    outcome: Outcome,
}

impl GameState {
    /// New game whose boards are drawn from the config's seed.
    pub fn new(config: GameConfig) -> Result<Self> {
        let colors = Box::new(SeededColors::new(config.seed));
        Self::with_colors(config, colors)
    }

    pub fn with_colors(config: GameConfig, mut colors: Box<dyn ColorSource>) -> Result<Self> {
        config.validate()?;
        let grid = Grid::build(config.grid_size, config.num_colors, colors.as_mut())?;
        let mut state = Self {
            config,
            colors,
            region: Region::origin(grid.len()),
            propagation: Propagation::new(grid.len()),
            current_color: grid[ORIGIN].color,
            grid,
            moves_used: 0,
            elapsed: Duration::ZERO,
            outcome: Outcome::Ongoing,
        };
        state.derive_initial_region();
        log::info!(
            "new game: {}x{} board, {} colours, budget {}",
            state.config.grid_size,
            state.config.grid_size,
            state.config.num_colors,
            state.budget()
        );
        Ok(state)
    }

    fn derive_initial_region(&mut self) {
        self.current_color = self.grid[ORIGIN].color;
        self.region = flood(
            &self.grid,
            &Region::origin(self.grid.len()),
            self.current_color,
        );
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn is_controlled(&self, index: usize) -> bool {
        self.region.contains(index)
    }

    pub fn current_color(&self) -> ColorId {
        self.current_color
    }

    pub fn palette_len(&self) -> u8 {
        self.config.num_colors
    }

    pub fn moves_used(&self) -> u32 {
        self.moves_used
    }

    /// Moves allowed: grid size / difficulty divisor, times the number of colours.
    pub fn budget(&self) -> u32 {
        move_budget(
            self.config.grid_size,
            self.config.difficulty,
            self.config.num_colors,
        )
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// True while the latest move is still being revealed.
    pub fn is_revealing(&self) -> bool {
        !self.propagation.is_idle()
    }

    pub fn pending_reveal(&self) -> usize {
        self.propagation.pending()
    }

    /// Pointer input: choose the colour of the cell at `index`.
    pub fn choose_cell(&mut self, index: usize) -> MoveOutcome {
        match self.grid.cell(index) {
            Some(cell) => self.choose_color(cell.color),
            None => self.ignore(Ignored::OutOfRange),
        }
    }

    /// Paint the controlled region `color`. Ignored unless the game is ongoing, the previous move
    /// has finished revealing and the colour is a different palette colour.
    pub fn choose_color(&mut self, color: ColorId) -> MoveOutcome {
        if self.outcome.is_finished() {
            return self.ignore(Ignored::Finished);
        }
        if self.is_revealing() {
            return self.ignore(Ignored::Revealing);
        }
        if color >= self.config.num_colors {
            return self.ignore(Ignored::UnknownColor);
        }
        if color == self.current_color {
            return self.ignore(Ignored::SameColor);
        }

        let region = flood(&self.grid, &self.region, color);
        let absorbed = region.len() - self.region.len();
        self.grid.mark_flooded(&region);
        self.region = region;
        self.current_color = color;
        self.moves_used += 1;
        self.propagation.start(ORIGIN, color);

        let budget = self.budget();
        log::info!(
            "move {}/{}: {} absorbs {} cells ({} of {} controlled)",
            self.moves_used,
            budget,
            color_name(color),
            absorbed,
            self.region.len(),
            self.grid.len()
        );

        if self.region.is_full() && self.moves_used <= budget {
            self.outcome = Outcome::Won;
        } else if self.moves_used > budget {
            self.outcome = Outcome::Lost;
        }
        if self.outcome.is_finished() {
            log::info!(
                "game {:?} after {} moves in {}",
                self.outcome,
                self.moves_used,
                format_elapsed(self.elapsed)
            );
        }
        MoveOutcome::Accepted { absorbed }
    }

    fn ignore(&self, reason: Ignored) -> MoveOutcome {
        log::debug!("colour choice ignored: {:?}", reason);
        MoveOutcome::Ignored(reason)
    }

    /// Fresh board from the same colour stream; counters, stopwatch and outcome start over.
    pub fn reset(&mut self) -> Result<()> {
        self.grid = Grid::build(
            self.config.grid_size,
            self.config.num_colors,
            self.colors.as_mut(),
        )?;
        self.propagation.clear();
        self.derive_initial_region();
        self.moves_used = 0;
        self.elapsed = Duration::ZERO;
        self.outcome = Outcome::Ongoing;
        log::info!("board reset");
        Ok(())
    }

    /// One clock tick: the stopwatch always runs, the reveal advances one ring if one is pending.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed += dt;
        if !self.propagation.is_idle() {
            self.propagation.advance(&mut self.grid);
        }
    }
}

pub fn move_budget(grid_size: usize, difficulty: usize, num_colors: u8) -> u32 {
    (grid_size / difficulty.max(1)) as u32 * u32::from(num_colors)
}

/// Minutes and zero-padded seconds; fractions of a second are dropped.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
