//! Grid: a size×size arena of cells, row-major, with 4-neighbour adjacency derived from
//! row/column arithmetic.

use crate::error::{ConfigError, Result};
use crate::flood::Region;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Index;

/// Palette index of a cell colour.
pub type ColorId = u8;

/// Every colour the game knows, in selection order. A game with `n` colours uses the first `n`.
pub const PALETTE: [&str; 8] = [
    "red", "green", "blue", "cyan", "magenta", "yellow", "orange", "pink",
];

pub const MIN_COLORS: u8 = 3;
pub const MAX_COLORS: u8 = PALETTE.len() as u8;

/// Largest board edge; keeps cell counts and terminal coordinates in range.
pub const MAX_GRID_SIZE: usize = 256;

/// The anchor cell of the controlled region.
pub const ORIGIN: usize = 0;

pub fn color_name(color: ColorId) -> &'static str {
    PALETTE.get(color as usize).copied().unwrap_or("unknown")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub color: ColorId,
    /// Set by a flood for every cell of the new region, cleared once the reveal has recoloured it.
    pub flooded: bool,
}

/// Supplies one colour per cell while a grid is built.
pub trait ColorSource: std::fmt::Debug {
    /// Returns a colour in `0..num_colors`.
    fn next_color(&mut self, num_colors: u8) -> ColorId;
}

/// Deterministic colour assignment: the same seed always builds the same boards.
#[derive(Debug, Clone)]
pub struct SeededColors {
    rng: ChaCha8Rng,
}

impl SeededColors {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ColorSource for SeededColors {
    fn next_color(&mut self, num_colors: u8) -> ColorId {
        self.rng.gen_range(0..num_colors.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a size×size grid, asking `colors` for one colour per cell in row-major order.
    pub fn build(size: usize, num_colors: u8, colors: &mut dyn ColorSource) -> Result<Self> {
        if size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                requested: size,
                max: MAX_GRID_SIZE,
            });
        }
        let cells = (0..size * size)
            .map(|_| Cell {
                color: colors.next_color(num_colors),
                flooded: false,
            })
            .collect();
        Ok(Self { size, cells })
    }

    /// Cells per row (and per column).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[cfg(test)]
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }

    /// (row, col) of a cell index.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    pub fn left(&self, index: usize) -> Option<usize> {
        (index < self.len() && index % self.size > 0).then(|| index - 1)
    }

    pub fn top(&self, index: usize) -> Option<usize> {
        (index < self.len() && index >= self.size).then(|| index - self.size)
    }

    pub fn right(&self, index: usize) -> Option<usize> {
        (index < self.len() && index % self.size + 1 < self.size).then(|| index + 1)
    }

    pub fn bottom(&self, index: usize) -> Option<usize> {
        (index + self.size < self.len()).then(|| index + self.size)
    }

    /// Neighbours in the order left, top, right, bottom; absent at the edges.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> {
        [
            self.left(index),
            self.top(index),
            self.right(index),
            self.bottom(index),
        ]
        .into_iter()
        .flatten()
    }

    pub fn set_color(&mut self, index: usize, color: ColorId) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.color = color;
        }
    }

    pub fn set_flooded(&mut self, index: usize, flooded: bool) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.flooded = flooded;
        }
    }

    /// Raise the flooded flag on every member of `region`.
    pub fn mark_flooded(&mut self, region: &Region) {
        for index in region.iter() {
            self.set_flooded(index, true);
        }
    }
}

impl Index<usize> for Grid {
    type Output = Cell;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}

/// Replays a fixed colour script, wrapping around when it runs out.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedColors {
    script: Vec<ColorId>,
    next: usize,
}

#[cfg(test)]
impl ScriptedColors {
    pub fn new(script: &[ColorId]) -> Self {
        Self {
            script: script.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl ColorSource for ScriptedColors {
    fn next_color(&mut self, _num_colors: u8) -> ColorId {
        let color = self.script[self.next % self.script.len()];
        self.next += 1;
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: usize, colors: &[ColorId]) -> Grid {
        Grid::build(size, 3, &mut ScriptedColors::new(colors)).unwrap()
    }

    #[test]
    fn test_build_rejects_empty_grid() {
        let err = Grid::build(0, 3, &mut ScriptedColors::new(&[0])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyGrid);
    }

    #[test]
    fn test_build_rejects_oversized_grid() {
        let err = Grid::build(MAX_GRID_SIZE + 1, 3, &mut ScriptedColors::new(&[0])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::GridTooLarge {
                requested: MAX_GRID_SIZE + 1,
                max: MAX_GRID_SIZE
            }
        );
        assert!(Grid::build(usize::MAX, 3, &mut ScriptedColors::new(&[0])).is_err());
    }

    #[test]
    fn test_build_assigns_colours_row_major() {
        let g = grid(2, &[0, 1, 2, 1]);
        assert_eq!(g.len(), 4);
        assert_eq!(g[g.index_of(0, 0).unwrap()].color, 0);
        assert_eq!(g[g.index_of(0, 1).unwrap()].color, 1);
        assert_eq!(g[g.index_of(1, 0).unwrap()].color, 2);
        assert_eq!(g[g.index_of(1, 1).unwrap()].color, 1);
        assert!(g.cells().iter().all(|c| !c.flooded));
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbours() {
        let g = grid(1, &[2]);
        assert_eq!(g.neighbors(ORIGIN).count(), 0);
    }

    #[test]
    fn test_neighbours_at_edges() {
        let g = grid(3, &[0]);
        assert_eq!(g.neighbors(0).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(g.neighbors(4).collect::<Vec<_>>(), vec![3, 1, 5, 7]);
        assert_eq!(g.neighbors(8).collect::<Vec<_>>(), vec![7, 5]);
        assert_eq!(g.right(2), None);
        assert_eq!(g.left(3), None);
        assert_eq!(g.bottom(6), None);
        assert_eq!(g.top(2), None);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let g = grid(5, &[0]);
        for i in 0..g.len() {
            if let Some(r) = g.right(i) {
                assert_eq!(g.left(r), Some(i));
            }
            if let Some(b) = g.bottom(i) {
                assert_eq!(g.top(b), Some(i));
            }
        }
    }

    #[test]
    fn test_position_round_trips_index() {
        let g = grid(4, &[0]);
        assert_eq!(g.position(6), (1, 2));
        assert_eq!(g.index_of(1, 2), Some(6));
        assert_eq!(g.index_of(4, 0), None);
    }

    #[test]
    fn test_seeded_colours_are_reproducible() {
        let a = Grid::build(6, 5, &mut SeededColors::new(7)).unwrap();
        let b = Grid::build(6, 5, &mut SeededColors::new(7)).unwrap();
        assert_eq!(a, b);
        assert!(a.cells().iter().all(|c| c.color < 5));
    }
}
