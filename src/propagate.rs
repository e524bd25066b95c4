//! Propagation: reveals a flood one breadth-first ring per tick, starting at the origin.

use crate::grid::{ColorId, Grid};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct Propagation {
    queue: VecDeque<usize>,
    /// queued[i] mirrors "i is in `queue`".
    queued: Vec<bool>,
    color: ColorId,
}

impl Propagation {
    pub fn new(cells: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(cells),
            queued: vec![false; cells],
            color: 0,
        }
    }

    /// Begin revealing `color` from `origin`. Any unfinished reveal is discarded.
    pub fn start(&mut self, origin: usize, color: ColorId) {
        self.clear();
        self.color = color;
        self.enqueue(origin);
    }

    pub fn clear(&mut self) {
        for index in self.queue.drain(..) {
            self.queued[index] = false;
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Cells waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[cfg(test)]
    pub fn queue(&self) -> impl Iterator<Item = usize> + '_ {
        self.queue.iter().copied()
    }

    fn enqueue(&mut self, index: usize) {
        if index >= self.queued.len() {
            self.queued.resize(index + 1, false);
        }
        if !self.queued[index] {
            self.queued[index] = true;
            self.queue.push_back(index);
        }
    }

    /// Recolour this tick's batch and queue their flooded neighbours. Returns the batch size.
    pub fn advance(&mut self, grid: &mut Grid) -> usize {
        let batch = self.queue.len();
        for _ in 0..batch {
            let Some(index) = self.queue.pop_front() else {
                break;
            };
            self.queued[index] = false;
            grid.set_color(index, self.color);
            grid.set_flooded(index, false);

            for neighbor in grid.neighbors(index) {
                if grid[neighbor].flooded {
                    self.enqueue(neighbor);
                }
            }
        }
        log::trace!("reveal tick: {} recoloured, {} pending", batch, self.queue.len());
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flood::{Region, flood};
    use crate::grid::{ORIGIN, ScriptedColors, SeededColors};

    fn grid(size: usize, colors: &[ColorId]) -> Grid {
        Grid::build(size, 3, &mut ScriptedColors::new(colors)).unwrap()
    }

    #[test]
    fn test_advance_reveals_one_ring() {
        // 0 1
        // 2 3   with 0, 1, 3 flooded and 2 left alone.
        let mut g = grid(2, &[0, 1, 2, 1]);
        for i in [0, 1, 3] {
            g.set_flooded(i, true);
        }
        let mut p = Propagation::new(4);
        p.start(ORIGIN, 1);

        assert_eq!(p.advance(&mut g), 1);
        assert_eq!(p.queue().collect::<Vec<_>>(), vec![1]);
        assert_eq!(g[0].color, 1);
        assert!(!g[0].flooded);
        assert!(g[1].flooded);
        assert!(g[3].flooded);

        assert_eq!(p.advance(&mut g), 1);
        assert_eq!(p.queue().collect::<Vec<_>>(), vec![3]);
        assert_eq!(p.advance(&mut g), 1);
        assert!(p.is_idle());
        assert_eq!(g[2].color, 2);
        assert!(g.cells().iter().all(|c| !c.flooded));
    }

    #[test]
    fn test_shared_neighbour_is_queued_once() {
        let mut g = grid(3, &[0]);
        for i in 0..9 {
            g.set_flooded(i, true);
        }
        let mut p = Propagation::new(9);
        p.start(ORIGIN, 2);
        assert_eq!(p.advance(&mut g), 1);
        assert_eq!(p.advance(&mut g), 2);
        // (1,1) is next to both (0,1) and (1,0).
        assert_eq!(p.queue().collect::<Vec<_>>(), vec![2, 4, 6]);
        assert_eq!(p.advance(&mut g), 3);
        assert_eq!(p.advance(&mut g), 2);
        assert_eq!(p.advance(&mut g), 1);
        assert!(p.is_idle());
        assert!(g.cells().iter().all(|c| c.color == 2 && !c.flooded));
    }

    #[test]
    fn test_idle_advance_is_a_no_op() {
        let mut g = grid(2, &[0, 1, 2, 0]);
        let before = g.clone();
        let mut p = Propagation::new(4);
        assert_eq!(p.advance(&mut g), 0);
        assert_eq!(g, before);
    }

    #[test]
    fn test_drains_to_exactly_the_flooded_region() {
        for seed in 0..10 {
            let mut g = Grid::build(10, 5, &mut SeededColors::new(seed)).unwrap();
            let start = flood(&g, &Region::origin(g.len()), g[ORIGIN].color);
            let target = (g[ORIGIN].color + 1) % 5;
            let region = flood(&g, &start, target);
            let outside: Vec<_> = (0..g.len())
                .filter(|&i| !region.contains(i))
                .map(|i| g[i].color)
                .collect();
            g.mark_flooded(&region);

            let mut p = Propagation::new(g.len());
            p.start(ORIGIN, target);
            let mut recoloured = 0;
            let mut ticks = 0;
            while !p.is_idle() {
                recoloured += p.advance(&mut g);
                ticks += 1;
                assert!(ticks <= g.len());
            }
            assert_eq!(recoloured, region.len());
            for i in region.iter() {
                assert_eq!(g[i].color, target);
            }
            let after: Vec<_> = (0..g.len())
                .filter(|&i| !region.contains(i))
                .map(|i| g[i].color)
                .collect();
            assert_eq!(outside, after);
            assert!(g.cells().iter().all(|c| !c.flooded));
        }
    }
}
