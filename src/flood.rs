//! Flood engine: which cells the player controls after repainting the region a new colour.

use crate::grid::{ColorId, Grid, ORIGIN};

/// Set of cell indices, one membership bit per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    members: Vec<bool>,
    len: usize,
}

impl Region {
    /// Region holding only the origin cell.
    pub fn origin(cells: usize) -> Self {
        let mut region = Self::empty(cells);
        region.insert(ORIGIN);
        region
    }

    fn empty(cells: usize) -> Self {
        Self {
            members: vec![false; cells],
            len: 0,
        }
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.members.get(index).copied().unwrap_or(false)
    }

    /// Returns true if `index` was not a member yet.
    pub fn insert(&mut self, index: usize) -> bool {
        match self.members.get_mut(index) {
            Some(bit) if !*bit => {
                *bit = true;
                self.len += 1;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when every cell of the grid is a member.
    pub fn is_full(&self) -> bool {
        self.len == self.members.len()
    }

    #[cfg(test)]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.iter().all(|index| self.contains(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(index, &member)| member.then_some(index))
    }
}

/// New controlled region after painting `controlled` with `target`.
///
/// Walks outward from the origin. A cell joins when it was already controlled or already has the
/// target colour; the walk continues only through cells that joined, so matching cells that are
/// not adjacent to the growing region stay outside.
pub fn flood(grid: &Grid, controlled: &Region, target: ColorId) -> Region {
    let mut region = Region::empty(grid.len());
    let mut visited = vec![false; grid.len()];
    let mut stack = vec![ORIGIN];
    visited[ORIGIN] = true;

    while let Some(index) = stack.pop() {
        if !controlled.contains(index) && grid[index].color != target {
            continue;
        }
        region.insert(index);
        for neighbor in grid.neighbors(index) {
            if !visited[neighbor] {
                visited[neighbor] = true;
                stack.push(neighbor);
            }
        }
    }
    region
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ScriptedColors;

    const RED: ColorId = 0;
    const GREEN: ColorId = 1;
    const BLUE: ColorId = 2;

    fn grid(size: usize, colors: &[ColorId]) -> Grid {
        Grid::build(size, 3, &mut ScriptedColors::new(colors)).unwrap()
    }

    /// Connected through members, starting at the origin.
    fn is_connected(grid: &Grid, region: &Region) -> bool {
        let mut seen = Region::empty(grid.len());
        let mut stack = vec![ORIGIN];
        seen.insert(ORIGIN);
        while let Some(i) = stack.pop() {
            for n in grid.neighbors(i) {
                if region.contains(n) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen == *region
    }

    #[test]
    fn test_region_insert_and_len() {
        let mut r = Region::origin(4);
        assert_eq!(r.len(), 1);
        assert!(r.contains(ORIGIN));
        assert!(r.insert(3));
        assert!(!r.insert(3));
        assert!(!r.insert(99));
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![0, 3]);
        assert!(!r.is_full());
    }

    #[test]
    fn test_flood_grows_through_new_matches() {
        // (0,0)=red (0,1)=blue
        // (1,0)=green (1,1)=green
        let g = grid(2, &[RED, BLUE, GREEN, GREEN]);
        let region = flood(&g, &Region::origin(4), GREEN);
        assert_eq!(region.iter().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert!(!region.contains(1));
    }

    #[test]
    fn test_flood_skips_isolated_matches() {
        // green at (0,2) is cut off from the origin by blue.
        let g = grid(3, &[RED, BLUE, GREEN, BLUE, BLUE, BLUE, GREEN, BLUE, GREEN]);
        let region = flood(&g, &Region::origin(9), GREEN);
        assert_eq!(region.len(), 1);
        assert!(region.contains(ORIGIN));
    }

    #[test]
    fn test_flood_keeps_controlled_cells_of_other_colours() {
        let g = grid(3, &[RED, RED, BLUE, GREEN, BLUE, BLUE, GREEN, GREEN, GREEN]);
        let start = flood(&g, &Region::origin(9), RED);
        assert_eq!(start.len(), 2);
        let next = flood(&g, &start, GREEN);
        assert!(next.is_superset(&start));
        assert_eq!(next.iter().collect::<Vec<_>>(), vec![0, 1, 3, 6, 7, 8]);
        assert!(is_connected(&g, &next));
    }

    #[test]
    fn test_flood_to_every_colour_covers_uniform_grid() {
        let g = grid(4, &[BLUE]);
        let region = flood(&g, &Region::origin(16), BLUE);
        assert!(region.is_full());
    }

    #[test]
    fn test_flood_is_monotonic_and_connected_on_random_boards() {
        use crate::grid::SeededColors;
        for seed in 0..20 {
            let g = Grid::build(8, 4, &mut SeededColors::new(seed)).unwrap();
            let mut region = flood(&g, &Region::origin(g.len()), g[ORIGIN].color);
            for step in 0..12u8 {
                let next = flood(&g, &region, step % 4);
                assert!(next.is_superset(&region));
                assert!(is_connected(&g, &next));
                region = next;
            }
        }
    }
}
