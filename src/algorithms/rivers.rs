//! Shared river bookkeeping for the downstream and drunken carvers.
//!
//! Both carvers follow the same outer loop: draw a river quota, pick spaced
//! start points on allowed tiles, build each river independently, then stamp
//! every accepted river onto the grid in a single final pass. Rivers never see
//! each other's tiles while being built; only start spacing interacts.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::placement::select_start;
use crate::grid::Grid;
use crate::tilemap::Coord;
use crate::tiles::{GroundTile, TileCode};

/// Steps a single river walk may take before it is abandoned.
pub const MAX_WALK_STEPS: usize = 1000;

/// Quota and placement rules common to both river carvers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverPlacement {
    /// Inclusive range for the number of rivers to attempt
    pub min_rivers: u32,
    pub max_rivers: u32,
    /// Start points must be strictly farther apart than this
    pub min_start_distance: u32,
    /// Tiles a river may start on
    pub start_tiles: Vec<TileCode>,
    /// Tile a river must reach to be kept
    pub water_tile: TileCode,
    /// Tile stamped along accepted rivers
    pub river_tile: TileCode,
}

impl Default for RiverPlacement {
    fn default() -> Self {
        Self {
            min_rivers: 3,
            max_rivers: 6,
            min_start_distance: 10,
            start_tiles: vec![GroundTile::Mountain.code(), GroundTile::Snow.code()],
            water_tile: GroundTile::DeepWater.code(),
            river_tile: GroundTile::River.code(),
        }
    }
}

impl RiverPlacement {
    /// Draw how many rivers to attempt. A reversed range uses `min_rivers`.
    pub fn draw_quota<R: Rng>(&self, rng: &mut R) -> usize {
        if self.max_rivers <= self.min_rivers {
            return self.min_rivers as usize;
        }
        rng.gen_range(self.min_rivers..=self.max_rivers) as usize
    }
}

/// A river under construction or accepted.
#[derive(Clone, Debug, PartialEq)]
pub struct River {
    pub start: Coord,
    /// Target cell, for rivers walking toward a known destination
    pub end: Option<Coord>,
    /// Every occupied cell
    pub cells: BTreeSet<Coord>,
    /// Cells in the order they were walked, starting at `start`
    pub path: Vec<Coord>,
}

impl River {
    pub fn new(start: Coord) -> Self {
        Self {
            start,
            end: None,
            cells: BTreeSet::from([start]),
            path: vec![start],
        }
    }

    pub fn with_end(start: Coord, end: Coord) -> Self {
        let mut river = River::new(start);
        river.end = Some(end);
        river.cells.insert(end);
        river
    }

    pub fn contains(&self, cell: Coord) -> bool {
        self.cells.contains(&cell)
    }

    pub(crate) fn visit(&mut self, cell: Coord) {
        self.cells.insert(cell);
        self.path.push(cell);
    }
}

/// How many rivers a carver attempted versus kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RiverReport {
    pub requested: usize,
    pub placed: usize,
}

/// Run the shared quota/placement loop with a carver-specific `build` step,
/// then stamp the accepted rivers onto the grid.
pub(crate) fn carve_rivers<R, F>(
    grid: &mut Grid,
    rng: &mut R,
    placement: &RiverPlacement,
    mut build: F,
) -> RiverReport
where
    R: Rng,
    F: FnMut(&Grid, &mut R, Coord) -> Option<River>,
{
    let mut candidates = grid.tiles_of_types(&placement.start_tiles);
    let requested = placement.draw_quota(rng);
    let mut rivers: Vec<River> = Vec::new();

    for _ in 0..requested {
        let placed: Vec<Coord> = rivers.iter().map(|r| r.start).collect();
        let Some(start) = select_start(rng, &mut candidates, &placed, placement.min_start_distance) else {
            tracing::debug!("no valid river start left after {} rivers", rivers.len());
            break;
        };

        match build(grid, rng, start) {
            Some(river) => rivers.push(river),
            None => tracing::debug!("river from ({}, {}) dropped", start.x, start.y),
        }
    }

    merge_rivers(grid, &rivers, placement.river_tile);

    RiverReport { requested, placed: rivers.len() }
}

/// Stamp every river cell onto the grid. Cells outside the grid are ignored.
pub fn merge_rivers(grid: &mut Grid, rivers: &[River], river_tile: TileCode) -> usize {
    let mut changed = 0;
    for cell in rivers.iter().flat_map(|r| r.cells.iter()) {
        if grid.set_tile(cell.x, cell.y, river_tile, true) {
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_river_contains_start_and_end() {
        let river = River::with_end(Coord::new(1, 1), Coord::new(4, 4));
        assert!(river.contains(Coord::new(1, 1)));
        assert!(river.contains(Coord::new(4, 4)));
        assert_eq!(river.path, vec![Coord::new(1, 1)]);
    }

    #[test]
    fn test_quota_within_range() {
        let placement = RiverPlacement { min_rivers: 2, max_rivers: 4, ..RiverPlacement::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..50 {
            let n = placement.draw_quota(&mut rng);
            assert!((2..=4).contains(&n));
        }
        let fixed = RiverPlacement { min_rivers: 3, max_rivers: 1, ..RiverPlacement::default() };
        assert_eq!(fixed.draw_quota(&mut rng), 3);
    }

    #[test]
    fn test_merge_ignores_outside_cells() {
        let mut grid = Grid::new(3, 3).unwrap();
        let mut river = River::new(Coord::new(0, 0));
        river.visit(Coord::new(-1, 0));
        river.visit(Coord::new(1, 0));
        let changed = merge_rivers(&mut grid, &[river], GroundTile::River.code());
        assert_eq!(changed, 2);
        assert_eq!(grid.count_of(GroundTile::River.code()), 2);
    }

    #[test]
    fn test_failed_builds_are_not_counted() {
        let mut grid = Grid::new(10, 10).unwrap();
        for x in 0..10 {
            grid.set_tile(x, 0, GroundTile::Mountain.code(), false);
        }
        let placement = RiverPlacement { min_rivers: 3, max_rivers: 3, min_start_distance: 0, ..RiverPlacement::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let report = carve_rivers(&mut grid, &mut rng, &placement, |_, _, _| None);
        assert_eq!(report, RiverReport { requested: 3, placed: 0 });
        assert_eq!(grid.count_of(GroundTile::River.code()), 0);
    }
}
