//! Downstream rivers: greedy steepest descent over a heightmap.
//!
//! From each start point the river repeatedly steps to the lowest orthogonal
//! neighbor it has not visited yet, until it reaches water. A river that
//! gets boxed in by its own cells, or runs out of steps, is discarded.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::rivers::{carve_rivers, River, RiverPlacement, RiverReport, MAX_WALK_STEPS};
use crate::grid::Grid;
use crate::heightmap::NoiseSettings;
use crate::tilemap::{Coord, Tilemap};
use crate::tiles::TileCode;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownstreamRiverCarver {
    #[serde(flatten)]
    pub placement: RiverPlacement,
    /// Heightmap the rivers descend. Usually the same settings as the
    /// terrain classifier so rivers follow the visible slopes, but it may differ.
    pub heightmap: NoiseSettings,
    pub apply_island_mask: bool,
}

impl DownstreamRiverCarver {
    pub fn apply(&self, grid: &mut Grid, seed: u64) -> RiverReport {
        let heightmap = self.heightmap.heightmap(grid.width(), grid.height(), seed, self.apply_island_mask);
        self.carve(grid, &heightmap, seed)
    }

    /// Place rivers descending a given heightmap.
    pub fn carve(&self, grid: &mut Grid, heightmap: &Tilemap<f32>, seed: u64) -> RiverReport {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let water = self.placement.water_tile;

        carve_rivers(grid, &mut rng, &self.placement, |grid, _, start| {
            trace_downstream(grid, heightmap, start, water)
        })
    }
}

/// Walk downhill from `start` until a `water` tile is reached.
///
/// Each step sorts the orthogonal neighbors by height (stable, so equal heights
/// keep left/right/up/down order) and takes the first one not already in the
/// river. When every neighbor is taken the river ends in a lake, which only
/// counts if the current cell is water. Gives up after [`MAX_WALK_STEPS`].
pub fn trace_downstream(grid: &Grid, heightmap: &Tilemap<f32>, start: Coord, water: TileCode) -> Option<River> {
    let mut river = River::new(start);
    let mut cursor = start;

    let height_at = |c: Coord| heightmap.get_checked(c.x, c.y).copied().unwrap_or(f32::INFINITY);

    for _ in 0..MAX_WALK_STEPS {
        let mut options: Vec<(Coord, f32)> = grid
            .neighbors4(cursor.x, cursor.y)
            .into_iter()
            .map(|(c, _)| (c, height_at(c)))
            .collect();
        options.sort_by(|a, b| a.1.total_cmp(&b.1));

        let Some(next) = options.into_iter().map(|(c, _)| c).find(|c| !river.contains(*c)) else {
            return (grid.get_tile(cursor.x, cursor.y) == water).then_some(river);
        };

        river.visit(next);
        cursor = next;

        if grid.get_tile(cursor.x, cursor.y) == water {
            return Some(river);
        }
    }

    None
}
