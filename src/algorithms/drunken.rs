//! Drunken rivers: a biased random walk from a start point to the nearest water.
//!
//! The walk always closes the gap on both axes, moving diagonally when it can.
//! Whenever it lines up with the target on one axis it may wander sideways for a
//! few cells first, which keeps straight runs from looking ruled.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::rivers::{carve_rivers, River, RiverPlacement, RiverReport, MAX_WALK_STEPS};
use crate::grid::Grid;
use crate::tilemap::Coord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrunkenRiverCarver {
    #[serde(flatten)]
    pub placement: RiverPlacement,
    /// Percent chance (0-100) to drift sideways when lined up with the target
    pub drift_chance: u32,
}

impl Default for DrunkenRiverCarver {
    fn default() -> Self {
        Self {
            placement: RiverPlacement::default(),
            drift_chance: 40,
        }
    }
}

impl DrunkenRiverCarver {
    pub fn apply(&self, grid: &mut Grid, seed: u64) -> RiverReport {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let water = self.placement.water_tile;
        let drift_chance = self.drift_chance;

        carve_rivers(grid, &mut rng, &self.placement, |grid, rng, start| {
            let Some(end) = grid.closest_tile_of_type(start, water) else {
                tracing::debug!("no water tile to run toward");
                return None;
            };
            trace_drunken(rng, start, end, drift_chance)
        })
    }
}

/// Walk from `start` to `end`, drifting sideways with `drift_chance` percent
/// probability whenever the walk is axis-aligned with `end`.
///
/// Random draws per aligned step, in order: the drift roll (0-99), then on a
/// drift the length (1-3) and the direction. Returns `None` if `end` is not
/// reached within [`MAX_WALK_STEPS`] iterations.
pub fn trace_drunken<R: Rng>(rng: &mut R, start: Coord, end: Coord, drift_chance: u32) -> Option<River> {
    let mut river = River::with_end(start, end);
    let mut cursor = start;
    let mut steps = 0;

    while cursor != end {
        if steps >= MAX_WALK_STEPS {
            return None;
        }
        steps += 1;

        let dx = cursor.x - end.x;
        let dy = cursor.y - end.y;

        if dx == 0 || dy == 0 {
            let roll = rng.gen_range(0..100u32);
            if roll < drift_chance {
                let length = rng.gen_range(1..=3);
                let direction = if rng.gen_range(0..2) == 0 { -1 } else { 1 };
                for _ in 0..length {
                    if dx == 0 {
                        cursor.x += direction;
                    } else {
                        cursor.y += direction;
                    }
                    river.visit(cursor);
                }
            }
        }

        // Guide toward the end using the offsets from before any drift
        if dx != 0 {
            cursor.x -= dx.signum();
            river.visit(cursor);
        }
        if dy != 0 {
            cursor.y -= dy.signum();
            river.visit(cursor);
        }
    }

    Some(river)
}
