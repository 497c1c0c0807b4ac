//! Height-threshold terrain classification.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::heightmap::NoiseSettings;
use crate::tilemap::Tilemap;
use crate::tiles::{GroundTile, TileCode};

/// Cells at or below `height` (and above the previous threshold) become `tile`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub height: f32,
    pub tile: TileCode,
}

impl Threshold {
    pub fn new(height: f32, tile: impl Into<TileCode>) -> Self {
        Self { height, tile: tile.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseClassifier {
    pub noise: NoiseSettings,
    /// Subtract the radial island mask before classifying
    pub apply_island_mask: bool,
    /// Any order; sorted by height before use
    pub thresholds: Vec<Threshold>,
}

impl Default for NoiseClassifier {
    fn default() -> Self {
        Self {
            noise: NoiseSettings::default(),
            apply_island_mask: true,
            thresholds: vec![
                Threshold::new(0.25, GroundTile::DeepWater),
                Threshold::new(0.32, GroundTile::ShallowWater),
                Threshold::new(0.38, GroundTile::Beach),
                Threshold::new(0.6, GroundTile::Grass),
                Threshold::new(0.7, GroundTile::Dirt),
                Threshold::new(0.85, GroundTile::Mountain),
                Threshold::new(1.0, GroundTile::Snow),
            ],
        }
    }
}

impl NoiseClassifier {
    pub fn apply(&self, grid: &mut Grid, seed: u64) -> usize {
        let heightmap = self.noise.heightmap(grid.width(), grid.height(), seed, self.apply_island_mask);
        classify(grid, &heightmap, &self.thresholds)
    }
}

/// Assign each cell the tile of the lowest threshold at or above its height.
///
/// There is no catch-all: a cell higher than every threshold keeps whatever
/// code it already had. Returns the number of cells that changed.
pub fn classify(grid: &mut Grid, heightmap: &Tilemap<f32>, thresholds: &[Threshold]) -> usize {
    let mut sorted = thresholds.to_vec();
    sorted.sort_by(|a, b| a.height.total_cmp(&b.height));

    let mut changed = 0;
    for x in 0..grid.width() as i32 {
        for y in 0..grid.height() as i32 {
            let Some(&height) = heightmap.get_checked(x, y) else {
                continue;
            };
            if let Some(threshold) = sorted.iter().find(|t| height <= t.height) {
                if grid.set_tile(x, y, threshold.tile, true) {
                    changed += 1;
                }
            }
        }
    }
    changed
}
