//! Simple stochastic fills: uniform random tiles and per-cell feature scattering.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::tiles::{GroundTile, ObjectTile, TileCode};
use crate::world::Layer;

/// Fill every cell with a tile drawn uniformly from `palette`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformRandomFiller {
    pub palette: Vec<TileCode>,
}

impl Default for UniformRandomFiller {
    fn default() -> Self {
        Self {
            palette: GroundTile::all().iter().map(|t| t.code()).collect(),
        }
    }
}

impl UniformRandomFiller {
    pub fn apply(&self, grid: &mut Grid, seed: u64) -> usize {
        if self.palette.is_empty() {
            tracing::warn!("uniform random filler has an empty palette, skipping");
            return 0;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut changed = 0;
        for x in 0..grid.width() as i32 {
            for y in 0..grid.height() as i32 {
                let code = self.palette[rng.gen_range(0..self.palette.len())];
                if grid.set_tile(x, y, code, true) {
                    changed += 1;
                }
            }
        }
        changed
    }
}

/// One kind of feature and where it may appear
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRule {
    pub tile: TileCode,
    /// Source-layer tiles the feature may spawn on
    pub spawn_on: Vec<TileCode>,
    /// Percent chance (0-100) per eligible cell. 0 never spawns, 100 always does
    pub chance: u32,
}

/// Sprinkle features (trees, rocks...) over cells whose source-layer tile allows them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureScatterer {
    /// Layer whose tiles decide eligibility
    pub source_layer: Layer,
    /// Evaluated in order per cell; a later rule may overwrite an earlier one
    pub features: Vec<FeatureRule>,
}

impl Default for FeatureScatterer {
    fn default() -> Self {
        Self {
            source_layer: Layer::Ground,
            features: vec![
                FeatureRule {
                    tile: ObjectTile::Tree.code(),
                    spawn_on: vec![GroundTile::Grass.code()],
                    chance: 30,
                },
                FeatureRule {
                    tile: ObjectTile::PineTree.code(),
                    spawn_on: vec![GroundTile::Dirt.code(), GroundTile::Mountain.code()],
                    chance: 20,
                },
            ],
        }
    }
}

impl FeatureScatterer {
    /// Scatter onto `target`, reading eligibility from `source`. With no separate
    /// source the target grid is read as it is being written.
    ///
    /// One random draw per (cell, eligible rule), cells column by column.
    /// Returns the number of cells whose tile changed to a feature.
    pub fn apply(&self, source: Option<&Grid>, target: &mut Grid, seed: u64) -> usize {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut placed = 0;

        for x in 0..target.width() as i32 {
            for y in 0..target.height() as i32 {
                let mut changed = false;
                for rule in &self.features {
                    let ground = match source {
                        Some(grid) => grid.get_tile(x, y),
                        None => target.get_tile(x, y),
                    };
                    if !rule.spawn_on.contains(&ground) {
                        continue;
                    }
                    if rng.gen_range(0..100u32) < rule.chance && target.set_tile(x, y, rule.tile, true) {
                        changed = true;
                    }
                }
                if changed {
                    placed += 1;
                }
            }
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grass_grid(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height).unwrap();
        for x in 0..width as i32 {
            for y in 0..height as i32 {
                grid.set_tile(x, y, GroundTile::Grass.code(), false);
            }
        }
        grid
    }

    #[test]
    fn test_filler_uses_only_palette() {
        let mut grid = Grid::new(16, 16).unwrap();
        let filler = UniformRandomFiller { palette: vec![GroundTile::Beach.code(), GroundTile::Snow.code()] };
        filler.apply(&mut grid, 8);
        assert!(grid.tiles().iter().all(|c| filler.palette.contains(c)));
        assert!(grid.count_of(GroundTile::Beach.code()) > 0);
        assert!(grid.count_of(GroundTile::Snow.code()) > 0);
    }

    #[test]
    fn test_filler_empty_palette_is_noop() {
        let mut grid = Grid::new(4, 4).unwrap();
        assert_eq!(UniformRandomFiller { palette: vec![] }.apply(&mut grid, 1), 0);
        assert_eq!(grid.count_of(TileCode::EMPTY), 16);
    }

    #[test]
    fn test_scatter_respects_spawn_tiles() {
        let mut ground = grass_grid(10, 10);
        for y in 0..10 {
            ground.set_tile(0, y, GroundTile::DeepWater.code(), false);
        }
        let mut objects = Grid::new(10, 10).unwrap();
        let scatterer = FeatureScatterer {
            source_layer: Layer::Ground,
            features: vec![FeatureRule {
                tile: ObjectTile::Tree.code(),
                spawn_on: vec![GroundTile::Grass.code()],
                chance: 100,
            }],
        };
        let placed = scatterer.apply(Some(&ground), &mut objects, 3);
        assert_eq!(placed, 90);
        for y in 0..10 {
            assert_eq!(objects.get_tile(0, y), TileCode::EMPTY);
            assert_eq!(objects.get_tile(1, y), ObjectTile::Tree.code());
        }
    }

    #[test]
    fn test_zero_chance_places_nothing() {
        let ground = grass_grid(8, 8);
        let mut objects = Grid::new(8, 8).unwrap();
        let scatterer = FeatureScatterer {
            source_layer: Layer::Ground,
            features: vec![FeatureRule { tile: ObjectTile::Rock.code(), spawn_on: vec![GroundTile::Grass.code()], chance: 0 }],
        };
        assert_eq!(scatterer.apply(Some(&ground), &mut objects, 3), 0);
    }

    #[test]
    fn test_later_rule_overwrites() {
        let ground = grass_grid(4, 4);
        let mut objects = Grid::new(4, 4).unwrap();
        let always = |tile: ObjectTile| FeatureRule { tile: tile.code(), spawn_on: vec![GroundTile::Grass.code()], chance: 100 };
        let scatterer = FeatureScatterer {
            source_layer: Layer::Ground,
            features: vec![always(ObjectTile::Tree), always(ObjectTile::Bush)],
        };
        // Overwritten cells count once
        assert_eq!(scatterer.apply(Some(&ground), &mut objects, 0), 16);
        assert_eq!(objects.count_of(ObjectTile::Bush.code()), 16);
    }

    #[test]
    fn test_placed_counts_changed_cells_only() {
        let ground = grass_grid(4, 4);
        let mut objects = Grid::new(4, 4).unwrap();
        objects.set_tile(0, 0, ObjectTile::Tree.code(), false);
        objects.set_tile(3, 3, ObjectTile::Tree.code(), false);
        let scatterer = FeatureScatterer {
            source_layer: Layer::Ground,
            features: vec![FeatureRule { tile: ObjectTile::Tree.code(), spawn_on: vec![GroundTile::Grass.code()], chance: 100 }],
        };
        assert_eq!(scatterer.apply(Some(&ground), &mut objects, 2), 14);
        assert_eq!(objects.count_of(ObjectTile::Tree.code()), 16);
        assert_eq!(objects.dirty_tiles().len(), 14);
    }

    #[test]
    fn test_zero_and_full_chance_are_exact() {
        let ground = grass_grid(32, 32);
        for (chance, expected) in [(0, 0), (100, 32 * 32)] {
            let mut objects = Grid::new(32, 32).unwrap();
            let scatterer = FeatureScatterer {
                source_layer: Layer::Ground,
                features: vec![FeatureRule { tile: ObjectTile::Rock.code(), spawn_on: vec![GroundTile::Grass.code()], chance }],
            };
            for seed in 0..4 {
                scatterer.apply(Some(&ground), &mut objects, seed);
            }
            assert_eq!(objects.count_of(ObjectTile::Rock.code()), expected);
        }
    }

    #[test]
    fn test_same_layer_reads_live_tiles() {
        // The first rule turns grass into bushes; the second only spawns on grass,
        // so it never fires once the first has.
        let mut grid = grass_grid(4, 4);
        let scatterer = FeatureScatterer {
            source_layer: Layer::Ground,
            features: vec![
                FeatureRule { tile: ObjectTile::Bush.code(), spawn_on: vec![GroundTile::Grass.code()], chance: 100 },
                FeatureRule { tile: ObjectTile::Rock.code(), spawn_on: vec![GroundTile::Grass.code()], chance: 100 },
            ],
        };
        assert_eq!(scatterer.apply(None, &mut grid, 0), 16);
        assert_eq!(grid.count_of(ObjectTile::Rock.code()), 0);
    }
}
