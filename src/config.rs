//! World configuration files and built-in presets
//!
//! A `WorldConfig` is the serializable description of a world: its size, seed
//! and the algorithm pipeline of each layer. Stages are tagged by `"type"`:
//!
//! ```json
//! {
//!   "width": 64, "height": 64, "seed": 7,
//!   "ground": [{ "type": "noise_classifier", "apply_island_mask": true }],
//!   "objects": []
//! }
//! ```
//!
//! Omitted algorithm parameters take their defaults.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::{
    Algorithm, CellularSmoother, DownstreamRiverCarver, DrunkenRiverCarver, FeatureScatterer, NoiseClassifier,
    Replacement, RiverPlacement, UniformRandomFiller,
};
use crate::error::GenError;
use crate::heightmap::NoiseSettings;
use crate::tiles::{GroundTile, ObjectTile};
use crate::world::World;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub ground: Vec<Algorithm>,
    #[serde(default)]
    pub objects: Vec<Algorithm>,
}

/// Built-in pipelines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Noise terrain on an island, downstream rivers, trees thinned by a cellular pass
    Island,
    /// Same island terrain with drunken-walk rivers
    DrunkenIsland,
    /// Uniform random ground smoothed into clumps
    Random,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[Preset::Island, Preset::DrunkenIsland, Preset::Random]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Island => "island",
            Preset::DrunkenIsland => "drunken_island",
            Preset::Random => "random",
        }
    }

    pub fn from_name(name: &str) -> Option<Preset> {
        Preset::all().iter().copied().find(|p| p.name() == name)
    }

    pub fn config(&self, width: usize, height: usize, seed: u64) -> WorldConfig {
        let (ground, objects) = match self {
            Preset::Island => {
                let noise = NoiseSettings::default();
                (
                    vec![
                        island_terrain(&noise),
                        Algorithm::DownstreamRiverCarver(DownstreamRiverCarver {
                            placement: RiverPlacement::default(),
                            heightmap: noise,
                            apply_island_mask: true,
                        }),
                    ],
                    forest(),
                )
            }
            Preset::DrunkenIsland => (
                vec![
                    island_terrain(&NoiseSettings::default()),
                    Algorithm::DrunkenRiverCarver(DrunkenRiverCarver::default()),
                ],
                forest(),
            ),
            Preset::Random => (
                vec![
                    Algorithm::UniformRandomFiller(UniformRandomFiller::default()),
                    Algorithm::CellularSmoother(CellularSmoother {
                        target: GroundTile::DeepWater.code(),
                        replacement: Replacement::Dominant,
                        min_alive: 3,
                        iterations: 3,
                    }),
                ],
                Vec::new(),
            ),
        };

        WorldConfig {
            width,
            height,
            seed,
            ground,
            objects,
        }
    }
}

fn island_terrain(noise: &NoiseSettings) -> Algorithm {
    Algorithm::NoiseClassifier(NoiseClassifier {
        noise: noise.clone(),
        apply_island_mask: true,
        ..NoiseClassifier::default()
    })
}

/// Scatter trees over the ground layer, then drop the ones without company.
fn forest() -> Vec<Algorithm> {
    vec![
        Algorithm::FeatureScatterer(FeatureScatterer::default()),
        Algorithm::CellularSmoother(CellularSmoother {
            target: ObjectTile::Tree.code(),
            ..CellularSmoother::default()
        }),
    ]
}

impl WorldConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GenError> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GenError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, GenError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, GenError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Create an empty world with these pipelines attached.
    pub fn build(&self) -> Result<World, GenError> {
        Ok(World::new(self.width, self.height, self.seed)?.with_pipelines(self.ground.clone(), self.objects.clone()))
    }
}
