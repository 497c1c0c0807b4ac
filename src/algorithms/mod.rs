//! Generation stages
//!
//! Every stage is one variant of [`Algorithm`] carrying its own parameters.
//! A pipeline is an ordered `Vec<Algorithm>` applied to one layer of a world.

pub mod cellular;
pub mod classifier;
pub mod downstream;
pub mod drunken;
pub mod placement;
pub mod rivers;
pub mod scatter;

use serde::{Deserialize, Serialize};

pub use cellular::{CellularSmoother, Replacement};
pub use classifier::{NoiseClassifier, Threshold};
pub use downstream::DownstreamRiverCarver;
pub use drunken::DrunkenRiverCarver;
pub use rivers::{River, RiverPlacement, RiverReport};
pub use scatter::{FeatureRule, FeatureScatterer, UniformRandomFiller};

use crate::world::{Layer, World};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Algorithm {
    NoiseClassifier(NoiseClassifier),
    CellularSmoother(CellularSmoother),
    DownstreamRiverCarver(DownstreamRiverCarver),
    DrunkenRiverCarver(DrunkenRiverCarver),
    UniformRandomFiller(UniformRandomFiller),
    FeatureScatterer(FeatureScatterer),
}

/// What a stage did to its layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageOutcome {
    /// Number of cells whose code changed
    Tiles { changed: usize },
    Rivers(RiverReport),
    Features { placed: usize },
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::NoiseClassifier(_) => "noise classifier",
            Algorithm::CellularSmoother(_) => "cellular smoother",
            Algorithm::DownstreamRiverCarver(_) => "downstream rivers",
            Algorithm::DrunkenRiverCarver(_) => "drunken rivers",
            Algorithm::UniformRandomFiller(_) => "uniform random filler",
            Algorithm::FeatureScatterer(_) => "feature scatterer",
        }
    }

    /// Run this stage on `layer` of `world`. Random streams are seeded from the world seed.
    pub fn apply(&self, world: &mut World, layer: Layer) -> StageOutcome {
        let seed = world.seed();
        match self {
            Algorithm::NoiseClassifier(classifier) => StageOutcome::Tiles {
                changed: classifier.apply(world.layer_mut(layer), seed),
            },
            Algorithm::CellularSmoother(smoother) => StageOutcome::Tiles {
                changed: smoother.apply(world.layer_mut(layer)),
            },
            Algorithm::DownstreamRiverCarver(carver) => StageOutcome::Rivers(carver.apply(world.layer_mut(layer), seed)),
            Algorithm::DrunkenRiverCarver(carver) => StageOutcome::Rivers(carver.apply(world.layer_mut(layer), seed)),
            Algorithm::UniformRandomFiller(filler) => StageOutcome::Tiles {
                changed: filler.apply(world.layer_mut(layer), seed),
            },
            Algorithm::FeatureScatterer(scatterer) => {
                let placed = match world.layer_pair(scatterer.source_layer, layer) {
                    Some((source, target)) => scatterer.apply(Some(source), target, seed),
                    None => scatterer.apply(None, world.layer_mut(layer), seed),
                };
                StageOutcome::Features { placed }
            }
        }
    }
}
