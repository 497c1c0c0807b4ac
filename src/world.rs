//! World container and generation pipeline
//!
//! A `World` owns one grid per layer plus the seed and dimensions shared by
//! every stage. Each layer has an ordered pipeline of algorithms; generation
//! runs the ground pipeline, then the object pipeline, each stage seeing the
//! cumulative result of the ones before it.

use serde::{Deserialize, Serialize};

use crate::algorithms::{Algorithm, StageOutcome};
use crate::error::GenError;
use crate::grid::Grid;
use crate::render::TileRenderer;
use crate::tilemap::Coord;
use crate::tiles::TileCode;

/// Named tile layers, generated in declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    #[default]
    Ground,
    Objects,
}

impl Layer {
    pub fn all() -> &'static [Layer] {
        &[Layer::Ground, Layer::Objects]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Ground => "ground",
            Layer::Objects => "objects",
        }
    }
}

/// Result of one stage
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageReport {
    pub layer: Layer,
    pub algorithm: &'static str,
    pub outcome: StageOutcome,
}

/// Everything a generation run did, in execution order
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    pub stages: Vec<StageReport>,
}

impl GenerationReport {
    /// (requested, placed) summed over every river stage
    pub fn rivers(&self) -> (usize, usize) {
        self.stages.iter().fold((0, 0), |(req, placed), stage| match stage.outcome {
            StageOutcome::Rivers(report) => (req + report.requested, placed + report.placed),
            _ => (req, placed),
        })
    }

    pub fn features_placed(&self) -> usize {
        self.stages
            .iter()
            .map(|stage| match stage.outcome {
                StageOutcome::Features { placed } => placed,
                _ => 0,
            })
            .sum()
    }
}

pub struct World {
    seed: u64,
    ground: Grid,
    objects: Grid,
    ground_pipeline: Vec<Algorithm>,
    object_pipeline: Vec<Algorithm>,
    runs: usize,
}

impl World {
    /// Create an empty world. Both dimensions must be positive.
    pub fn new(width: usize, height: usize, seed: u64) -> Result<Self, GenError> {
        Ok(Self {
            seed,
            ground: Grid::new(width, height)?,
            objects: Grid::new(width, height)?,
            ground_pipeline: Vec::new(),
            object_pipeline: Vec::new(),
            runs: 0,
        })
    }

    pub fn with_pipelines(mut self, ground: Vec<Algorithm>, objects: Vec<Algorithm>) -> Self {
        self.set_pipeline(Layer::Ground, ground);
        self.set_pipeline(Layer::Objects, objects);
        self
    }

    pub fn set_pipeline(&mut self, layer: Layer, algorithms: Vec<Algorithm>) {
        *self.pipeline_mut(layer) = algorithms;
    }

    pub fn pipeline(&self, layer: Layer) -> &[Algorithm] {
        match layer {
            Layer::Ground => &self.ground_pipeline,
            Layer::Objects => &self.object_pipeline,
        }
    }

    fn pipeline_mut(&mut self, layer: Layer) -> &mut Vec<Algorithm> {
        match layer {
            Layer::Ground => &mut self.ground_pipeline,
            Layer::Objects => &mut self.object_pipeline,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn width(&self) -> usize {
        self.ground.width()
    }

    pub fn height(&self) -> usize {
        self.ground.height()
    }

    /// How many times `generate` has run
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn layer(&self, layer: Layer) -> &Grid {
        match layer {
            Layer::Ground => &self.ground,
            Layer::Objects => &self.objects,
        }
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut Grid {
        match layer {
            Layer::Ground => &mut self.ground,
            Layer::Objects => &mut self.objects,
        }
    }

    /// Borrow `source` for reading and `target` for writing. `None` when they are the same layer.
    pub fn layer_pair(&mut self, source: Layer, target: Layer) -> Option<(&Grid, &mut Grid)> {
        match (source, target) {
            (Layer::Ground, Layer::Objects) => Some((&self.ground, &mut self.objects)),
            (Layer::Objects, Layer::Ground) => Some((&self.objects, &mut self.ground)),
            _ => None,
        }
    }

    /// Run every pipeline once, then ask the renderer to redraw each layer in full.
    pub fn generate(&mut self, renderer: &mut dyn TileRenderer) -> GenerationReport {
        let report = self.run_pipelines();
        for &layer in Layer::all() {
            renderer.refresh_all(layer, self.layer(layer));
            self.layer_mut(layer).clear_dirty();
        }
        report
    }

    /// Run every pipeline once with no renderer attached.
    pub fn generate_headless(&mut self) -> GenerationReport {
        let report = self.run_pipelines();
        for &layer in Layer::all() {
            self.layer_mut(layer).clear_dirty();
        }
        report
    }

    fn run_pipelines(&mut self) -> GenerationReport {
        let mut report = GenerationReport::default();
        tracing::info!(
            "generating {}x{} world with seed {} (run {})",
            self.width(),
            self.height(),
            self.seed,
            self.runs + 1
        );

        for &layer in Layer::all() {
            let stages = std::mem::take(self.pipeline_mut(layer));
            for algorithm in &stages {
                tracing::debug!("{} layer: applying {}", layer.name(), algorithm.name());
                let outcome = algorithm.apply(self, layer);
                match outcome {
                    StageOutcome::Rivers(rivers) if rivers.placed < rivers.requested => {
                        tracing::info!(
                            "{}: placed {} of {} requested rivers",
                            algorithm.name(),
                            rivers.placed,
                            rivers.requested
                        );
                    }
                    _ => tracing::debug!("{}: {:?}", algorithm.name(), outcome),
                }
                report.stages.push(StageReport { layer, algorithm: algorithm.name(), outcome });
            }
            *self.pipeline_mut(layer) = stages;
        }

        self.runs += 1;
        report
    }

    /// Write one cell outside a generation run and redraw just that cell.
    /// The cell is not left in the dirty set. Returns whether it changed.
    pub fn set_tile_live(
        &mut self,
        layer: Layer,
        x: i32,
        y: i32,
        code: TileCode,
        renderer: &mut dyn TileRenderer,
    ) -> bool {
        let grid = self.layer_mut(layer);
        if !grid.set_tile(x, y, code, false) {
            return false;
        }
        renderer.refresh_tiles(layer, grid, &[Coord::new(x, y)]);
        true
    }

    /// Hand every layer's dirty cells to the renderer and clear them.
    pub fn flush_dirty(&mut self, renderer: &mut dyn TileRenderer) -> usize {
        let mut flushed = 0;
        for &layer in Layer::all() {
            let dirty = self.layer_mut(layer).take_dirty();
            if dirty.is_empty() {
                continue;
            }
            flushed += dirty.len();
            renderer.refresh_tiles(layer, self.layer(layer), &dirty);
        }
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{NoiseClassifier, UniformRandomFiller};
    use crate::tiles::GroundTile;

    #[derive(Default)]
    struct CountingRenderer {
        full: Vec<Layer>,
        partial: Vec<(Layer, Vec<Coord>)>,
    }

    impl TileRenderer for CountingRenderer {
        fn refresh_all(&mut self, layer: Layer, _grid: &Grid) {
            self.full.push(layer);
        }

        fn refresh_tiles(&mut self, layer: Layer, _grid: &Grid, cells: &[Coord]) {
            self.partial.push((layer, cells.to_vec()));
        }
    }

    #[test]
    fn test_generate_refreshes_every_layer_and_clears_dirty() {
        let mut world = World::new(16, 16, 1)
            .unwrap()
            .with_pipelines(vec![Algorithm::NoiseClassifier(NoiseClassifier::default())], vec![]);
        let mut renderer = CountingRenderer::default();
        let report = world.generate(&mut renderer);

        assert_eq!(report.stages.len(), 1);
        assert_eq!(renderer.full, vec![Layer::Ground, Layer::Objects]);
        assert!(world.layer(Layer::Ground).dirty_tiles().is_empty());
        assert_eq!(world.runs(), 1);
        assert_eq!(world.pipeline(Layer::Ground).len(), 1);
    }

    #[test]
    fn test_stages_run_in_order() {
        // The filler overwrites everything, so a classifier placed after it wins
        let classifier = Algorithm::NoiseClassifier(NoiseClassifier {
            thresholds: vec![crate::algorithms::Threshold::new(1.0, GroundTile::Snow)],
            ..NoiseClassifier::default()
        });
        let filler = Algorithm::UniformRandomFiller(UniformRandomFiller { palette: vec![GroundTile::Beach.code()] });

        let mut world = World::new(8, 8, 3).unwrap().with_pipelines(vec![filler, classifier], vec![]);
        world.generate_headless();
        assert_eq!(world.layer(Layer::Ground).count_of(GroundTile::Snow.code()), 64);
    }

    #[test]
    fn test_live_edit_redraws_single_cell() {
        let mut world = World::new(4, 4, 0).unwrap();
        let mut renderer = CountingRenderer::default();

        assert!(world.set_tile_live(Layer::Ground, 1, 2, GroundTile::Snow.code(), &mut renderer));
        assert!(!world.set_tile_live(Layer::Ground, 1, 2, GroundTile::Snow.code(), &mut renderer));
        assert!(!world.set_tile_live(Layer::Ground, 9, 9, GroundTile::Snow.code(), &mut renderer));

        assert_eq!(renderer.partial, vec![(Layer::Ground, vec![Coord::new(1, 2)])]);
        assert!(world.layer(Layer::Ground).dirty_tiles().is_empty());
    }

    #[test]
    fn test_flush_dirty_hands_over_deferred_edits() {
        let mut world = World::new(4, 4, 0).unwrap();
        world.layer_mut(Layer::Objects).set_tile(0, 0, GroundTile::Dirt.code(), true);
        world.layer_mut(Layer::Objects).set_tile(3, 3, GroundTile::Dirt.code(), true);

        let mut renderer = CountingRenderer::default();
        assert_eq!(world.flush_dirty(&mut renderer), 2);
        assert_eq!(renderer.partial.len(), 1);
        assert_eq!(renderer.partial[0].0, Layer::Objects);
        assert_eq!(world.flush_dirty(&mut renderer), 0);
    }

    #[test]
    fn test_set_pipeline_replaces_stages() {
        let filler = |tile: GroundTile| Algorithm::UniformRandomFiller(UniformRandomFiller { palette: vec![tile.code()] });
        let mut world = World::new(4, 4, 0).unwrap().with_pipelines(vec![filler(GroundTile::Beach)], vec![]);
        world.set_pipeline(Layer::Ground, vec![filler(GroundTile::Dirt)]);
        world.set_pipeline(Layer::Objects, vec![filler(GroundTile::Snow)]);

        assert_eq!(world.pipeline(Layer::Ground).len(), 1);
        world.generate_headless();
        assert_eq!(world.layer(Layer::Ground).count_of(GroundTile::Dirt.code()), 16);
        assert_eq!(world.layer(Layer::Objects).count_of(GroundTile::Snow.code()), 16);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(World::new(0, 10, 1).is_err());
    }
}
