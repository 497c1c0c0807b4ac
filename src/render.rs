//! Renderer boundary
//!
//! Generation never draws anything itself. After a run the world hands each
//! layer to a [`TileRenderer`] for a full refresh; live edits afterwards are
//! forwarded as partial refreshes of just the changed cells.

use std::collections::{BTreeMap, BTreeSet};

use crate::grid::Grid;
use crate::tilemap::{Coord, Tilemap};
use crate::tiles::TileCode;
use crate::world::Layer;

pub trait TileRenderer {
    /// Redraw every cell of `layer`.
    fn refresh_all(&mut self, layer: Layer, grid: &Grid);

    /// Redraw only `cells` of `layer`.
    fn refresh_tiles(&mut self, layer: Layer, grid: &Grid, cells: &[Coord]);
}

/// Renderer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl TileRenderer for NullRenderer {
    fn refresh_all(&mut self, _layer: Layer, _grid: &Grid) {}

    fn refresh_tiles(&mut self, _layer: Layer, _grid: &Grid, _cells: &[Coord]) {}
}

/// Maps tile codes to a visual (glyph, color...). Codes with no entry are drawn
/// as `empty`, with a warning the first time each one is seen.
#[derive(Clone, Debug)]
pub struct Palette<T> {
    entries: BTreeMap<TileCode, T>,
    empty: T,
    missing: BTreeSet<TileCode>,
}

impl<T: Clone> Palette<T> {
    pub fn new(empty: T) -> Self {
        Self {
            entries: BTreeMap::new(),
            empty,
            missing: BTreeSet::new(),
        }
    }

    pub fn with(mut self, code: impl Into<TileCode>, visual: T) -> Self {
        self.entries.insert(code.into(), visual);
        self
    }

    pub fn insert(&mut self, code: impl Into<TileCode>, visual: T) {
        self.entries.insert(code.into(), visual);
    }

    pub fn lookup(&mut self, code: TileCode) -> T {
        if let Some(visual) = self.entries.get(&code) {
            return visual.clone();
        }
        if !code.is_empty() && self.missing.insert(code) {
            tracing::warn!("no visual defined for tile {}, drawing it empty", code);
        }
        self.empty.clone()
    }

    /// Codes that were looked up without an entry.
    pub fn missing(&self) -> impl Iterator<Item = TileCode> + '_ {
        self.missing.iter().copied()
    }
}

/// Read-only copy of the tile layers as last reported to a renderer.
#[derive(Clone, Debug, Default)]
pub struct LayerSnapshot {
    layers: BTreeMap<Layer, Tilemap<TileCode>>,
}

impl LayerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_all(&mut self, layer: Layer, grid: &Grid) {
        let tiles = Tilemap::from_vec(grid.width(), grid.height(), grid.tiles().to_vec())
            .unwrap_or_else(|| Tilemap::new(grid.width(), grid.height()));
        self.layers.insert(layer, tiles);
    }

    pub fn refresh_tiles(&mut self, layer: Layer, grid: &Grid, cells: &[Coord]) {
        let Some(tiles) = self.layers.get_mut(&layer) else {
            // never fully drawn yet
            self.refresh_all(layer, grid);
            return;
        };
        for cell in cells {
            if tiles.in_bounds(cell.x, cell.y) {
                tiles.set(cell.x as usize, cell.y as usize, grid.get_tile(cell.x, cell.y));
            }
        }
    }

    /// Width and height of the largest layer seen so far.
    pub fn size(&self) -> (usize, usize) {
        self.layers
            .values()
            .fold((0, 0), |(w, h), t| (w.max(t.width), h.max(t.height)))
    }

    pub fn tile(&self, layer: Layer, x: i32, y: i32) -> TileCode {
        self.layers
            .get(&layer)
            .and_then(|t| t.get_checked(x, y).copied())
            .unwrap_or(TileCode::EMPTY)
    }

    /// Topmost non-empty code at a cell, objects drawn over ground.
    pub fn top_tile(&self, x: i32, y: i32) -> TileCode {
        Layer::all()
            .iter()
            .rev()
            .map(|&layer| self.tile(layer, x, y))
            .find(|code| !code.is_empty())
            .unwrap_or(TileCode::EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{GroundTile, ObjectTile};

    #[test]
    fn test_palette_falls_back_to_empty() {
        let mut palette = Palette::new(' ').with(GroundTile::Grass, ',');
        assert_eq!(palette.lookup(GroundTile::Grass.code()), ',');
        assert_eq!(palette.lookup(TileCode(999)), ' ');
        assert_eq!(palette.lookup(TileCode(999)), ' ');
        assert_eq!(palette.lookup(TileCode::EMPTY), ' ');
        assert_eq!(palette.missing().collect::<Vec<_>>(), vec![TileCode(999)]);
    }

    #[test]
    fn test_snapshot_objects_over_ground() {
        let mut ground = Grid::new(2, 1).unwrap();
        let mut objects = Grid::new(2, 1).unwrap();
        ground.set_tile(0, 0, GroundTile::Grass.code(), false);
        ground.set_tile(1, 0, GroundTile::Grass.code(), false);
        objects.set_tile(1, 0, ObjectTile::Tree.code(), false);

        let mut snapshot = LayerSnapshot::new();
        snapshot.refresh_all(Layer::Ground, &ground);
        snapshot.refresh_all(Layer::Objects, &objects);
        assert_eq!(snapshot.size(), (2, 1));
        assert_eq!(snapshot.top_tile(0, 0), GroundTile::Grass.code());
        assert_eq!(snapshot.top_tile(1, 0), ObjectTile::Tree.code());
    }

    #[test]
    fn test_partial_refresh_touches_only_listed_cells() {
        let mut ground = Grid::new(2, 1).unwrap();
        let mut snapshot = LayerSnapshot::new();
        snapshot.refresh_all(Layer::Ground, &ground);

        ground.set_tile(0, 0, GroundTile::Snow.code(), true);
        ground.set_tile(1, 0, GroundTile::Snow.code(), true);
        snapshot.refresh_tiles(Layer::Ground, &ground, &[Coord::new(0, 0)]);
        assert_eq!(snapshot.tile(Layer::Ground, 0, 0), GroundTile::Snow.code());
        assert_eq!(snapshot.tile(Layer::Ground, 1, 0), TileCode::EMPTY);
    }
}
