//! Tile layer storage
//!
//! A `Grid` is a dense layer of tile codes with silent bounds handling,
//! neighbor queries and a set of cells changed since the last full refresh.
//! Dirty tracking only feeds incremental redraw; it never affects generation.

use std::collections::BTreeSet;

use crate::error::GenError;
use crate::tilemap::{Coord, Tilemap};
use crate::tiles::TileCode;

#[derive(Clone, Debug)]
pub struct Grid {
    tiles: Tilemap<TileCode>,
    dirty: BTreeSet<Coord>,
}

impl Grid {
    /// Create a grid with every cell empty.
    pub fn new(width: usize, height: usize) -> Result<Self, GenError> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(GenError::InvalidDimensions { width, height });
        }
        Ok(Self {
            tiles: Tilemap::new_with(width, height, TileCode::EMPTY),
            dirty: BTreeSet::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.tiles.in_bounds(x, y)
    }

    /// Tile at `(x, y)`, or [`TileCode::EMPTY`] outside the grid.
    pub fn get_tile(&self, x: i32, y: i32) -> TileCode {
        self.tiles.get_checked(x, y).copied().unwrap_or(TileCode::EMPTY)
    }

    /// Write a tile. Out-of-bounds writes are dropped and writing the value
    /// already stored does nothing. Returns whether the cell changed.
    pub fn set_tile(&mut self, x: i32, y: i32, code: TileCode, mark_dirty: bool) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let cell = self.tiles.get_mut(x as usize, y as usize);
        if *cell == code {
            return false;
        }
        *cell = code;
        if mark_dirty {
            self.dirty.insert(Coord::new(x, y));
        }
        true
    }

    /// Up to 8 surrounding in-bounds cells with their codes.
    pub fn neighbors8(&self, x: i32, y: i32) -> Vec<(Coord, TileCode)> {
        self.tiles
            .neighbors_8(x, y)
            .into_iter()
            .map(|c| (c, self.get_tile(c.x, c.y)))
            .collect()
    }

    /// Up to 4 orthogonal in-bounds cells (left, right, up, down) with their codes.
    pub fn neighbors4(&self, x: i32, y: i32) -> Vec<(Coord, TileCode)> {
        self.tiles
            .neighbors(x, y)
            .into_iter()
            .map(|c| (c, self.get_tile(c.x, c.y)))
            .collect()
    }

    /// All cells whose code is one of `codes`, scanned column by column.
    pub fn tiles_of_types(&self, codes: &[TileCode]) -> Vec<Coord> {
        let mut found = Vec::new();
        for x in 0..self.width() as i32 {
            for y in 0..self.height() as i32 {
                if codes.contains(&self.get_tile(x, y)) {
                    found.push(Coord::new(x, y));
                }
            }
        }
        found
    }

    /// Nearest cell holding `code` by squared distance. On ties the first
    /// cell in column-by-column scan order wins.
    pub fn closest_tile_of_type(&self, from: Coord, code: TileCode) -> Option<Coord> {
        let mut best: Option<(i64, Coord)> = None;
        for x in 0..self.width() as i32 {
            for y in 0..self.height() as i32 {
                if self.get_tile(x, y) != code {
                    continue;
                }
                let candidate = Coord::new(x, y);
                let distance = from.distance_squared(candidate);
                if best.map_or(true, |(d, _)| distance < d) {
                    best = Some((distance, candidate));
                }
            }
        }
        best.map(|(_, c)| c)
    }

    pub fn count_of(&self, code: TileCode) -> usize {
        self.tiles.as_slice().iter().filter(|&&c| c == code).count()
    }

    /// Row-major snapshot of every tile code.
    pub fn tiles(&self) -> &[TileCode] {
        self.tiles.as_slice()
    }

    pub fn is_dirty(&self, x: i32, y: i32) -> bool {
        self.dirty.contains(&Coord::new(x, y))
    }

    /// Cells changed since the last refresh, in coordinate order.
    pub fn dirty_tiles(&self) -> Vec<Coord> {
        self.dirty.iter().copied().collect()
    }

    pub fn take_dirty(&mut self) -> Vec<Coord> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::GroundTile;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(Grid::new(0, 5), Err(GenError::InvalidDimensions { .. })));
        assert!(matches!(Grid::new(5, 0), Err(GenError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_out_of_bounds_reads_empty() {
        for (w, h) in [(1, 1), (3, 7), (16, 2)] {
            let mut grid = Grid::new(w, h).unwrap();
            for x in 0..w as i32 {
                for y in 0..h as i32 {
                    grid.set_tile(x, y, GroundTile::Grass.code(), true);
                }
            }
            assert_eq!(grid.get_tile(-1, 0), TileCode::EMPTY);
            assert_eq!(grid.get_tile(0, -1), TileCode::EMPTY);
            assert_eq!(grid.get_tile(w as i32, 0), TileCode::EMPTY);
            assert_eq!(grid.get_tile(0, h as i32), TileCode::EMPTY);
            assert_eq!(grid.get_tile(i32::MIN, i32::MAX), TileCode::EMPTY);
        }
    }

    #[test]
    fn test_unchanged_write_never_dirty() {
        let mut grid = Grid::new(4, 4).unwrap();
        assert!(!grid.set_tile(1, 1, TileCode::EMPTY, true));
        assert!(!grid.is_dirty(1, 1));

        assert!(grid.set_tile(1, 1, GroundTile::Dirt.code(), false));
        assert!(!grid.set_tile(1, 1, GroundTile::Dirt.code(), true));
        assert!(grid.dirty_tiles().is_empty());

        assert!(grid.set_tile(2, 1, GroundTile::Dirt.code(), true));
        assert_eq!(grid.dirty_tiles(), vec![Coord::new(2, 1)]);
    }

    #[test]
    fn test_out_of_bounds_write_dropped() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert!(!grid.set_tile(5, 5, GroundTile::Snow.code(), true));
        assert!(grid.dirty_tiles().is_empty());
        assert_eq!(grid.count_of(GroundTile::Snow.code()), 0);
    }

    #[test]
    fn test_take_dirty_clears() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_tile(0, 0, GroundTile::Beach.code(), true);
        grid.set_tile(2, 2, GroundTile::Beach.code(), true);
        assert_eq!(grid.take_dirty().len(), 2);
        assert!(grid.dirty_tiles().is_empty());
    }

    #[test]
    fn test_neighbor_codes() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_tile(0, 1, GroundTile::Mountain.code(), false);
        let n4 = grid.neighbors4(1, 1);
        assert_eq!(n4[0], (Coord::new(0, 1), GroundTile::Mountain.code()));
        assert_eq!(grid.neighbors8(0, 0).len(), 3);
    }

    #[test]
    fn test_closest_prefers_first_in_scan_order() {
        let mut grid = Grid::new(5, 5).unwrap();
        let water = GroundTile::DeepWater.code();
        grid.set_tile(1, 2, water, false);
        grid.set_tile(3, 2, water, false);
        assert_eq!(grid.closest_tile_of_type(Coord::new(2, 2), water), Some(Coord::new(1, 2)));
        assert_eq!(grid.closest_tile_of_type(Coord::new(2, 2), GroundTile::Snow.code()), None);
    }

    #[test]
    fn test_tiles_of_types_column_order() {
        let mut grid = Grid::new(3, 3).unwrap();
        let grass = GroundTile::Grass.code();
        grid.set_tile(2, 0, grass, false);
        grid.set_tile(0, 2, grass, false);
        assert_eq!(grid.tiles_of_types(&[grass]), vec![Coord::new(0, 2), Coord::new(2, 0)]);
    }
}
