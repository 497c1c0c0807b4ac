//! Cellular automata smoothing.
//!
//! Sweeps update the grid in place: a cell replaced early in a sweep is already
//! visible to its neighbors later in the same sweep. Sweeps run column by
//! column (x outer, y inner), so isolated tiles erode with a bias toward the
//! start of the scan. Existing maps depend on that look; do not double-buffer.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::tiles::{ObjectTile, TileCode};

/// What an under-populated target cell turns into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replacement {
    /// A fixed tile
    Tile(TileCode),
    /// Whichever code is most common among the cell's 8 neighbors
    Dominant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellularSmoother {
    pub target: TileCode,
    pub replacement: Replacement,
    /// A target cell needs at least this many target neighbors to survive
    pub min_alive: u32,
    pub iterations: u32,
}

impl Default for CellularSmoother {
    fn default() -> Self {
        Self {
            target: ObjectTile::Tree.code(),
            replacement: Replacement::Tile(TileCode::EMPTY),
            min_alive: 3,
            iterations: 2,
        }
    }
}

impl CellularSmoother {
    /// Returns how many cell writes changed a tile.
    pub fn apply(&self, grid: &mut Grid) -> usize {
        let mut changed = 0;
        let width = grid.width() as i32;
        let height = grid.height() as i32;

        for _ in 0..self.iterations {
            for x in 0..width {
                for y in 0..height {
                    if grid.get_tile(x, y) != self.target {
                        continue;
                    }

                    let neighbors = grid.neighbors8(x, y);
                    let alive = neighbors.iter().filter(|(_, code)| *code == self.target).count();
                    if alive >= self.min_alive as usize {
                        continue;
                    }

                    let replacement = match self.replacement {
                        Replacement::Tile(code) => code,
                        Replacement::Dominant => dominant_code(&neighbors).unwrap_or(self.target),
                    };
                    if grid.set_tile(x, y, replacement, false) {
                        changed += 1;
                    }
                }
            }
        }

        changed
    }
}

/// Most frequent code; ties go to the code that appears first in `neighbors`.
fn dominant_code(neighbors: &[(crate::tilemap::Coord, TileCode)]) -> Option<TileCode> {
    // (code, count) in first-appearance order
    let mut counts: Vec<(TileCode, usize)> = Vec::with_capacity(neighbors.len());
    for &(_, code) in neighbors {
        match counts.iter_mut().find(|(c, _)| *c == code) {
            Some((_, n)) => *n += 1,
            None => counts.push((code, 1)),
        }
    }

    let mut best: Option<(TileCode, usize)> = None;
    for (code, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((code, n));
        }
    }
    best.map(|(code, _)| code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::Coord;
    use crate::tiles::GroundTile;

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let mut grid = Grid::new(rows[0].len(), rows.len()).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let code = match ch {
                    'T' => ObjectTile::Tree.code(),
                    'g' => GroundTile::Grass.code(),
                    'd' => GroundTile::Dirt.code(),
                    _ => TileCode::EMPTY,
                };
                grid.set_tile(x as i32, y as i32, code, false);
            }
        }
        grid
    }

    #[test]
    fn test_zero_min_alive_changes_nothing() {
        let mut grid = grid_from_rows(&["T.T.", ".T..", "T..T"]);
        let before = grid.tiles().to_vec();
        let smoother = CellularSmoother { min_alive: 0, iterations: 5, ..CellularSmoother::default() };
        assert_eq!(smoother.apply(&mut grid), 0);
        assert_eq!(grid.tiles(), before.as_slice());
    }

    #[test]
    fn test_isolated_tile_removed() {
        let mut grid = grid_from_rows(&["...", ".T.", "..."]);
        let smoother = CellularSmoother { min_alive: 1, iterations: 1, ..CellularSmoother::default() };
        assert_eq!(smoother.apply(&mut grid), 1);
        assert_eq!(grid.get_tile(1, 1), TileCode::EMPTY);
    }

    #[test]
    fn test_dominant_replacement_with_tie_break() {
        // Neighbors of (1,1) in enumeration order: (0,0) g, (0,1) d, (0,2) d, (1,0) g, ...
        let mut grid = grid_from_rows(&["ggd", "dTg", "d.."]);
        let smoother = CellularSmoother {
            target: ObjectTile::Tree.code(),
            replacement: Replacement::Dominant,
            min_alive: 1,
            iterations: 1,
        };
        smoother.apply(&mut grid);
        // grass 3, dirt 3: grass appears first at (0,0)
        assert_eq!(grid.get_tile(1, 1), GroundTile::Grass.code());
    }

    #[test]
    fn test_pair_survives_with_one_neighbor() {
        let mut grid = grid_from_rows(&["...", ".T.", ".T.", "..."]);
        let smoother = CellularSmoother { min_alive: 1, iterations: 1, ..CellularSmoother::default() };
        assert_eq!(smoother.apply(&mut grid), 0);
    }

    #[test]
    fn test_sweep_is_in_place() {
        // A double-buffered sweep would keep the middle tree (two neighbors).
        // In place, (0,0) dies first, so (1,0) then sees one tree and dies,
        // and (2,0) sees none.
        let mut line = grid_from_rows(&["TTT"]);
        let smoother = CellularSmoother { min_alive: 2, iterations: 1, ..CellularSmoother::default() };
        assert_eq!(smoother.apply(&mut line), 3);
        assert_eq!(line.count_of(ObjectTile::Tree.code()), 0);
        assert!(line.dirty_tiles().is_empty());
    }

    #[test]
    fn test_dominant_first_seen_wins_ties() {
        let neighbors = vec![
            (Coord::new(0, 0), GroundTile::Dirt.code()),
            (Coord::new(0, 1), GroundTile::Grass.code()),
        ];
        assert_eq!(dominant_code(&neighbors), Some(GroundTile::Dirt.code()));
        assert_eq!(dominant_code(&[]), None);
    }
}
