//! ASCII rendering of generated worlds
//!
//! A text renderer behind the [`TileRenderer`] boundary, mostly for debugging
//! and terminal previews.

use std::fs::File;
use std::io::{self, Write};

use crate::grid::Grid;
use crate::render::{LayerSnapshot, Palette, TileRenderer};
use crate::tilemap::Coord;
use crate::tiles::{GroundTile, ObjectTile};
use crate::world::Layer;

/// Get ASCII character for a ground tile
pub fn ground_char(tile: GroundTile) -> char {
    match tile {
        GroundTile::DeepWater => '~',
        GroundTile::ShallowWater => '-',
        GroundTile::Beach => '.',
        GroundTile::Grass => ',',
        GroundTile::Dirt => ':',
        GroundTile::Mountain => '^',
        GroundTile::Snow => '*',
        GroundTile::River => '=',
    }
}

/// Get ASCII character for an object tile
pub fn object_char(tile: ObjectTile) -> char {
    match tile {
        ObjectTile::Tree => 'T',
        ObjectTile::PineTree => 'A',
        ObjectTile::Bush => 'b',
        ObjectTile::Rock => 'o',
    }
}

/// Glyphs for every built-in tile; unknown codes draw as a space.
pub fn default_palette() -> Palette<char> {
    let mut palette = Palette::new(' ');
    for &tile in GroundTile::all() {
        palette.insert(tile, ground_char(tile));
    }
    for &tile in ObjectTile::all() {
        palette.insert(tile, object_char(tile));
    }
    palette
}

pub struct AsciiRenderer {
    snapshot: LayerSnapshot,
    palette: Palette<char>,
    /// Number of full and partial refreshes received
    pub full_refreshes: usize,
    pub partial_refreshes: usize,
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new(default_palette())
    }
}

impl AsciiRenderer {
    pub fn new(palette: Palette<char>) -> Self {
        Self {
            snapshot: LayerSnapshot::new(),
            palette,
            full_refreshes: 0,
            partial_refreshes: 0,
        }
    }

    /// Render the current snapshot, one line per row, objects over ground.
    pub fn render(&mut self) -> String {
        let (width, height) = self.snapshot.size();
        let mut out = String::with_capacity((width + 1) * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let code = self.snapshot.top_tile(x, y);
                out.push(self.palette.lookup(code));
            }
            out.push('\n');
        }
        out
    }

    /// Write the rendered map plus a legend to a text file.
    pub fn export(&mut self, path: &str) -> io::Result<()> {
        let mut file = File::create(path)?;
        let map = self.render();
        file.write_all(map.as_bytes())?;

        writeln!(file)?;
        writeln!(file, "Legend:")?;
        for &tile in GroundTile::all() {
            writeln!(file, "  {}  {}", ground_char(tile), tile.name())?;
        }
        for &tile in ObjectTile::all() {
            writeln!(file, "  {}  {}", object_char(tile), tile.name())?;
        }
        Ok(())
    }
}

impl TileRenderer for AsciiRenderer {
    fn refresh_all(&mut self, layer: Layer, grid: &Grid) {
        self.full_refreshes += 1;
        self.snapshot.refresh_all(layer, grid);
    }

    fn refresh_tiles(&mut self, layer: Layer, grid: &Grid, cells: &[Coord]) {
        self.partial_refreshes += 1;
        self.snapshot.refresh_tiles(layer, grid, cells);
    }
}
