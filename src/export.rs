use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::GenError;
use crate::grid::Grid;
use crate::render::{LayerSnapshot, Palette, TileRenderer};
use crate::tilemap::{Coord, Tilemap};
use crate::tiles::{GroundTile, ObjectTile};
use crate::world::Layer;

const EMPTY_COLOR: [u8; 3] = [0, 0, 0];

impl GroundTile {
    pub fn color(&self) -> [u8; 3] {
        match self {
            GroundTile::DeepWater => [24, 56, 140],
            GroundTile::ShallowWater => [52, 110, 190],
            GroundTile::Beach => [230, 215, 150],
            GroundTile::Grass => [90, 170, 70],
            GroundTile::Dirt => [130, 100, 60],
            GroundTile::Mountain => [120, 120, 120],
            GroundTile::Snow => [245, 245, 250],
            GroundTile::River => [70, 150, 220],
        }
    }
}

impl ObjectTile {
    pub fn color(&self) -> [u8; 3] {
        match self {
            ObjectTile::Tree => [30, 110, 40],
            ObjectTile::PineTree => [20, 80, 50],
            ObjectTile::Bush => [110, 150, 50],
            ObjectTile::Rock => [90, 85, 80],
        }
    }
}

/// Colors for every built-in tile; unknown codes are drawn black.
pub fn default_palette() -> Palette<[u8; 3]> {
    let mut palette = Palette::new(EMPTY_COLOR);
    for &tile in GroundTile::all() {
        palette.insert(tile, tile.color());
    }
    for &tile in ObjectTile::all() {
        palette.insert(tile, tile.color());
    }
    palette
}

/// Renders the world into an RGB image, `scale` pixels per tile.
pub struct ImageRenderer {
    snapshot: LayerSnapshot,
    palette: Palette<[u8; 3]>,
    scale: u32,
}

impl ImageRenderer {
    pub fn new(palette: Palette<[u8; 3]>, scale: u32) -> Self {
        Self {
            snapshot: LayerSnapshot::new(),
            palette,
            scale: scale.max(1),
        }
    }

    /// Pixel size of the rendered image, or an error if it overflows `u32`.
    pub fn image_size(&self) -> Result<(u32, u32), GenError> {
        let (width, height) = self.snapshot.size();
        pixel_size(width, height, self.scale)
    }

    pub fn to_image(&mut self) -> Result<RgbImage, GenError> {
        let (width, height) = self.snapshot.size();
        let (img_width, img_height) = self.image_size()?;
        let scale = self.scale;
        let mut img: RgbImage = ImageBuffer::new(img_width, img_height);

        for y in 0..height {
            for x in 0..width {
                let code = self.snapshot.top_tile(x as i32, y as i32);
                let color = self.palette.lookup(code);
                for py in 0..scale {
                    for px in 0..scale {
                        img.put_pixel(x as u32 * scale + px, y as u32 * scale + py, Rgb(color));
                    }
                }
            }
        }
        Ok(img)
    }

    /// Write the image and return its pixel size.
    pub fn save(&mut self, path: &str) -> Result<(u32, u32), GenError> {
        let img = self.to_image()?;
        img.save(path)?;
        Ok(img.dimensions())
    }
}

fn pixel_size(width: usize, height: usize, scale: u32) -> Result<(u32, u32), GenError> {
    let too_large = || GenError::ImageTooLarge { width, height, scale };
    let w = u32::try_from(width).ok().and_then(|w| w.checked_mul(scale)).ok_or_else(too_large)?;
    let h = u32::try_from(height).ok().and_then(|h| h.checked_mul(scale)).ok_or_else(too_large)?;
    Ok((w, h))
}

impl Default for ImageRenderer {
    fn default() -> Self {
        Self::new(default_palette(), 1)
    }
}

impl TileRenderer for ImageRenderer {
    fn refresh_all(&mut self, layer: Layer, grid: &Grid) {
        self.snapshot.refresh_all(layer, grid);
    }

    fn refresh_tiles(&mut self, layer: Layer, grid: &Grid, cells: &[Coord]) {
        self.snapshot.refresh_tiles(layer, grid, cells);
    }
}

/// Export a heightmap using spectral colormap.
/// Values are expected to be normalized (0.0-1.0).
pub fn export_heightmap(heightmap: &Tilemap<f32>, path: &str) -> Result<(), GenError> {
    render_heightmap(heightmap)?.save(path)?;
    Ok(())
}

pub fn render_heightmap(heightmap: &Tilemap<f32>) -> Result<RgbImage, GenError> {
    let (width, height) = pixel_size(heightmap.width, heightmap.height, 1)?;
    let mut img: RgbImage = ImageBuffer::new(width, height);

    for (x, y, &val) in heightmap.iter() {
        let color = spectral_colormap(val.clamp(0.0, 1.0));
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }

    Ok(img)
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],  // Dark blue/purple (low)
        [0.20, 0.53, 0.74],  // Blue
        [0.40, 0.76, 0.65],  // Teal
        [0.67, 0.87, 0.64],  // Light green
        [0.90, 0.96, 0.60],  // Yellow-green
        [1.00, 1.00, 0.75],  // Light yellow / white
        [1.00, 0.88, 0.55],  // Yellow
        [0.99, 0.68, 0.38],  // Light orange
        [0.96, 0.43, 0.26],  // Orange
        [0.84, 0.24, 0.31],  // Red
        [0.62, 0.00, 0.26],  // Dark red (high)
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}
