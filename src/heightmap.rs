use noise::{NoiseFn, Perlin, Seedable};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;

// =============================================================================
// NOISE PARAMETERS
// =============================================================================

/// Octave offsets are drawn from `[-OFFSET_RANGE, OFFSET_RANGE)`.
const OFFSET_RANGE: i32 = 100_000;

/// Replacement for a non-positive scale.
const MIN_SCALE: f32 = 0.0001;

// Island falloff curve shape
const FALLOFF_A: f32 = 3.0;
const FALLOFF_B: f32 = 2.2;

/// Parameters for a layered-noise heightmap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Zoom of the sampling window (larger = larger features)
    pub scale: f32,
    /// Number of noise octaves (values below 1 are treated as 1)
    pub octaves: i32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f32,
    /// Frequency multiplier per octave
    pub lacunarity: f32,
    /// Added to every octave offset, pans the map
    pub offset: [f32; 2],
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            scale: 30.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: [0.0, 0.0],
        }
    }
}

impl NoiseSettings {
    /// Generate the heightmap for these settings, optionally carved by the island mask.
    /// Stages that need to agree on terrain height (classification, downstream rivers)
    /// call this with the same seed and get identical maps.
    pub fn heightmap(&self, width: usize, height: usize, seed: u64, island: bool) -> Tilemap<f32> {
        let mut map = generate_noise_map(width, height, seed, self);
        if island {
            let mask = generate_island_mask(width, height);
            apply_island_mask(&mut map, &mask);
        }
        map
    }
}

// =============================================================================
// NOISE MAP GENERATION
// =============================================================================

/// Generate a `width * height` heightmap normalized to `[0, 1]`:
/// 1. One random offset per octave, drawn x then y from a seeded stream
/// 2. Multi-octave Perlin sum, sampled around the map center
/// 3. Linear remap of the observed `[min, max]` onto `[0, 1]`
pub fn generate_noise_map(width: usize, height: usize, seed: u64, settings: &NoiseSettings) -> Tilemap<f32> {
    let mut heightmap = Tilemap::new_with(width, height, 0.0f32);
    if width == 0 || height == 0 {
        return heightmap;
    }

    let octaves = if settings.octaves < 1 {
        tracing::warn!("noise octaves {} < 1, using 1", settings.octaves);
        1
    } else {
        settings.octaves as usize
    };
    let scale = if settings.scale <= 0.0 {
        tracing::warn!("noise scale {} <= 0, using {}", settings.scale, MIN_SCALE);
        MIN_SCALE
    } else {
        settings.scale
    };

    // Offsets drawn x then y per octave; stages recomputing this map rely on it
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let octave_offsets: Vec<(f64, f64)> = (0..octaves)
        .map(|_| {
            let ox = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE) as f64 + settings.offset[0] as f64;
            let oy = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE) as f64 + settings.offset[1] as f64;
            (ox, oy)
        })
        .collect();

    let perlin = Perlin::new(1).set_seed(seed as u32);

    // Sample around the center so changing the scale zooms from the middle
    let half_width = width as f64 / 2.0;
    let half_height = height as f64 / 2.0;
    let scale = scale as f64;

    let mut raw = vec![0.0f64; width * height];
    let mut min_val = f64::MAX;
    let mut max_val = f64::MIN;

    for y in 0..height {
        for x in 0..width {
            let value = fbm(
                &perlin,
                (x as f64 - half_width) / scale,
                (y as f64 - half_height) / scale,
                &octave_offsets,
                settings.persistence as f64,
                settings.lacunarity as f64,
            );
            if value < min_val { min_val = value; }
            if value > max_val { max_val = value; }
            raw[y * width + x] = value;
        }
    }

    let range = max_val - min_val;
    for (x, y, cell) in heightmap.iter_mut() {
        *cell = if range > 0.0 {
            ((raw[y * width + x] - min_val) / range) as f32
        } else {
            0.5
        };
    }

    heightmap
}

/// Fractal Brownian motion with one offset per octave
fn fbm(
    noise: &Perlin,
    x: f64,
    y: f64,
    octave_offsets: &[(f64, f64)],
    persistence: f64,
    lacunarity: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;

    for &(ox, oy) in octave_offsets {
        let sample = noise.get([x * frequency + ox, y * frequency + oy]).clamp(-1.0, 1.0);
        total += amplitude * sample;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total
}

// =============================================================================
// ISLAND MASK
// =============================================================================

/// Radial falloff: near 0 in the middle of the map, near 1 at the edges.
/// Uses the Chebyshev distance from the center, shaped by `v^a / (v^a + (b - b*v)^a)`.
pub fn generate_island_mask(width: usize, height: usize) -> Tilemap<f32> {
    let mut mask = Tilemap::new_with(width, height, 0.0f32);

    for (x, y, cell) in mask.iter_mut() {
        let i = x as f32 / width as f32 * 2.0 - 1.0;
        let j = y as f32 / height as f32 * 2.0 - 1.0;
        let v = i.abs().max(j.abs());

        let va = v.powf(FALLOFF_A);
        *cell = va / (va + (FALLOFF_B - FALLOFF_B * v).powf(FALLOFF_A));
    }

    mask
}

/// Subtract the mask from the heightmap, clamped to `[0, 1]`.
pub fn apply_island_mask(heightmap: &mut Tilemap<f32>, mask: &Tilemap<f32>) {
    for (x, y, h) in heightmap.iter_mut() {
        let m = mask.get_checked(x as i32, y as i32).copied().unwrap_or(0.0);
        *h = (*h - m).clamp(0.0, 1.0);
    }
}
