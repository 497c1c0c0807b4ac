use serde::{Deserialize, Serialize};

/// Integer cell coordinate. Signed so that neighbor offsets and drifting walks
/// can step outside the map and be rejected by bounds checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: Coord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn manhattan(&self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

/// A dense 2D map stored row-major (`y * width + x`). Edges do not wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` if the length doesn't match.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Get a cell. Panics when out of bounds; use [`Tilemap::get_checked`] for
    /// coordinates that may fall outside the map.
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_checked(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(&self.data[self.index(x as usize, y as usize)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Get the in-bounds orthogonal neighbors in the order left, right, up, down.
    pub fn neighbors(&self, x: i32, y: i32) -> Vec<Coord> {
        [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
            .into_iter()
            .filter(|&(nx, ny)| self.in_bounds(nx, ny))
            .map(Coord::from)
            .collect()
    }

    /// Get the in-bounds 8-connected neighbors.
    /// Enumeration is column by column: `x - 1..=x + 1` outer, `y - 1..=y + 1` inner.
    pub fn neighbors_8(&self, x: i32, y: i32) -> Vec<Coord> {
        let mut result = Vec::with_capacity(8);

        for nx in (x - 1)..=(x + 1) {
            for ny in (y - 1)..=(y + 1) {
                if nx == x && ny == y {
                    continue;
                }
                if self.in_bounds(nx, ny) {
                    result.push(Coord::new(nx, ny));
                }
            }
        }

        result
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
