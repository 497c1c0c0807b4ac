//! Start point selection with a minimum spacing between features.

use rand::Rng;

use crate::tilemap::Coord;

/// Rejected draws tolerated before giving up on a placement.
pub const MAX_START_ATTEMPTS: usize = 500;

/// Pick a candidate at least `min_distance` (exclusive) away from every placed start.
///
/// Candidates are drawn uniformly at random and removed from `candidates` whether
/// accepted or not. Returns `None` once the list runs dry or after
/// [`MAX_START_ATTEMPTS`] rejected draws, so dense maps yield fewer features
/// than requested instead of looping.
pub fn select_start<R: Rng>(
    rng: &mut R,
    candidates: &mut Vec<Coord>,
    placed: &[Coord],
    min_distance: u32,
) -> Option<Coord> {
    let min_sq = (min_distance as i64) * (min_distance as i64);
    let mut rejected = 0;

    loop {
        if candidates.is_empty() {
            return None;
        }
        let candidate = candidates.remove(rng.gen_range(0..candidates.len()));

        if placed.iter().all(|start| start.distance_squared(candidate) > min_sq) {
            return Some(candidate);
        }

        rejected += 1;
        if rejected >= MAX_START_ATTEMPTS {
            return None;
        }
    }
}
