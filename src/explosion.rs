use crate::geometry::{Point, RandomSource};
use crate::spark::Spark;

pub const SPARKS_PER_BURST: usize = 65;

/// Turns a detonation into a fresh burst of sparks, all starting at `at`.
pub fn detonate<R: RandomSource>(at: Point, ambient_hue: f32, rng: &mut R) -> Vec<Spark> {
    (0..SPARKS_PER_BURST)
        .map(|_| Spark::new(at, ambient_hue, &mut *rng))
        .collect()
}
