//! Points, distances and the random source every entity draws from.

use glam::Vec2;

/// Logical surface coordinates. `y` grows downwards, like the terminal.
pub type Point = Vec2;

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f32 {
    p1.distance(p2)
}

/// Returns `value` unless it is NaN or infinite.
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Uniform random numbers. Seedable in production, scripted in tests.
pub trait RandomSource {
    /// A sample in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// A sample in `[min, max)`.
    fn random_in_range(&mut self, min: f32, max: f32) -> f32 {
        self.unit() * (max - min) + min
    }
}

impl RandomSource for fastrand::Rng {
    fn unit(&mut self) -> f32 {
        self.f32()
    }
}
