use crate::geometry::{Point, RandomSource};
use crate::surface::{Color, DrawTarget};
use crate::trail::Trail;
use glam::Vec2;
use std::f32::consts::TAU;

pub const TRAIL_LEN: usize = 5;
pub const FRICTION: f32 = 0.9;
pub const GRAVITY: f32 = 0.8;
pub const INITIAL_ALPHA: f32 = 1.2;
pub const HUE_SPREAD: f32 = 40.0;

const SPEED_MIN: f32 = 1.0;
const SPEED_MAX: f32 = 10.0;
const BRIGHTNESS_MIN: f32 = 60.0;
const BRIGHTNESS_MAX: f32 = 80.0;
const DECAY_MIN: f32 = 0.015;
const DECAY_MAX: f32 = 0.025;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparkOutcome {
    Alive,
    Exhausted,
}

/// A burst fragment: flies off at a fixed angle, slows down, falls and fades.
#[derive(Debug, Clone)]
pub struct Spark {
    position: Point,
    trail: Trail<TRAIL_LEN>,
    angle: f32,
    speed: f32,
    friction: f32,
    gravity: f32,
    hue: f32,
    brightness: f32,
    alpha: f32,
    decay: f32,
}

impl Spark {
    pub fn new<R: RandomSource>(origin: Point, ambient_hue: f32, rng: &mut R) -> Self {
        Self {
            position: origin,
            trail: Trail::filled(origin),
            angle: rng.random_in_range(0.0, TAU),
            speed: rng.random_in_range(SPEED_MIN, SPEED_MAX),
            friction: FRICTION,
            gravity: GRAVITY,
            hue: rng.random_in_range(ambient_hue - HUE_SPREAD, ambient_hue + HUE_SPREAD),
            brightness: rng.random_in_range(BRIGHTNESS_MIN, BRIGHTNESS_MAX),
            alpha: INITIAL_ALPHA,
            decay: rng.random_in_range(DECAY_MIN, DECAY_MAX),
        }
    }

    /// Applies friction, velocity, gravity and fade for one frame.
    ///
    /// A spark is spent once its alpha drops to its own decay rate, one step
    /// before it would reach zero.
    pub fn advance(&mut self) -> SparkOutcome {
        self.trail.push_newest(self.position);
        // Air resistance
        self.speed *= self.friction;

        let velocity = Vec2::from_angle(self.angle) * self.speed;
        // Gravity acts on position only, speed keeps decaying
        self.position += velocity + Vec2::new(0.0, self.gravity);
        self.alpha -= self.decay;

        if self.alpha <= self.decay {
            SparkOutcome::Exhausted
        } else {
            SparkOutcome::Alive
        }
    }

    pub fn draw<D: DrawTarget>(&self, surface: &mut D) {
        surface.begin_path();
        surface.move_to(self.trail.oldest());
        surface.line_to(self.position);
        surface.set_stroke_style(self.color());
        surface.stroke();
    }

    pub fn color(&self) -> Color {
        Color::hsla(self.hue, 100.0, self.brightness, self.alpha)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn trail(&self) -> &Trail<TRAIL_LEN> {
        &self.trail
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }
}
