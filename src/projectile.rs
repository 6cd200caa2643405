use crate::geometry::{Point, RandomSource, distance, finite_or};
use crate::surface::{Color, DrawTarget};
use crate::trail::Trail;
use glam::Vec2;

pub const TRAIL_LEN: usize = 3;
pub const LAUNCH_SPEED: f32 = 0.7;
pub const ACCELERATION: f32 = 1.01;

const BRIGHTNESS_MIN: f32 = 60.0;
const BRIGHTNESS_MAX: f32 = 90.0;

// Pulsing target marker, kept in step even though nothing draws it.
const INDICATOR_MIN: f32 = 1.0;
const INDICATOR_MAX: f32 = 8.0;
const INDICATOR_STEP: f32 = 0.3;

// Rockets leave a fully transparent streak; only the sparks are visible.
const TRAIL_STYLE: Color = Color::rgba(255, 255, 255, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileOutcome {
    Continuing,
    Detonated { at: Point },
}

/// A rocket flying in a straight line from its origin to its target,
/// speeding up every frame.
#[derive(Debug, Clone)]
pub struct Projectile {
    position: Point,
    origin: Point,
    target: Point,
    total_distance: f32,
    distance_traveled: f32,
    trail: Trail<TRAIL_LEN>,
    angle: f32,
    speed: f32,
    acceleration: f32,
    brightness: f32,
    target_radius: f32,
}

impl Projectile {
    pub fn new<R: RandomSource>(origin: Point, target: Point, rng: &mut R) -> Self {
        let heading = target - origin;
        Self {
            position: origin,
            origin,
            target,
            total_distance: finite_or(distance(origin, target), 0.0),
            distance_traveled: 0.0,
            trail: Trail::filled(origin),
            angle: finite_or(heading.y.atan2(heading.x), 0.0),
            speed: LAUNCH_SPEED,
            acceleration: ACCELERATION,
            brightness: rng.random_in_range(BRIGHTNESS_MIN, BRIGHTNESS_MAX),
            target_radius: INDICATOR_MIN,
        }
    }

    /// Moves one frame along the heading.
    ///
    /// The step is measured before it is taken: once the next position would
    /// reach or overshoot the target the projectile stays where it is and
    /// reports `Detonated` at the target.
    pub fn advance(&mut self) -> ProjectileOutcome {
        self.trail.push_newest(self.position);

        // Pulse the target marker
        if self.target_radius < INDICATOR_MAX {
            self.target_radius += INDICATOR_STEP;
        } else {
            self.target_radius = INDICATOR_MIN;
        }

        // Thrust
        self.speed *= self.acceleration;

        let velocity = Vec2::from_angle(self.angle) * self.speed;
        let next = self.position + velocity;
        self.distance_traveled = distance(self.origin, next);

        if self.distance_traveled >= self.total_distance {
            ProjectileOutcome::Detonated { at: self.target }
        } else {
            self.position = next;
            ProjectileOutcome::Continuing
        }
    }

    pub fn draw<D: DrawTarget>(&self, surface: &mut D) {
        surface.begin_path();
        surface.move_to(self.trail.oldest());
        surface.line_to(self.position);
        surface.set_stroke_style(TRAIL_STYLE);
        surface.stroke();
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn total_distance(&self) -> f32 {
        self.total_distance
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
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

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn target_radius(&self) -> f32 {
        self.target_radius
    }
}
