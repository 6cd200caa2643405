//! The live projectiles and sparks.
//!
//! Both collections are walked from the last index to the first. An entity
//! removed during the walk only shifts the ones already visited, so every
//! survivor is drawn and advanced exactly once per frame.

use crate::explosion;
use crate::geometry::RandomSource;
use crate::projectile::{Projectile, ProjectileOutcome};
use crate::spark::{Spark, SparkOutcome};
use crate::surface::DrawTarget;
use log::trace;

#[derive(Debug, Default)]
pub struct Population {
    projectiles: Vec<Projectile>,
    sparks: Vec<Spark>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn add_sparks(&mut self, sparks: impl IntoIterator<Item = Spark>) {
        self.sparks.extend(sparks);
    }

    /// Draws then advances every entity once. Detonated projectiles are
    /// replaced by a burst coloured around `ambient_hue`; the new sparks are
    /// drawn and advanced in the same frame.
    pub fn step_and_draw<D: DrawTarget, R: RandomSource>(
        &mut self,
        surface: &mut D,
        ambient_hue: f32,
        rng: &mut R,
    ) {
        let mut i = self.projectiles.len();
        while i > 0 {
            i -= 1;
            self.projectiles[i].draw(surface);
            if let ProjectileOutcome::Detonated { at } = self.projectiles[i].advance() {
                self.projectiles.remove(i);
                trace!(
                    "detonation at ({:.1}, {:.1}) hue {:.0}",
                    at.x,
                    at.y,
                    ambient_hue
                );
                self.add_sparks(explosion::detonate(at, ambient_hue, rng));
            }
        }

        let mut i = self.sparks.len();
        while i > 0 {
            i -= 1;
            self.sparks[i].draw(surface);
            if self.sparks[i].advance() == SparkOutcome::Exhausted {
                self.sparks.remove(i);
            }
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty() && self.sparks.is_empty()
    }
}
