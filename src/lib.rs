//! A fireworks show for the terminal.
//!
//! Rockets ([`projectile::Projectile`]) climb from the bottom edge to random
//! targets, or towards the mouse while the left button is held, and burst into
//! sparks ([`spark::Spark`]) that slow down, fall and fade. The
//! [`scheduler::Scheduler`] runs the frames against any
//! [`surface::DrawTarget`]; [`display::FireworksDisplay`] wires it to a
//! half-block terminal [`canvas::Canvas`].

pub mod canvas;
pub mod config;
pub mod display;
pub mod error;
pub mod explosion;
pub mod geometry;
pub mod launch;
pub mod population;
pub mod projectile;
pub mod scheduler;
pub mod spark;
pub mod surface;
pub mod trail;

pub use error::{Error, Result};
