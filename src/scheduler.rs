//! Frame orchestration.
//!
//! Each call to [`Scheduler::frame`] first fires the deferred launches that
//! came due since the previous frame, then runs one frame body: pick the
//! ambient hue, fade the surface, step every entity, and tick the autolaunch
//! and pointer throttle timers.

use crate::config::SchedulerConfig;
use crate::geometry::{Point, RandomSource};
use crate::launch::{self, LaunchOrigin, LaunchQueue};
use crate::population::Population;
use crate::projectile::Projectile;
use crate::surface::{Color, CompositeOp, DrawTarget};
use log::{debug, info};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub down: bool,
    pub position: Point,
}

pub struct Scheduler<R> {
    config: SchedulerConfig,
    rng: R,
    state: SchedulerState,
    width: f32,
    height: f32,
    clock: Duration,
    ambient_hue: f32,
    autolaunch_timer: u32,
    throttle_timer: u32,
    pointer: Pointer,
    population: Population,
    launches: LaunchQueue,
}

impl<R: RandomSource> Scheduler<R> {
    pub fn new(width: f32, height: f32, config: SchedulerConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            state: SchedulerState::Idle,
            width,
            height,
            clock: Duration::ZERO,
            ambient_hue: 0.0,
            autolaunch_timer: 0,
            throttle_timer: 0,
            pointer: Pointer::default(),
            population: Population::new(),
            launches: LaunchQueue::new(),
        }
    }

    /// Advances the clock by `dt` and runs one frame. Does nothing once
    /// stopped.
    pub fn frame<D: DrawTarget>(&mut self, dt: Duration, surface: &mut D) {
        match self.state {
            SchedulerState::Stopped => return,
            SchedulerState::Idle => {
                info!(
                    "fireworks started on a {}x{} surface",
                    self.width,
                    self.height
                );
                self.state = SchedulerState::Running;
            }
            SchedulerState::Running => {}
        }

        self.clock += dt;
        self.fire_due_launches();

        self.ambient_hue = self.rng.random_in_range(0.0, 360.0);
        self.fade(surface);
        self.population.step_and_draw(surface, self.ambient_hue, &mut self.rng);

        self.tick_autolaunch();
        self.tick_throttle();
    }

    /// Stops the frame loop and drops the pending launches. Returns how many
    /// launches were cancelled.
    pub fn stop(&mut self) -> usize {
        if self.state == SchedulerState::Stopped {
            return 0;
        }
        self.state = SchedulerState::Stopped;
        let cancelled = self.launches.cancel_all();
        info!(
            "fireworks stopped after {:.1}s, {} pending launches cancelled",
            self.clock.as_secs_f32(),
            cancelled
        );
        cancelled
    }

    /// Starts a projectile right away.
    pub fn launch(&mut self, origin: Point, target: Point) {
        let projectile = Projectile::new(origin, target, &mut self.rng);
        self.population.add_projectile(projectile);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        info!("surface resized to {width}x{height}");
        self.width = width;
        self.height = height;
    }

    pub fn pointer_moved(&mut self, to: Point) {
        self.pointer.position = to;
    }

    pub fn pointer_pressed(&mut self, at: Point) {
        self.pointer = Pointer {
            down: true,
            position: at,
        };
    }

    pub fn pointer_released(&mut self) {
        self.pointer.down = false;
    }

    fn fire_due_launches(&mut self) {
        while let Some(origin) = self.launches.pop_due(self.clock) {
            self.launch_from(origin);
        }
    }

    fn launch_from(&mut self, origin: LaunchOrigin) {
        let start = origin.resolve(self.width, self.height);
        let target = Point::new(
            self.rng.random_in_range(0.0, self.width),
            self.rng.random_in_range(0.0, self.height * self.config.target_ceiling),
        );
        self.launch(start, target);
    }

    // Erase part of the previous frame instead of clearing it, then switch to
    // additive blending for the entities.
    fn fade<D: DrawTarget>(&self, surface: &mut D) {
        surface.set_composite(CompositeOp::DestinationOut);
        surface.set_fill_style(Color::rgba(0, 0, 0, self.config.fade_alpha));
        surface.fill_rect(0.0, 0.0, self.width, self.height);
        surface.set_composite(CompositeOp::Lighter);
    }

    fn tick_autolaunch(&mut self) {
        if self.autolaunch_timer >= self.config.autolaunch_period {
            if !self.pointer.down {
                let batch = launch::batch_for_width(self.width, self.config.narrow_max_width);
                self.launches.schedule_batch(self.clock, batch);
                debug!(
                    "autolaunch batch of {} scheduled at {:?}",
                    batch.len(),
                    self.clock
                );
                self.autolaunch_timer = 0;
            }
        } else {
            self.autolaunch_timer += 1;
        }
    }

    fn tick_throttle(&mut self) {
        if self.throttle_timer >= self.config.throttle_period {
            if self.pointer.down {
                let start = Point::new(self.width / 2.0, self.height);
                let target = self.pointer.position;
                debug!("pointer launch towards ({:.1}, {:.1})", target.x, target.y);
                self.launch(start, target);
                self.throttle_timer = 0;
            }
        } else {
            self.throttle_timer += 1;
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn pending_launches(&self) -> &LaunchQueue {
        &self.launches
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn ambient_hue(&self) -> f32 {
        self.ambient_hue
    }

    pub fn autolaunch_timer(&self) -> u32 {
        self.autolaunch_timer
    }

    pub fn throttle_timer(&self) -> u32 {
        self.throttle_timer
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn surface_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::testing::Scripted;
    use crate::launch::STANDARD_BATCH;
    use crate::surface::recording::{Command, Recorder};
    use pretty_assertions::assert_eq;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn scheduler(width: f32, height: f32) -> Scheduler<Scripted> {
        Scheduler::new(
            width,
            height,
            SchedulerConfig::default(),
            Scripted::constant(0.5),
        )
    }

    #[test]
    fn first_frame_starts_running() {
        let mut s = scheduler(800.0, 600.0);
        assert_eq!(s.state(), SchedulerState::Idle);
        s.frame(FRAME, &mut Recorder::default());
        assert_eq!(s.state(), SchedulerState::Running);
        assert_eq!(s.clock(), FRAME);
        assert_eq!(s.ambient_hue(), 180.0);
    }

    #[test]
    fn frame_opens_with_fade_pass() {
        let mut s = scheduler(800.0, 600.0);
        let mut recorder = Recorder::default();
        s.frame(FRAME, &mut recorder);

        assert_eq!(
            recorder.commands,
            vec![
                Command::Composite(CompositeOp::DestinationOut),
                Command::FillStyle(Color::rgba(0, 0, 0, 0.5)),
                Command::FillRect(0.0, 0.0, 800.0, 600.0),
                Command::Composite(CompositeOp::Lighter),
            ]
        );
    }

    #[test]
    fn autolaunch_schedules_standard_batch() {
        let mut s = scheduler(800.0, 600.0);
        s.autolaunch_timer = 150;
        s.frame(FRAME, &mut Recorder::default());

        assert_eq!(s.autolaunch_timer(), 0);
        let upcoming = s.pending_launches().upcoming();
        assert_eq!(upcoming.len(), 21);

        let mut expected: Vec<(Duration, LaunchOrigin)> = STANDARD_BATCH
            .iter()
            .map(|slot| (FRAME + Duration::from_millis(slot.delay_ms), slot.origin))
            .collect();
        expected.sort_by_key(|&(due, _)| due);
        let due: Vec<Duration> = upcoming.iter().map(|&(d, _)| d).collect();
        assert_eq!(due, expected.iter().map(|&(d, _)| d).collect::<Vec<_>>());
    }

    #[test]
    fn autolaunch_uses_narrow_batch_on_small_surfaces() {
        let mut s = scheduler(500.0, 800.0);
        s.autolaunch_timer = 150;
        s.frame(FRAME, &mut Recorder::default());
        assert_eq!(s.pending_launches().len(), 12);
    }

    #[test]
    fn held_pointer_suppresses_autolaunch() {
        let mut s = scheduler(800.0, 600.0);
        s.autolaunch_timer = 150;
        s.pointer_pressed(Point::new(10.0, 10.0));
        s.frame(FRAME, &mut Recorder::default());

        assert!(s.pending_launches().is_empty());
        assert_eq!(s.autolaunch_timer(), 150);
    }

    #[test]
    fn autolaunch_timer_counts_frames() {
        let mut s = scheduler(800.0, 600.0);
        let mut recorder = Recorder::default();
        for _ in 0..150 {
            s.frame(FRAME, &mut recorder);
        }
        assert_eq!(s.autolaunch_timer(), 150);
        assert!(s.pending_launches().is_empty());

        s.frame(FRAME, &mut recorder);
        assert_eq!(s.autolaunch_timer(), 0);
        assert_eq!(s.pending_launches().len(), 21);
    }

    #[test]
    fn throttle_launches_towards_pointer() {
        let mut s = scheduler(800.0, 600.0);
        s.throttle_timer = 5;
        s.pointer_pressed(Point::new(400.0, 300.0));
        s.frame(FRAME, &mut Recorder::default());

        assert_eq!(s.throttle_timer(), 0);
        let projectiles = s.population().projectiles();
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].origin(), Point::new(400.0, 600.0));
        assert_eq!(projectiles[0].target(), Point::new(400.0, 300.0));
    }

    #[test]
    fn throttle_waits_for_pointer() {
        let mut s = scheduler(800.0, 600.0);
        s.throttle_timer = 5;
        s.frame(FRAME, &mut Recorder::default());
        assert_eq!(s.throttle_timer(), 5);
        assert!(s.population().projectiles().is_empty());

        s.pointer_pressed(Point::new(100.0, 100.0));
        s.frame(FRAME, &mut Recorder::default());
        assert_eq!(s.population().projectiles().len(), 1);
    }

    #[test]
    fn held_pointer_launches_every_sixth_frame() {
        let mut s = scheduler(800.0, 600.0);
        s.pointer_pressed(Point::new(400.0, 100.0));
        let mut recorder = Recorder::default();
        for _ in 0..18 {
            s.frame(FRAME, &mut recorder);
        }
        assert_eq!(s.population().projectiles().len(), 3);
    }

    #[test]
    fn deferred_launches_fire_on_later_frames() {
        let mut s = scheduler(800.0, 600.0);
        s.autolaunch_timer = 150;
        let mut recorder = Recorder::default();
        s.frame(FRAME, &mut recorder);
        assert!(s.population().projectiles().is_empty());

        // the three zero-delay launches
        s.frame(FRAME, &mut recorder);
        assert_eq!(s.population().projectiles().len(), 3);
        assert_eq!(s.pending_launches().len(), 18);

        for _ in 0..70 {
            s.frame(FRAME, &mut recorder);
        }
        assert!(s.pending_launches().is_empty());
    }

    #[test]
    fn autolaunch_targets_stay_in_upper_band() {
        let mut s = scheduler(800.0, 600.0);
        s.autolaunch_timer = 150;
        let mut recorder = Recorder::default();
        s.frame(FRAME, &mut recorder);
        s.frame(FRAME, &mut recorder);

        for p in s.population().projectiles() {
            assert_eq!(p.target(), Point::new(400.0, 240.0));
            assert_eq!(p.origin().y, 600.0);
        }
    }

    #[test]
    fn stop_cancels_pending_and_freezes() {
        let mut s = scheduler(800.0, 600.0);
        s.autolaunch_timer = 150;
        let mut recorder = Recorder::default();
        s.frame(FRAME, &mut recorder);

        assert_eq!(s.stop(), 21);
        assert_eq!(s.state(), SchedulerState::Stopped);
        assert_eq!(s.stop(), 0);

        let clock = s.clock();
        let drawn = recorder.commands.len();
        s.frame(FRAME, &mut recorder);
        assert_eq!(s.clock(), clock);
        assert_eq!(recorder.commands.len(), drawn);
        assert!(s.population().is_empty());
    }

    #[test]
    fn resize_moves_launch_origins() {
        let mut s = scheduler(800.0, 600.0);
        s.resize(1000.0, 400.0);
        s.throttle_timer = 5;
        s.pointer_pressed(Point::new(1.0, 1.0));
        s.frame(FRAME, &mut Recorder::default());
        assert_eq!(
            s.population().projectiles()[0].origin(),
            Point::new(500.0, 400.0)
        );
        assert_eq!(s.surface_size(), (1000.0, 400.0));
    }
}
