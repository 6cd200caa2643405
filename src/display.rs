use crate::canvas::Canvas;
use crate::config::{DisplayConfig, SchedulerConfig};
use crate::error::Result;
use crate::geometry::RandomSource;
use crate::scheduler::Scheduler;
use crossterm::event::{Event, MouseButton, MouseEventKind};
use log::debug;
use std::io::Write;
use std::time::Duration;

/// The fireworks show on a terminal: a scheduler drawing into a raster
/// canvas, fed by crossterm mouse events.
pub struct FireworksDisplay<R> {
    scheduler: Scheduler<R>,
    canvas: Canvas,
}

impl<R: RandomSource> FireworksDisplay<R> {
    pub fn new(
        cols: usize,
        rows: usize,
        scheduler_config: SchedulerConfig,
        display_config: &DisplayConfig,
        rng: R,
    ) -> Result<Self> {
        let canvas = Canvas::new(
            cols,
            rows,
            display_config.cell_scale,
            display_config.background,
        )?;
        let (width, height) = canvas.logical_size();
        let scheduler = Scheduler::new(width, height, scheduler_config, rng);
        Ok(Self { scheduler, canvas })
    }

    pub fn update(&mut self, dt: Duration) {
        self.scheduler.frame(dt, &mut self.canvas);
    }

    pub fn render<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.canvas.render(out)?;
        Ok(())
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Event::Mouse(mouse) = event else {
            return;
        };
        let at = self.canvas.cell_to_logical(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.scheduler.pointer_pressed(at),
            MouseEventKind::Up(MouseButton::Left) => self.scheduler.pointer_released(),
            MouseEventKind::Moved | MouseEventKind::Drag(_) => self.scheduler.pointer_moved(at),
            _ => {}
        }
    }

    /// Follows a terminal resize. Live projectiles and sparks carry on.
    ///
    /// A collapsed pane reports zero columns or rows; the previous raster and
    /// surface size are kept until a usable size arrives.
    pub fn resize(&mut self, cols: usize, rows: usize) -> Result<()> {
        if cols == 0 || rows == 0 {
            debug!("ignoring resize to {cols}x{rows}");
            return Ok(());
        }
        self.canvas.resize(cols, rows)?;
        let (width, height) = self.canvas.logical_size();
        self.scheduler.resize(width, height);
        Ok(())
    }

    /// Halts the show; see [`Scheduler::stop`].
    pub fn stop(&mut self) -> usize {
        self.scheduler.stop()
    }

    pub fn scheduler(&self) -> &Scheduler<R> {
        &self.scheduler
    }
}
