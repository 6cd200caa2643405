use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::surface::{Color, CompositeOp, DrawTarget, Rgb};
use std::io::Write;

type Pixel = [f32; 4];

const CLEAR: Pixel = [0.0; 4];

/// A raster of premultiplied RGBA pixels shown as half-block terminal cells.
///
/// Callers draw in logical coordinates; every raster pixel covers `scale`
/// logical pixels in both directions. Each terminal cell holds two raster
/// pixels, the top one as background colour and the bottom one as the
/// foreground of a `▄`.
pub struct Canvas {
    width: usize,
    height: usize,
    scale: f32,
    background: Rgb,
    pixels: Vec<Pixel>,
    composite: CompositeOp,
    stroke_style: Pixel,
    fill_style: Pixel,
    path: Vec<(Point, Point)>,
    cursor: Option<Point>,
    output_buf: Vec<u8>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, scale: f32, background: Rgb) -> Result<Self> {
        let mut canvas = Self {
            width: 0,
            height: 0,
            scale,
            background,
            pixels: Vec::new(),
            composite: CompositeOp::default(),
            stroke_style: CLEAR,
            fill_style: CLEAR,
            path: Vec::new(),
            cursor: None,
            output_buf: Vec::new(),
        };
        canvas.resize(cols, rows)?;
        Ok(canvas)
    }

    /// Reallocates for a new terminal size. The picture is cleared.
    pub fn resize(&mut self, cols: usize, rows: usize) -> Result<()> {
        if cols == 0 || rows == 0 {
            return Err(Error::SurfaceTooSmall { cols, rows });
        }
        self.width = cols;
        self.height = rows * 2;
        self.pixels = vec![CLEAR; self.width * self.height];
        self.output_buf = Vec::with_capacity(self.width * self.height * 25);
        Ok(())
    }

    /// Size of the drawable area in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.width as f32 * self.scale,
            self.height as f32 * self.scale,
        )
    }

    /// Logical position of the top-left corner of a terminal cell.
    pub fn cell_to_logical(&self, column: u16, row: u16) -> Point {
        Point::new(
            f32::from(column) * self.scale,
            f32::from(row) * 2.0 * self.scale,
        )
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top = None;
        let mut prev_bot = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.shade(x, y);
                let bot = if y + 1 < self.height {
                    self.shade(x, y + 1)
                } else {
                    self.background
                };

                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }

    // The pixel composited over the opaque background.
    fn shade(&self, x: usize, y: usize) -> Rgb {
        let p = self.pixels[y * self.width + x];
        let uncovered = 1.0 - p[3];
        let channel = |premultiplied: f32, bg: u8| {
            ((premultiplied + f32::from(bg) / 255.0 * uncovered) * 255.0)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb(
            channel(p[0], self.background.0),
            channel(p[1], self.background.1),
            channel(p[2], self.background.2),
        )
    }

    fn blend(&mut self, x: usize, y: usize, src: Pixel) {
        let dst = &mut self.pixels[y * self.width + x];
        match self.composite {
            CompositeOp::SourceOver => {
                let keep = 1.0 - src[3];
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = s + *d * keep;
                }
            }
            CompositeOp::DestinationOut => {
                let keep = 1.0 - src[3];
                for d in dst.iter_mut() {
                    *d *= keep;
                }
            }
            CompositeOp::Lighter => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = (*d + s).min(1.0);
                }
            }
        }
    }

    fn raster_line(&mut self, from: Point, to: Point, color: Pixel) {
        let a = from / self.scale;
        let delta = to / self.scale - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0);
        if !steps.is_finite() {
            return;
        }
        let limit = 2 * (self.width + self.height);
        let steps = (steps as usize).min(limit);

        let mut last = None;
        for i in 0..=steps {
            let p = a + delta * (i as f32 / steps as f32);
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let cell = (p.x as usize, p.y as usize);
            if cell.0 >= self.width || cell.1 >= self.height || last == Some(cell) {
                continue;
            }
            last = Some(cell);
            self.blend(cell.0, cell.1, color);
        }
    }
}

fn premultiply(color: Color) -> Pixel {
    let [r, g, b, a] = color.to_unit_rgba();
    [r * a, g * a, b * a, a]
}

impl DrawTarget for Canvas {
    fn begin_path(&mut self) {
        self.path.clear();
        self.cursor = None;
    }

    fn move_to(&mut self, to: Point) {
        self.cursor = Some(to);
    }

    fn line_to(&mut self, to: Point) {
        if let Some(from) = self.cursor {
            self.path.push((from, to));
        }
        self.cursor = Some(to);
    }

    fn stroke(&mut self) {
        let color = self.stroke_style;
        if color == CLEAR {
            return;
        }
        let segments = std::mem::take(&mut self.path);
        for &(from, to) in &segments {
            self.raster_line(from, to, color);
        }
        self.path = segments;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let span = |start: f32, len: f32, max: usize| {
            let lo = (start.min(start + len) / self.scale).floor().max(0.0) as usize;
            let hi = (start.max(start + len) / self.scale).ceil().max(0.0) as usize;
            lo.min(max)..hi.min(max)
        };
        let xs = span(x, width, self.width);
        let ys = span(y, height, self.height);
        let color = self.fill_style;
        for py in ys {
            for px in xs.clone() {
                self.blend(px, py, color);
            }
        }
    }

    fn set_stroke_style(&mut self, style: Color) {
        self.stroke_style = premultiply(style);
    }

    fn set_fill_style(&mut self, style: Color) {
        self.fill_style = premultiply(style);
    }

    fn set_composite(&mut self, op: CompositeOp) {
        self.composite = op;
    }
}
