//! The drawing capabilities the simulation needs from its host.
//!
//! The calls mirror a 2D canvas context: build a path, stroke it with the
//! current stroke style, fill rectangles with the current fill style, and pick
//! how new pixels combine with what is already there.

use crate::error::{Error, Result};
use crate::geometry::Point;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeOp {
    /// New pixels are painted over old ones.
    #[default]
    SourceOver,
    /// Old pixels are erased in proportion to the new pixel's alpha.
    DestinationOut,
    /// Colours add up, overlapping sparks get brighter.
    Lighter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgba { r: u8, g: u8, b: u8, a: f32 },
    /// Hue in degrees (any value, wraps), saturation and lightness in percent.
    Hsla { h: f32, s: f32, l: f32, a: f32 },
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::Rgba { r, g, b, a }
    }

    pub const fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self::Hsla { h, s, l, a }
    }

    /// Channels in `[0, 1]`, not premultiplied. Alpha is clamped the way a
    /// canvas clamps CSS colours, so `1.2` behaves as `1.0`.
    pub fn to_unit_rgba(self) -> [f32; 4] {
        match self {
            Self::Rgba { r, g, b, a } => [
                f32::from(r) / 255.0,
                f32::from(g) / 255.0,
                f32::from(b) / 255.0,
                clamp_unit(a),
            ],
            Self::Hsla { h, s, l, a } => {
                let [r, g, b] = hsl_to_rgb(h, s / 100.0, l / 100.0);
                [r, g, b, clamp_unit(a)]
            }
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgba { r, g, b, a } => write!(f, "rgba({r},{g},{b},{a})"),
            Self::Hsla { h, s, l, a } => write!(f, "hsla({h}, {s}%, {l}%, {a})"),
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(360.0);
    let s = clamp_unit(s);
    let l = clamp_unit(l);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h / 60.0;
    let x = c * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m]
}

/// An opaque background colour, parsed from `RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        let invalid = || Error::InvalidColor(hex.to_string());
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Line and rectangle primitives plus the state that styles them.
pub trait DrawTarget {
    fn begin_path(&mut self);
    fn move_to(&mut self, to: Point);
    fn line_to(&mut self, to: Point);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn set_stroke_style(&mut self, style: Color);
    fn set_fill_style(&mut self, style: Color);
    fn set_composite(&mut self, op: CompositeOp);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Command {
        BeginPath,
        MoveTo(Point),
        LineTo(Point),
        Stroke,
        FillRect(f32, f32, f32, f32),
        StrokeStyle(Color),
        FillStyle(Color),
        Composite(CompositeOp),
    }

    /// Remembers every call in order.
    #[derive(Debug, Default)]
    pub(crate) struct Recorder {
        pub(crate) commands: Vec<Command>,
    }

    impl Recorder {
        /// The `MoveTo` points, one per stroked segment.
        pub(crate) fn segment_starts(&self) -> Vec<Point> {
            self.commands
                .iter()
                .filter_map(|c| match c {
                    Command::MoveTo(p) => Some(*p),
                    _ => None,
                })
                .collect()
        }
    }

    impl DrawTarget for Recorder {
        fn begin_path(&mut self) {
            self.commands.push(Command::BeginPath);
        }
        fn move_to(&mut self, to: Point) {
            self.commands.push(Command::MoveTo(to));
        }
        fn line_to(&mut self, to: Point) {
            self.commands.push(Command::LineTo(to));
        }
        fn stroke(&mut self) {
            self.commands.push(Command::Stroke);
        }
        fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
            self.commands.push(Command::FillRect(x, y, width, height));
        }
        fn set_stroke_style(&mut self, style: Color) {
            self.commands.push(Command::StrokeStyle(style));
        }
        fn set_fill_style(&mut self, style: Color) {
            self.commands.push(Command::FillStyle(style));
        }
        fn set_composite(&mut self, op: CompositeOp) {
            self.commands.push(Command::Composite(op));
        }
    }
}
