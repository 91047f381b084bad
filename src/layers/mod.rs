//! Drawing layers. Each layer is a plain function over a [`Canvas`] and a [`Scene`], composed in
//! the fixed order lists [`artwork::STATIC_LAYERS`] and [`frame::FRAME_LAYERS`].

pub mod artwork;
pub mod complications;
pub mod frame;
pub mod rings;

use crate::canvas::Canvas;
use crate::color::{Color, Palette};
use crate::config::{GaugeConfig, Zone};
use crate::geometry::{resolve_zones, Dial, Tick, TickLayout};
use crate::text::{measure_text, Typeface};

/// A value-independent layer, drawn once into the cached artwork.
pub type StaticLayer = fn(&mut Canvas, &Scene);

/// A layer reading the live needle and values, drawn every frame.
pub type FrameLayer = fn(&mut Canvas, &Scene, &FrameState);

/// Geometry derived from configuration and size, rebuilt together with the artwork.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Logical side of the square surface
    pub size: f64,
    pub dial: Dial,
    pub ticks: TickLayout,
    pub zones: Vec<Zone>,
}

impl Layout {
    pub fn new(size: f64, config: &GaugeConfig, palette: &Palette, typeface: Option<&Typeface>) -> Self {
        let dial = Dial::new(size);
        let ticks = TickLayout::new(config, &dial, |text, font_size| {
            measure_text(typeface, text, font_size)
        });
        Self {
            size: dial.cx * 2.0,
            dial,
            ticks,
            zones: resolve_zones(config, &palette.redline),
        }
    }

    /// Converts a fraction of the face radius to logical pixels.
    pub fn radius(&self, fraction: f64) -> f64 {
        if fraction.is_finite() {
            self.dial.face * fraction
        } else {
            0.0
        }
    }
}

/// Everything a layer may read besides the live values.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub config: &'a GaugeConfig,
    pub palette: &'a Palette,
    pub typeface: Option<&'a Typeface>,
    pub layout: &'a Layout,
}

/// Live values for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameState<'a> {
    /// Simulated needle angle in raster radians
    pub angle: f64,
    /// Last value requested for the needle
    pub value: f64,
    pub time_ms: f64,
    pub rings: &'a [f64],
    pub complications: &'a [f64],
}

/// Major/minor tick stroke shared by the static ticks and the illuminated ones.
pub(crate) fn draw_tick(canvas: &mut Canvas, dial: &Dial, tick: &Tick, color: Color) {
    let (length, width) = if tick.major {
        (dial.major_tick_length, (dial.face * 0.012).max(1.0))
    } else {
        (dial.minor_tick_length, (dial.face * 0.006).max(0.75))
    };
    let (x0, y0) = dial.point(tick.angle, dial.tick_outer);
    let (x1, y1) = dial.point(tick.angle, dial.tick_outer - length);
    canvas.draw_thick_line_aa(x0, y0, x1, y1, width, color);
}

/// Color of a configured string, or `fallback` when absent or malformed.
pub(crate) fn color_or(value: Option<&str>, fallback: Color) -> Color {
    value.map(|s| Color::parse_or(s, fallback)).unwrap_or(fallback)
}
