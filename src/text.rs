// ============================================================================
// TEXT RENDERING
// ============================================================================

use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::{GaugeError, Result};

/// Average advance per character, as a fraction of the font size, used when no typeface is loaded.
pub const FALLBACK_ADVANCE: f64 = 0.6;

/// DejaVu Sans Mono (Bitstream Vera license, see `assets/DejaVuSansMono-LICENSE.txt`).
static BUILTIN_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// The single font every text layer draws with.
#[derive(Clone)]
pub struct Typeface {
    font: Font<'static>,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl Typeface {
    /// The font compiled into the crate, used until a host supplies its own.
    pub fn builtin() -> Result<Self> {
        Font::try_from_bytes(BUILTIN_FONT)
            .map(|font| Self { font })
            .ok_or_else(|| GaugeError::Font("bundled font could not be parsed".into()))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Font::try_from_vec(bytes)
            .map(|font| Self { font })
            .ok_or_else(|| GaugeError::Font("font data could not be parsed".into()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
            .map_err(|_| GaugeError::Font(format!("{} is not a usable font", path.display())))
    }

    fn layout(&self, text: &str, size: f32) -> Vec<PositionedGlyph<'static>> {
        let scale = Scale::uniform(size);
        let v_metrics = self.font.v_metrics(scale);
        self.font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect()
    }

    /// Inked width of `text` at `size`.
    pub fn measure(&self, text: &str, size: f64) -> f64 {
        let glyphs = self.layout(text, size as f32);
        let (min_x, max_x) = glyphs
            .iter()
            .filter_map(|g| g.pixel_bounding_box())
            .fold((i32::MAX, i32::MIN), |(lo, hi), bb| {
                (lo.min(bb.min.x), hi.max(bb.max.x))
            });
        if min_x < max_x {
            (max_x - min_x) as f64
        } else {
            0.0
        }
    }
}

/// Width of `text` at `size`, estimated when there is no typeface.
pub fn measure_text(face: Option<&Typeface>, text: &str, size: f64) -> f64 {
    if !(size.is_finite() && size > 0.0) {
        return 0.0;
    }
    match face {
        Some(face) => face.measure(text, size),
        None => text.chars().count() as f64 * size * FALLBACK_ADVANCE,
    }
}

/// Draws `text` centered on logical `(x, y)`.
pub fn draw_text(
    canvas: &mut Canvas,
    face: Option<&Typeface>,
    x: f64,
    y: f64,
    text: &str,
    size: f64,
    color: Color,
) {
    let Some(face) = face else { return };
    if text.is_empty() || !(size.is_finite() && size > 0.0) || !x.is_finite() || !y.is_finite() {
        return;
    }
    let s = canvas.scale();
    let glyphs = face.layout(text, (size * s) as f32);
    let Some((min_x, max_x, min_y, max_y)) = ink_bounds(&glyphs) else {
        return;
    };
    let offset_x = (x * s).round() as i64 - ((max_x - min_x) / 2) as i64;
    let offset_y = (y * s).round() as i64 - ((max_y - min_y) / 2) as i64;
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i64 + (bb.min.x - min_x) as i64;
                let py = offset_y + gy as i64 + (bb.min.y - min_y) as i64;
                canvas.set_pixel(px, py, color, v as f64);
            });
        }
    }
}

fn ink_bounds(glyphs: &[PositionedGlyph]) -> Option<(i32, i32, i32, i32)> {
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    (min_x < max_x && min_y < max_y).then_some((min_x, max_x, min_y, max_y))
}

/// Lays `text` along a circle of `radius` around `(cx, cy)`, centered on raster angle
/// `center_angle` and reading clockwise. `max_span` caps the arc the text may occupy.
#[allow(clippy::too_many_arguments)]
pub fn draw_curved_text(
    canvas: &mut Canvas,
    face: Option<&Typeface>,
    cx: f64,
    cy: f64,
    radius: f64,
    text: &str,
    size: f64,
    center_angle: f64,
    max_span: f64,
    color: Color,
) {
    let Some(face) = face else { return };
    if !(radius > 0.0 && size > 0.0) || ![cx, cy, center_angle, max_span].iter().all(|v| v.is_finite())
    {
        return;
    }
    let s = canvas.scale();
    let (pcx, pcy, pr) = (cx * s, cy * s, radius * s);
    let glyphs = face.layout(text, (size * s) as f32);
    let (Some(first), Some(last)) = (glyphs.first(), glyphs.last()) else {
        return;
    };

    let first_x = first.position().x as f64;
    let total_width =
        (last.position().x - first.position().x + last.unpositioned().h_metrics().advance_width) as f64;
    if total_width <= 0.0 {
        return;
    }
    let span = (total_width / pr).min(max_span);
    // Compress the advance when the text has to fit a shorter arc.
    let squeeze = span / (total_width / pr);
    let start_angle = center_angle - span / 2.0;

    for glyph in &glyphs {
        if glyph.pixel_bounding_box().is_none() {
            continue;
        }
        let advance = glyph.unpositioned().h_metrics().advance_width as f64;
        let along = glyph.position().x as f64 - first_x + advance / 2.0;
        let angle = start_angle + along * squeeze / pr;
        let gx = pcx + angle.cos() * pr;
        let gy = pcy + angle.sin() * pr;
        draw_rotated_glyph(canvas, glyph, gx, gy, angle + std::f64::consts::FRAC_PI_2, color);
    }
}

/// Rotates one glyph about its ink center and splats it at physical `(cx, cy)`.
fn draw_rotated_glyph(
    canvas: &mut Canvas,
    glyph: &PositionedGlyph,
    cx: f64,
    cy: f64,
    rotation: f64,
    color: Color,
) {
    let Some(bb) = glyph.pixel_bounding_box() else {
        return;
    };
    let (sin_r, cos_r) = rotation.sin_cos();
    let center_x = (bb.min.x + bb.max.x) as f64 / 2.0;
    let center_y = (bb.min.y + bb.max.y) as f64 / 2.0;
    glyph.draw(|gx, gy, v| {
        if v <= 0.001 {
            return;
        }
        let lx = gx as f64 + bb.min.x as f64 - center_x;
        let ly = gy as f64 + bb.min.y as f64 - center_y;
        let x = cx + lx * cos_r - ly * sin_r;
        let y = cy + lx * sin_r + ly * cos_r;
        splat(canvas, x, y, color, v as f64);
    });
}

/// Bilinear splat of one coverage sample over the four nearest pixels.
fn splat(canvas: &mut Canvas, x: f64, y: f64, color: Color, alpha: f64) {
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);
    for (px, py, weight) in [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ] {
        let a = alpha * weight;
        if a > 0.001 {
            canvas.set_pixel(px, py, color, a);
        }
    }
}
