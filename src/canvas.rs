// ============================================================================
// RASTER SURFACE & ANTI-ALIASED PRIMITIVES
// ============================================================================
//
// Every primitive takes logical coordinates and multiplies by the surface's pixel density, so
// layers draw the same picture at any resolution. Coverage is computed per physical pixel center.

use std::f64::consts::TAU;

use crate::color::Color;
use crate::error::{GaugeError, Result};

/// An RGBA8 frame buffer viewed as a drawing surface.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    scale: f64,
}

/// What a fill shader sees for one pixel.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Logical position of the pixel center
    pub x: f64,
    pub y: f64,
    /// Logical distance from the shape center
    pub distance: f64,
    /// Position along the arc, 0 at its `from` end and 1 at its `to` end
    pub along: f64,
}

/// Angular extent in raster radians. `to` may be less than `from`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub from: f64,
    pub to: f64,
}

impl ArcSpan {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize, scale: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GaugeError::EmptySurface);
        }
        let expected = width * height * 4;
        if frame.len() != expected {
            return Err(GaugeError::Surface {
                expected,
                actual: frame.len(),
            });
        }
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Ok(Self {
            frame,
            width,
            height,
            scale,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Copies a same-sized RGBA buffer over the whole surface.
    pub fn blit(&mut self, pixels: &[u8]) -> bool {
        if pixels.len() != self.frame.len() {
            return false;
        }
        self.frame.copy_from_slice(pixels);
        true
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let p = &self.frame[idx..idx + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Source-over blend of `color` at physical pixel `(x, y)` with extra `coverage`.
    pub(crate) fn set_pixel(&mut self, x: i64, y: i64, color: Color, coverage: f64) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = (coverage.clamp(0.0, 1.0) * color.a as f64 / 255.0) as f32;
        if a <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let dst = &mut self.frame[idx..idx + 4];
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for i in 0..3 {
            dst[i] = (src[i] * a + dst[i] as f32 * (1.0 - a)).round() as u8;
        }
        let dst_a = dst[3] as f32 / 255.0;
        dst[3] = ((a + dst_a * (1.0 - a)) * 255.0).round() as u8;
    }

    /// Physical pixel range covering logical `[lo, hi]`, clipped to `limit`.
    fn span(&self, lo: f64, hi: f64, limit: usize) -> std::ops::Range<i64> {
        let lo = (lo * self.scale).floor() as i64 - 1;
        let hi = (hi * self.scale).ceil() as i64 + 1;
        lo.max(0)..hi.min(limit as i64).max(0)
    }

    // ------------------------------------------------------------------------
    // Discs, rings and arc bands
    // ------------------------------------------------------------------------

    pub fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        self.fill_band(cx, cy, 0.0, radius, None, |_| color);
    }

    /// Fills the annulus `[r_inner, r_outer]`, optionally limited to `arc`, asking `shade` for the
    /// color of every covered pixel. Edges are anti-aliased radially and angularly.
    pub fn fill_band(
        &mut self,
        cx: f64,
        cy: f64,
        r_inner: f64,
        r_outer: f64,
        arc: Option<ArcSpan>,
        shade: impl Fn(&Sample) -> Color,
    ) {
        if ![cx, cy, r_inner, r_outer].iter().all(|v| v.is_finite()) || r_outer <= 0.0 {
            return;
        }
        let s = self.scale;
        let (pcx, pcy) = (cx * s, cy * s);
        let (ri, ro) = (r_inner.max(0.0) * s, r_outer * s);
        if ro <= ri {
            return;
        }

        let arc = match arc {
            Some(a) if a.from.is_finite() && a.to.is_finite() => {
                let (lo, hi) = (a.from.min(a.to), a.from.max(a.to));
                if hi - lo <= f64::EPSILON {
                    return;
                }
                Some((lo, hi, a.from > a.to))
            }
            Some(_) => return,
            None => None,
        };

        let ys = self.span(cy - r_outer, cy + r_outer, self.height);
        let xs = self.span(cx - r_outer, cx + r_outer, self.width);
        for py in ys {
            for px in xs.clone() {
                let dx = px as f64 + 0.5 - pcx;
                let dy = py as f64 + 0.5 - pcy;
                let d = (dx * dx + dy * dy).sqrt();
                let mut coverage = (ro - d + 0.5).clamp(0.0, 1.0);
                if ri > 0.0 {
                    coverage *= (d - ri + 0.5).clamp(0.0, 1.0);
                }
                if coverage <= 0.0 {
                    continue;
                }

                let mut along = 0.0;
                if let Some((lo, hi, reversed)) = arc {
                    let span = hi - lo;
                    let t = lo + (dy.atan2(dx) - lo).rem_euclid(TAU);
                    if span < TAU {
                        let edge = if t <= hi {
                            (t - lo).min(hi - t) * d
                        } else {
                            -((t - hi).min(lo + TAU - t) * d)
                        };
                        coverage *= (edge + 0.5).clamp(0.0, 1.0);
                        if coverage <= 0.0 {
                            continue;
                        }
                    }
                    along = ((t.min(hi) - lo) / span).clamp(0.0, 1.0);
                    if reversed {
                        along = 1.0 - along;
                    }
                }

                let sample = Sample {
                    x: (px as f64 + 0.5) / s,
                    y: (py as f64 + 0.5) / s,
                    distance: d / s,
                    along,
                };
                let color = shade(&sample);
                self.set_pixel(px, py, color, coverage);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Lines
    // ------------------------------------------------------------------------

    pub fn draw_thick_line_aa(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64, color: Color) {
        self.draw_line_profile(x0, y0, x1, y1, thickness, color, |_| 1.0);
    }

    /// Line narrowing toward `(x1, y1)`.
    pub fn draw_thick_line_tapered_aa(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f64,
        color: Color,
    ) {
        // 0.05 keeps the tip from vanishing
        self.draw_line_profile(x0, y0, x1, y1, thickness, color, |t| 1.0 - t * 0.95);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_line_profile(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f64,
        color: Color,
        profile: impl Fn(f64) -> f64,
    ) {
        if ![x0, y0, x1, y1, thickness].iter().all(|v| v.is_finite()) || thickness <= 0.0 {
            return;
        }
        let s = self.scale;
        let (x0, y0, x1, y1) = (x0 * s, y0 * s, x1 * s, y1 * s);
        let half = thickness * s / 2.0;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = dx * dx + dy * dy;
        let pad = half.ceil() + 1.0;
        let ys = ((y0.min(y1) - pad).floor() as i64).max(0)
            ..((y0.max(y1) + pad).ceil() as i64).min(self.height as i64);
        let xs = ((x0.min(x1) - pad).floor() as i64).max(0)
            ..((x0.max(x1) + pad).ceil() as i64).min(self.width as i64);
        for py in ys {
            for px in xs.clone() {
                let (x, y) = (px as f64 + 0.5, py as f64 + 0.5);
                let t = if len_sq > 0.0 {
                    (((x - x0) * dx + (y - y0) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (lx, ly) = (x0 + t * dx, y0 + t * dy);
                let dist = ((lx - x).powi(2) + (ly - y).powi(2)).sqrt();
                let local_half = half * profile(t);
                let aa = (local_half - dist + 0.5).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.set_pixel(px, py, color, aa);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Polygons
    // ------------------------------------------------------------------------

    /// Fills a simple polygon, `shade(x, y)` giving the color at each logical point.
    pub fn fill_polygon(&mut self, points: &[(f64, f64)], shade: impl Fn(f64, f64) -> Color) {
        self.polygon_pass(points, 0.0, |x, y, inside| {
            (shade(x, y), (inside + 0.5).clamp(0.0, 1.0))
        });
    }

    /// Soft halo around a polygon fading to nothing at `radius` logical pixels out.
    pub fn glow_polygon(&mut self, points: &[(f64, f64)], radius: f64, color: Color) {
        if !(radius > 0.0) {
            return;
        }
        let r_px = radius * self.scale;
        self.polygon_pass(points, radius, |_, _, inside| {
            let falloff = if inside >= 0.0 {
                1.0
            } else {
                (1.0 + inside / r_px).clamp(0.0, 1.0).powi(2)
            };
            (color, falloff)
        });
    }

    /// Walks the polygon's bounding box (grown by `margin`) handing `paint` the signed physical
    /// distance to the outline, positive inside.
    fn polygon_pass(
        &mut self,
        points: &[(f64, f64)],
        margin: f64,
        paint: impl Fn(f64, f64, f64) -> (Color, f64),
    ) {
        if points.len() < 3 || points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return;
        }
        let s = self.scale;
        let pts: Vec<(f64, f64)> = points.iter().map(|(x, y)| (x * s, y * s)).collect();
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (x, y) in points {
            min_x = min_x.min(*x);
            max_x = max_x.max(*x);
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }
        let ys = self.span(min_y - margin, max_y + margin, self.height);
        let xs = self.span(min_x - margin, max_x + margin, self.width);
        for py in ys {
            for px in xs.clone() {
                let (x, y) = (px as f64 + 0.5, py as f64 + 0.5);
                let inside = signed_distance(&pts, x, y);
                let (color, coverage) = paint(x / s, y / s, inside);
                if coverage > 0.0 {
                    self.set_pixel(px, py, color, coverage);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Rectangles and ellipses
    // ------------------------------------------------------------------------

    pub fn fill_rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Color) {
        if ![x, y, w, h, radius].iter().all(|v| v.is_finite()) || w <= 0.0 || h <= 0.0 {
            return;
        }
        let s = self.scale;
        let (hw, hh) = (w * s / 2.0, h * s / 2.0);
        let (ccx, ccy) = (x * s + hw, y * s + hh);
        let r = (radius * s).clamp(0.0, hw.min(hh));
        let ys = self.span(y, y + h, self.height);
        let xs = self.span(x, x + w, self.width);
        for py in ys {
            for px in xs.clone() {
                let qx = (px as f64 + 0.5 - ccx).abs() - (hw - r);
                let qy = (py as f64 + 0.5 - ccy).abs() - (hh - r);
                let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
                let d = outside + qx.max(qy).min(0.0) - r;
                let coverage = (0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.set_pixel(px, py, color, coverage);
                }
            }
        }
    }

    /// Outline of an axis-aligned rectangle with square corners.
    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, thickness: f64, color: Color) {
        let (l, t, r, b) = (x, y, x + w, y + h);
        for (x0, y0, x1, y1) in [(l, t, r, t), (l, b, r, b), (l, t, l, b), (r, t, r, b)] {
            self.draw_thick_line_aa(x0, y0, x1, y1, thickness, color);
        }
    }

    /// Fills a rotated ellipse; `shade` receives the normalized radius (0 center, 1 rim).
    #[allow(clippy::too_many_arguments)]
    pub fn fill_ellipse(
        &mut self,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        shade: impl Fn(f64) -> Color,
    ) {
        if ![cx, cy, rx, ry, rotation].iter().all(|v| v.is_finite()) || rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let s = self.scale;
        let (pcx, pcy, prx, pry) = (cx * s, cy * s, rx * s, ry * s);
        let (sin, cos) = rotation.sin_cos();
        let reach = rx.max(ry);
        let ys = self.span(cy - reach, cy + reach, self.height);
        let xs = self.span(cx - reach, cx + reach, self.width);
        for py in ys {
            for px in xs.clone() {
                let dx = px as f64 + 0.5 - pcx;
                let dy = py as f64 + 0.5 - pcy;
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                let k = ((u / prx).powi(2) + (v / pry).powi(2)).sqrt();
                let coverage = ((1.0 - k) * prx.min(pry) + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.set_pixel(px, py, shade(k.min(1.0)), coverage);
                }
            }
        }
    }
}

/// Signed distance from `(x, y)` to a polygon outline, positive inside (even-odd rule).
pub(crate) fn signed_distance(points: &[(f64, f64)], x: f64, y: f64) -> f64 {
    let mut inside = false;
    let mut nearest = f64::MAX;
    let n = points.len();
    for i in 0..n {
        let (ax, ay) = points[i];
        let (bx, by) = points[(i + 1) % n];
        if (ay > y) != (by > y) && x < ax + (y - ay) * (bx - ax) / (by - ay) {
            inside = !inside;
        }
        let (ex, ey) = (bx - ax, by - ay);
        let len_sq = ex * ex + ey * ey;
        let t = if len_sq > 0.0 {
            (((x - ax) * ex + (y - ay) * ey) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (qx, qy) = (ax + t * ex - x, ay + t * ey - y);
        nearest = nearest.min((qx * qx + qy * qy).sqrt());
    }
    if inside {
        nearest
    } else {
        -nearest
    }
}

/// An owned RGBA buffer, used for offscreen surfaces and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub scale: f64,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a transparent buffer, failing instead of aborting when memory is short.
    pub fn new(width: usize, height: usize, scale: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GaugeError::EmptySurface);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(GaugeError::Allocation { width, height })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| GaugeError::Allocation { width, height })?;
        pixels.resize(len, 0);
        Ok(Self {
            width,
            height,
            scale,
            pixels,
        })
    }

    pub fn canvas(&mut self) -> Result<Canvas<'_>> {
        Canvas::new(&mut self.pixels, self.width, self.height, self.scale)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let p = &self.pixels[idx..idx + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }
}
