//! Sub-dial complications inside the main face.
//!
//! Each complication maps its own range onto its own sweep, which may run either way; every
//! position goes through [`fraction_to_angle`] so counter-clockwise dials need no special case.

use crate::canvas::{ArcSpan, Canvas};
use crate::color::Color;
use crate::config::Complication;
use crate::geometry::{dial_radians, fraction_to_angle, value_fraction};
use crate::text::{draw_curved_text, draw_text};

use super::{color_or, FrameState, Scene};

/// Pixel geometry of one complication.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubDial {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    /// Radial thickness of the track and fill band
    pub band: f64,
}

impl SubDial {
    pub fn new(complication: &Complication, size: f64, face: f64) -> Self {
        let r = face * complication.radius;
        let band_fraction = complication
            .fill
            .as_ref()
            .map(|f| f.width)
            .unwrap_or(0.14)
            .clamp(0.0, 1.0);
        Self {
            cx: complication.x * size,
            cy: complication.y * size,
            r,
            band: r * band_fraction,
        }
    }

    pub fn inner(&self) -> f64 {
        self.r - self.band
    }

    pub fn point(&self, angle: f64, radius: f64) -> (f64, f64) {
        (self.cx + angle.cos() * radius, self.cy + angle.sin() * radius)
    }
}

/// Raster angle of `value` on the complication's own sweep.
pub fn complication_angle(complication: &Complication, value: f64) -> f64 {
    let fraction = value_fraction(value, complication.min, complication.max);
    fraction_to_angle(fraction, complication.start_angle, complication.end_angle)
}

pub(crate) fn draw_complications(canvas: &mut Canvas, scene: &Scene, state: &FrameState) {
    for (i, complication) in scene.config.complications.iter().enumerate() {
        let value = state.complications.get(i).copied().unwrap_or(complication.value);
        draw_complication(canvas, scene, complication, value);
    }
}

fn draw_complication(canvas: &mut Canvas, scene: &Scene, c: &Complication, value: f64) {
    let layout = scene.layout;
    let dial = SubDial::new(c, layout.size, layout.dial.face);
    if !(dial.r > 0.0) || !dial.cx.is_finite() || !dial.cy.is_finite() {
        return;
    }
    let start = dial_radians(c.start_angle);
    let end = dial_radians(c.end_angle);
    let swept = (end - start).abs() > f64::EPSILON;
    let palette = scene.palette;

    if let (Some(track), true) = (&c.track, swept) {
        let track = Color::parse_or(track, Color::TRANSPARENT);
        let span = ArcSpan::new(start, end);
        canvas.fill_band(dial.cx, dial.cy, dial.inner(), dial.r, Some(span), |_| track);
    }

    // Zones sit just inside the track.
    for zone in &c.zones {
        let from = complication_angle(c, zone.start);
        let to = complication_angle(c, zone.end);
        let outer = dial.inner() - dial.r * zone.offset.unwrap_or(0.0);
        let inner = outer - dial.r * zone.width.unwrap_or(0.06);
        let color = Color::parse_or(&zone.color, palette.redline_color());
        canvas.fill_band(dial.cx, dial.cy, inner, outer, Some(ArcSpan::new(from, to)), |_| color);
    }

    let angle = complication_angle(c, value);

    if let (Some(fill), true) = (&c.fill, swept) {
        let color = Color::parse_or(&fill.color, Color::new(0x4f, 0xc3, 0xf7));
        let span = ArcSpan::new(start, angle);
        if fill.glow {
            let halo = dial.band * 0.6;
            canvas.fill_band(dial.cx, dial.cy, dial.inner() - halo, dial.r + halo, Some(span), |s| {
                let edge = if s.distance > dial.r {
                    s.distance - dial.r
                } else {
                    dial.inner() - s.distance
                };
                let fade = (1.0 - edge.max(0.0) / halo).clamp(0.0, 1.0);
                color.with_alpha(0.35 * fade * fade)
            });
        }
        canvas.fill_band(dial.cx, dial.cy, dial.inner(), dial.r, Some(span), |_| color);
    }

    if let Some(ticks) = c.ticks.as_ref().filter(|t| t.count >= 2) {
        let color = color_or(ticks.color.as_deref(), palette.ticks_color());
        let (outer, inner) = (dial.inner() - dial.r * 0.03, dial.inner() - dial.r * 0.12);
        for k in 0..ticks.count {
            let t = k as f64 / (ticks.count - 1) as f64;
            let a = fraction_to_angle(t, c.start_angle, c.end_angle);
            let (x0, y0) = dial.point(a, outer);
            let (x1, y1) = dial.point(a, inner);
            canvas.draw_thick_line_aa(x0, y0, x1, y1, 1.0, color);
        }
    }

    if let Some(marker) = &c.marker {
        let a = complication_angle(c, marker.value);
        let color = Color::parse_or(&marker.color, Color::WHITE);
        let (x0, y0) = dial.point(a, dial.inner() - dial.r * 0.04);
        let (x1, y1) = dial.point(a, dial.r * 1.04);
        canvas.draw_thick_line_aa(x0, y0, x1, y1, 2.0, color);
    }

    for label in &c.labels {
        let a = complication_angle(c, label.at);
        draw_curved_text(
            canvas,
            scene.typeface,
            dial.cx,
            dial.cy,
            dial.r * 1.15,
            &label.text,
            dial.r * 0.18,
            a,
            std::f64::consts::FRAC_PI_2,
            palette.numbers_color(),
        );
    }

    let captions = [
        (c.label.as_deref(), 0.45, 0.22, palette.label_color()),
        (c.units.as_deref(), 0.72, 0.16, palette.units_color()),
    ];
    for (text, below, size, color) in captions {
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            let y = dial.cy + dial.r * below;
            draw_text(canvas, scene.typeface, dial.cx, y, text, dial.r * size, color);
        }
    }

    if let Some(pointer) = &c.pointer {
        let color = Color::parse_or(&pointer.color, Color::new(0xff, 0x70, 0x43));
        let (x, y) = dial.point(angle, dial.r * 0.95);
        canvas.draw_thick_line_tapered_aa(dial.cx, dial.cy, x, y, pointer.width * 2.0, color);
        canvas.draw_circle(dial.cx, dial.cy, dial.r * 0.07, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn counter_clockwise_complications_map_backwards() {
        let c = Complication {
            start_angle: 120.0,
            end_angle: -120.0,
            ..Complication::default()
        };
        assert_eq!(complication_angle(&c, c.min), dial_radians(120.0));
        assert_eq!(complication_angle(&c, c.max), dial_radians(-120.0));
        assert!(complication_angle(&c, 75.0) < complication_angle(&c, 25.0));
    }

    #[test]
    fn sub_dial_scales_with_face() {
        let c = Complication::default();
        let dial = SubDial::new(&c, 400.0, 150.0);
        assert_relative_eq!(dial.cx, 200.0);
        assert_relative_eq!(dial.cy, 280.0);
        assert_relative_eq!(dial.r, 33.0);
        assert_relative_eq!(dial.inner(), 33.0 * (1.0 - 0.14));
    }
}
