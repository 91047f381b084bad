//! Secondary value rings concentric with the dial.

use std::f64::consts::TAU;

use crate::canvas::{ArcSpan, Canvas};
use crate::color::Color;
use crate::config::Ring;
use crate::geometry::{dial_radians, value_fraction};

use super::{color_or, FrameState, Scene};

/// Overlay opacity of a flashing ring at `time_ms`.
pub fn flash_alpha(hz: f64, time_ms: f64) -> f64 {
    if !hz.is_finite() || !time_ms.is_finite() {
        return 0.5;
    }
    0.5 + 0.5 * (TAU * hz * time_ms / 1000.0).sin()
}

/// Cells lit for `fraction` of a ring split into `segments`.
pub fn lit_segments(fraction: f64, segments: u32) -> u32 {
    ((fraction.clamp(0.0, 1.0) * segments as f64).round() as u32).min(segments)
}

pub(crate) fn draw_rings(canvas: &mut Canvas, scene: &Scene, state: &FrameState) {
    for (i, ring) in scene.config.rings.iter().enumerate() {
        let value = state.rings.get(i).copied().unwrap_or(ring.value);
        draw_ring(canvas, scene, ring, value, state.time_ms);
    }
}

fn draw_ring(canvas: &mut Canvas, scene: &Scene, ring: &Ring, value: f64, time_ms: f64) {
    let layout = scene.layout;
    let d = &layout.dial;
    let start_deg = ring.start_angle.unwrap_or(scene.config.start_angle);
    let end_deg = ring.end_angle.unwrap_or(scene.config.end_angle);
    let sweep_deg = end_deg - start_deg;
    if sweep_deg.abs() <= f64::EPSILON || !sweep_deg.is_finite() {
        return;
    }
    let outer = layout.radius(ring.radius + ring.width / 2.0);
    let inner = layout.radius(ring.radius - ring.width / 2.0);
    let fraction = value_fraction(value, ring.min, ring.max);
    let fill = Color::parse_or(&ring.color, Color::new(0x29, 0xb6, 0xf6));
    let track = ring.track.as_deref().map(|t| Color::parse_or(t, Color::TRANSPARENT));
    let flash = ring
        .flash_threshold
        .filter(|threshold| value.is_finite() && value > *threshold)
        .map(|_| {
            color_or(ring.flash_color.as_deref(), scene.palette.redline_color())
                .with_alpha(flash_alpha(ring.flash_hz, time_ms))
        });

    let band = |canvas: &mut Canvas, from_deg: f64, to_deg: f64, color: Color| {
        let span = ArcSpan::new(dial_radians(from_deg), dial_radians(to_deg));
        canvas.fill_band(d.cx, d.cy, inner, outer, Some(span), |_| color);
    };

    match ring.segments.filter(|n| *n > 0) {
        Some(segments) => {
            let cell = sweep_deg / segments as f64;
            let gap = (ring.gap_degrees.max(0.0) / 2.0).min(cell.abs() / 2.0) * cell.signum();
            let lit = lit_segments(fraction, segments);
            for k in 0..segments {
                let from = start_deg + cell * k as f64 + gap;
                let to = start_deg + cell * (k + 1) as f64 - gap;
                if k < lit {
                    band(canvas, from, to, fill);
                    if let Some(flash) = flash {
                        band(canvas, from, to, flash);
                    }
                } else if let Some(track) = track {
                    band(canvas, from, to, track);
                }
            }
        }
        None => {
            if let Some(track) = track {
                band(canvas, start_deg, end_deg, track);
            }
            if fraction > 0.0 {
                let to = start_deg + sweep_deg * fraction;
                band(canvas, start_deg, to, fill);
                if let Some(flash) = flash {
                    band(canvas, start_deg, to, flash);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn flash_oscillates_between_zero_and_one() {
        assert_abs_diff_eq!(flash_alpha(2.0, 0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(flash_alpha(2.0, 125.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(flash_alpha(2.0, 375.0), 0.0, epsilon = 1e-12);
        assert_eq!(flash_alpha(f64::NAN, 10.0), 0.5);
    }

    #[test]
    fn segments_light_proportionally() {
        assert_eq!(lit_segments(0.0, 10), 0);
        assert_eq!(lit_segments(0.44, 10), 4);
        assert_eq!(lit_segments(0.46, 10), 5);
        assert_eq!(lit_segments(1.5, 10), 10);
    }
}
