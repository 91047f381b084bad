// ============================================================================
// PER-FRAME LAYERS
// ============================================================================

use crate::canvas::{ArcSpan, Canvas};
use crate::color::{interpolate_colors, parse_stops, Color};
use crate::geometry::{dial_radians, progress_along, sweep_direction};
use crate::text::{draw_text, measure_text};

use super::complications::draw_complications;
use super::rings::draw_rings;
use super::{color_or, draw_tick, FrameLayer, FrameState, Scene};

pub const FRAME_LAYERS: &[(&str, FrameLayer)] = &[
    ("needle", draw_needle),
    ("cap", draw_cap),
    ("active-ticks", draw_active_ticks),
    ("progress-arc", draw_progress_arc),
    ("rings", draw_rings),
    ("complications", draw_complications),
    ("digital", draw_digital_readout),
];

/// Arc length over which the progress gradient holds one color.
pub const PROGRESS_SEGMENT_DEGREES: f64 = 2.0;

pub fn paint_frame_layers(canvas: &mut Canvas, scene: &Scene, state: &FrameState) {
    for (name, layer) in FRAME_LAYERS {
        log::trace!("frame layer {name}");
        layer(canvas, scene, state);
    }
}

// ----------------------------------------------------------------------------
// Needle
// ----------------------------------------------------------------------------

/// Needle outline in logical coordinates: a six-point dart, with a counterweight tail unless an
/// inner ring is configured, in which case it starts just outside the ring.
pub fn needle_outline(scene: &Scene, angle: f64) -> [(f64, f64); 6] {
    let layout = scene.layout;
    let d = &layout.dial;
    let length = layout.radius(0.86);
    let width = layout.radius(0.045);
    let (sin, cos) = angle.sin_cos();
    let at = |along: f64, across: f64| {
        (
            d.cx + cos * along - sin * across,
            d.cy + sin * along + cos * across,
        )
    };

    match &scene.config.inner_ring {
        Some(ring) => {
            let origin = layout.radius(ring.radius + ring.width / 2.0);
            let shoulder = origin + (length - origin) * 0.1;
            [
                at(length, width * 0.06),
                at(shoulder, width * 0.4),
                at(origin, width * 0.3),
                at(origin, -width * 0.3),
                at(shoulder, -width * 0.4),
                at(length, -width * 0.06),
            ]
        }
        None => {
            let tail = layout.radius(0.18);
            [
                at(length, width * 0.08),
                at(0.0, width / 2.0),
                at(-tail, width * 0.4),
                at(-tail, -width * 0.4),
                at(0.0, -width / 2.0),
                at(length, -width * 0.08),
            ]
        }
    }
}

fn draw_needle(canvas: &mut Canvas, scene: &Scene, state: &FrameState) {
    if !state.angle.is_finite() {
        return;
    }
    let d = &scene.layout.dial;
    let outline = needle_outline(scene, state.angle);
    let flat = scene.palette.needle_color();

    if scene.config.needle_glow {
        canvas.glow_polygon(&outline, scene.layout.radius(0.05), flat.with_alpha(0.45));
    }

    let Some(base) = Color::parse_hex_triplet(&scene.palette.needle) else {
        canvas.fill_polygon(&outline, |_, _| flat);
        return;
    };
    // Lit ridge along the needle, dark edges either side.
    let stops = [
        (0.0, base.darken(0.4)),
        (0.3, base),
        (0.5, base.lighten(0.45)),
        (0.7, base),
        (1.0, base.darken(0.5)),
    ];
    let half = scene.layout.radius(0.045) / 2.0;
    let (sin, cos) = state.angle.sin_cos();
    canvas.fill_polygon(&outline, |x, y| {
        let across = -(x - d.cx) * sin + (y - d.cy) * cos;
        interpolate_colors(&stops, 0.5 + across / (2.0 * half), base)
    });
}

fn draw_cap(canvas: &mut Canvas, scene: &Scene, _state: &FrameState) {
    if scene.config.inner_ring.is_some() {
        return;
    }
    let layout = scene.layout;
    let d = &layout.dial;
    let r = layout.radius(0.07);
    let rim = Color::new(0x2b, 0x2b, 0x2b);
    let stops = [(0.0, rim.lighten(0.35)), (1.0, rim)];
    let (lx, ly) = (d.cx - r * 0.3, d.cy - r * 0.3);
    canvas.fill_band(d.cx, d.cy, 0.0, r, None, |s| {
        interpolate_colors(&stops, (s.x - lx).hypot(s.y - ly) / (r * 1.3), rim)
    });
    canvas.draw_circle(d.cx, d.cy, layout.radius(0.025), scene.palette.needle_color());
}

// ----------------------------------------------------------------------------
// Illumination
// ----------------------------------------------------------------------------

/// Relights ticks from the start of the sweep up to the needle, stopping at the first tick past it.
fn draw_active_ticks(canvas: &mut Canvas, scene: &Scene, state: &FrameState) {
    let Some(active) = &scene.config.active_ticks else {
        return;
    };
    if !state.angle.is_finite() {
        return;
    }
    let config = scene.config;
    let (start, end) = (dial_radians(config.start_angle), dial_radians(config.end_angle));
    let reached = progress_along(state.angle, start, end) + 1e-9;
    let color = Color::parse_or(&active.color, Color::new(0xff, 0xb3, 0x00));
    for tick in &scene.layout.ticks.ticks {
        if progress_along(tick.angle, start, end) > reached {
            break;
        }
        draw_tick(canvas, &scene.layout.dial, tick, color);
    }
}

/// Track over the whole sweep, then a fill from the start angle to the needle whose color steps
/// every [`PROGRESS_SEGMENT_DEGREES`] along the gradient.
fn draw_progress_arc(canvas: &mut Canvas, scene: &Scene, state: &FrameState) {
    let Some(arc) = &scene.config.progress_arc else {
        return;
    };
    let config = scene.config;
    let layout = scene.layout;
    let d = &layout.dial;
    let (start, end) = (dial_radians(config.start_angle), dial_radians(config.end_angle));
    let total_deg = (config.end_angle - config.start_angle).abs();
    if total_deg <= f64::EPSILON || !state.angle.is_finite() {
        return;
    }
    let outer = layout.radius(arc.radius);
    let inner = outer - layout.radius(arc.width);

    if let Some(track) = &arc.track {
        let track = Color::parse_or(track, Color::TRANSPARENT);
        canvas.fill_band(d.cx, d.cy, inner, outer, Some(ArcSpan::new(start, end)), |_| track);
    }

    let filled_deg = progress_along(state.angle, start, end).to_degrees().clamp(0.0, total_deg);
    if filled_deg <= 0.0 {
        return;
    }
    let stops = parse_stops(&arc.stops, scene.palette.needle_color());
    let flat = color_or(arc.color.as_deref(), scene.palette.needle_color());
    let span = ArcSpan::new(start, start + sweep_direction(start, end) * filled_deg.to_radians());
    canvas.fill_band(d.cx, d.cy, inner, outer, Some(span), |s| {
        if stops.is_empty() {
            return flat;
        }
        let deg = s.along * filled_deg;
        let segment = (deg / PROGRESS_SEGMENT_DEGREES).floor();
        let mid = ((segment + 0.5) * PROGRESS_SEGMENT_DEGREES).min(total_deg);
        interpolate_colors(&stops, mid / total_deg, flat)
    });
}

// ----------------------------------------------------------------------------
// Digital readout
// ----------------------------------------------------------------------------

/// Readout text for `value`: rounded to `decimals`, with units appended when asked.
pub fn readout_text(value: f64, decimals: u32, units: Option<&str>) -> String {
    let decimals = decimals.min(6) as usize;
    let value = if value.is_finite() { value } else { 0.0 };
    let mut text = format!("{value:.decimals$}");
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text.remove(0);
    }
    match units {
        Some(units) if !units.is_empty() => format!("{text} {units}"),
        _ => text,
    }
}

fn draw_digital_readout(canvas: &mut Canvas, scene: &Scene, state: &FrameState) {
    let config = scene.config;
    if !config.show_digital_value {
        return;
    }
    let display = config.digital_display.clone().unwrap_or_default();
    let layout = scene.layout;
    let units = display.show_units.then_some(config.units.as_str());
    let text = readout_text(state.value, display.decimals, units);
    let size = layout.radius(display.font_size);
    let (x, y) = (display.x * layout.size, display.y * layout.size);

    if let Some(plate) = &display.background {
        let plate = Color::parse_or(plate, Color::rgba(0, 0, 0, 140));
        let w = measure_text(scene.typeface, &text, size) + size * 0.8;
        let h = size * 1.3;
        canvas.fill_rounded_rect(x - w / 2.0, y - h / 2.0, w, h, h * 0.2, plate);
    }
    let color = color_or(display.color.as_deref(), scene.palette.numbers_color());
    draw_text(canvas, scene.typeface, x, y, &text, size, color);
}
