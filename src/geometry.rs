//! Pure value-to-angle and dial layout math shared by every layer.

use crate::config::{GaugeConfig, Zone};

/// Degrees clockwise from 12 o'clock to raster radians (zero at 3 o'clock, y down).
pub fn dial_radians(degrees: f64) -> f64 {
    if degrees.is_finite() {
        (degrees - 90.0).to_radians()
    } else {
        0.0
    }
}

/// Position of `value` inside `[min, max]`, clamped to `[0, 1]`.
///
/// Degenerate or non-finite ranges and non-finite values resolve to 0. A zero range therefore
/// puts the needle on the start angle rather than on raster angle 0: the start angle is the only
/// constant that keeps `angle(min)` equal to the start of the sweep for every configuration.
pub fn value_fraction(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !(span.is_finite() && span > 0.0) || !value.is_finite() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Maps a fraction of the sweep onto the arc between `start_deg` and `end_deg`.
///
/// The endpoints are returned exactly rather than through `start + 1.0 * span`.
pub fn fraction_to_angle(fraction: f64, start_deg: f64, end_deg: f64) -> f64 {
    let start = dial_radians(start_deg);
    let end = dial_radians(end_deg);
    if !(fraction > 0.0) {
        start
    } else if fraction >= 1.0 {
        end
    } else {
        start + fraction * (end - start)
    }
}

/// Needle angle in radians for `value` under `config`.
pub fn value_to_angle(config: &GaugeConfig, value: f64) -> f64 {
    let fraction = value_fraction(value, config.min, config.max);
    fraction_to_angle(fraction, config.start_angle, config.end_angle)
}

/// Fraction of the sweep covered by `angle`, clamped to `[0, 1]`. Zero for degenerate sweeps.
pub fn sweep_fraction(config: &GaugeConfig, angle: f64) -> f64 {
    let start = dial_radians(config.start_angle);
    let end = dial_radians(config.end_angle);
    let span = (end - start).abs();
    if span <= f64::EPSILON || !angle.is_finite() {
        return 0.0;
    }
    (progress_along(angle, start, end) / span).clamp(0.0, 1.0)
}

/// `+1.0` for clockwise sweeps, `-1.0` for counter-clockwise ones.
pub fn sweep_direction(start: f64, end: f64) -> f64 {
    if end >= start {
        1.0
    } else {
        -1.0
    }
}

/// How far `angle` has travelled along the sweep from `start`, in the sweep's own direction.
pub fn progress_along(angle: f64, start: f64, end: f64) -> f64 {
    (angle - start) * sweep_direction(start, end)
}

// ============================================================================
// DIAL GEOMETRY
// ============================================================================

/// Radii of the concentric dial rings in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dial {
    pub cx: f64,
    pub cy: f64,
    /// Outer edge of the bezel
    pub r: f64,
    pub bezel_inner: f64,
    pub face: f64,
    pub tick_outer: f64,
    pub major_tick_length: f64,
    pub minor_tick_length: f64,
}

impl Dial {
    /// Geometry for a square logical surface of side `size`.
    pub fn new(size: f64) -> Self {
        let size = if size.is_finite() { size.max(0.0) } else { 0.0 };
        let cx = size / 2.0;
        let r = size / 2.0 * 0.94;
        let bezel_inner = r * 0.92;
        let face = bezel_inner * 0.985;
        Self {
            cx,
            cy: cx,
            r,
            bezel_inner,
            face,
            tick_outer: face * 0.94,
            major_tick_length: face * 0.1,
            minor_tick_length: face * 0.05,
        }
    }

    pub fn tick_inner(&self) -> f64 {
        self.tick_outer - self.major_tick_length
    }

    /// Point at `radius` along raster angle `angle`.
    pub fn point(&self, angle: f64, radius: f64) -> (f64, f64) {
        (self.cx + angle.cos() * radius, self.cy + angle.sin() * radius)
    }
}

// ============================================================================
// ZONES
// ============================================================================

/// Zones to draw: the configured list, or one synthesized from a legacy threshold when the list
/// is empty. `redlineStart` wins over `dangerStart`; the two are never summed.
pub fn resolve_zones(config: &GaugeConfig, redline_color: &str) -> Vec<Zone> {
    if !config.zones.is_empty() {
        return config.zones.clone();
    }
    match config.redline_start.or(config.danger_start) {
        Some(start) if start.is_finite() => {
            vec![Zone::new(start, config.max, redline_color)]
        }
        _ => Vec::new(),
    }
}

// ============================================================================
// TICKS & LABELS
// ============================================================================

/// One major or minor tick position.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub angle: f64,
    pub major: bool,
    /// Index into the label list for major ticks
    pub label: Option<usize>,
}

/// Tick positions in sweep order, labels, and where to put the labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLayout {
    pub ticks: Vec<Tick>,
    pub labels: Vec<String>,
    pub label_radius: f64,
    pub widest_label: f64,
    /// Font size the labels were measured at
    pub font_size: f64,
}

/// Gap between the inner end of major ticks and the outer edge of the widest label.
pub const LABEL_GAP_FACTOR: f64 = 0.035;

/// Label font size as a fraction of the face radius.
pub const LABEL_FONT_FACTOR: f64 = 0.11;

impl TickLayout {
    /// Lays out ticks for `config` on `dial`, measuring labels with `measure(text, size)`.
    ///
    /// Degenerate ranges or sweeps and fewer than two major ticks produce an empty layout.
    pub fn new(config: &GaugeConfig, dial: &Dial, measure: impl Fn(&str, f64) -> f64) -> Self {
        let font_size = dial.face * LABEL_FONT_FACTOR;
        let empty = Self {
            ticks: Vec::new(),
            labels: Vec::new(),
            label_radius: dial.tick_inner(),
            widest_label: 0.0,
            font_size,
        };
        let span = config.max - config.min;
        if config.major_ticks < 2
            || !(span.is_finite() && span > 0.0)
            || config.start_angle == config.end_angle
        {
            return empty;
        }

        let intervals = (config.major_ticks - 1) as usize;
        let minors = config.minor_ticks as usize;
        let step = span / intervals as f64;
        let labels: Vec<String> = (0..=intervals)
            .map(|i| match config.custom_labels.get(i) {
                Some(custom) => custom.clone(),
                None => format_tick_value(config.min + step * i as f64, step),
            })
            .collect();

        let mut ticks = Vec::with_capacity((intervals + 1) * (minors + 1));
        for i in 0..=intervals {
            let t = i as f64 / intervals as f64;
            let value = config.min + span * t;
            ticks.push(Tick {
                value,
                angle: fraction_to_angle(t, config.start_angle, config.end_angle),
                major: true,
                label: Some(i),
            });
            if i < intervals {
                for j in 1..=minors {
                    let minor_t = t + j as f64 / ((minors + 1) * intervals) as f64;
                    ticks.push(Tick {
                        value: config.min + span * minor_t,
                        angle: fraction_to_angle(minor_t, config.start_angle, config.end_angle),
                        major: false,
                        label: None,
                    });
                }
            }
        }

        let widest_label = labels
            .iter()
            .map(|label| measure(label, font_size))
            .fold(0.0, f64::max);
        let label_radius =
            (dial.tick_inner() - dial.face * LABEL_GAP_FACTOR - widest_label / 2.0).max(0.0);

        Self {
            ticks,
            labels,
            label_radius,
            widest_label,
            font_size,
        }
    }
}

/// Formats a tick value with just enough decimals for its step.
pub fn format_tick_value(value: f64, step: f64) -> String {
    let decimals = if (step - step.round()).abs() < 1e-9 {
        0
    } else if ((step * 10.0) - (step * 10.0).round()).abs() < 1e-9 {
        1
    } else {
        2
    };
    let formatted = format!("{value:.decimals$}");
    if formatted.starts_with('-') && formatted.trim_start_matches(['-', '0', '.']).is_empty() {
        formatted[1..].to_string()
    } else {
        formatted
    }
}
