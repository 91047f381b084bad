//! Colors, palettes and gradient interpolation.
//!
//! Configuration carries colors as CSS-like strings (`#rgb`, `#rrggbb`, `rgb(..)`, `rgba(..)`).
//! They are parsed at draw time; anything unparseable falls back to the caller's default.

use serde::{Deserialize, Serialize};

use crate::config::{ColorOverrides, FaceStyle, GaugeConfig};

// ============================================================================
// COLOR
// ============================================================================

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with its alpha scaled by `factor` (clamped to `[0, 1]`).
    pub fn with_alpha(self, factor: f64) -> Self {
        let factor = if factor.is_finite() { factor.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            a: (self.a as f64 * factor).round() as u8,
            ..self
        }
    }

    /// Parses any supported color notation.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.starts_with('#') {
            return Self::parse_hex(s);
        }
        let lower = s.to_ascii_lowercase();
        let inner = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let channel = |p: &str| p.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        let (r, g, b) = (channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
        let a = match parts.get(3) {
            Some(p) => {
                let alpha = p.parse::<f64>().ok()?;
                if !alpha.is_finite() {
                    return None;
                }
                (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
            }
            None => 0xff,
        };
        Some(Self::rgba(r, g, b, a))
    }

    /// Parses `#rgb` or `#rrggbb`.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Self::parse_hex_triplet(input),
            _ => None,
        }
    }

    /// Parses strictly `#rrggbb`. The needle's lit gradient is only built from this form.
    pub fn parse_hex_triplet(input: &str) -> Option<Self> {
        let hex = input.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
    }

    /// Parses `input`, falling back to `fallback` when it is malformed.
    pub fn parse_or(input: &str, fallback: Color) -> Self {
        Self::parse(input).unwrap_or_else(|| {
            log::debug!("unparseable color {input:?}, using fallback");
            fallback
        })
    }

    /// Moves each channel toward white by `amount` in `[0, 1]`.
    pub fn lighten(self, amount: f64) -> Self {
        self.mix(Color::rgba(0xff, 0xff, 0xff, self.a), amount)
    }

    /// Moves each channel toward black by `amount` in `[0, 1]`.
    pub fn darken(self, amount: f64) -> Self {
        self.mix(Color::rgba(0x00, 0x00, 0x00, self.a), amount)
    }

    /// Linear RGBA interpolation, `t = 0` is `self`.
    pub fn mix(self, other: Color, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: lerp(self.a, other.a),
        }
    }
}

// ============================================================================
// GRADIENTS
// ============================================================================

/// One stop of a gradient along a normalized position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub at: f64,
    pub color: String,
}

impl GradientStop {
    pub fn new(at: f64, color: impl Into<String>) -> Self {
        Self {
            at,
            color: color.into(),
        }
    }
}

/// Parses gradient stops once, unparseable colors reading as `fallback`.
pub fn parse_stops(stops: &[GradientStop], fallback: Color) -> Vec<(f64, Color)> {
    stops
        .iter()
        .map(|stop| (stop.at, Color::parse_or(&stop.color, fallback)))
        .collect()
}

/// Interpolates RGB between the two stops bracketing `at`.
///
/// Stops are expected in ascending `at` order. Queries outside the stop range clamp to the nearest
/// endpoint stop. Unparseable stop colors read as `fallback`.
pub fn interpolate_stops(stops: &[GradientStop], at: f64, fallback: Color) -> Color {
    interpolate_colors(&parse_stops(stops, fallback), at, fallback)
}

/// [`interpolate_stops`] over already parsed stops; `fallback` when there are none.
pub fn interpolate_colors(stops: &[(f64, Color)], at: f64, fallback: Color) -> Color {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return fallback,
    };
    if !at.is_finite() || at <= first.0 {
        return first.1;
    }
    if at >= last.0 {
        return last.1;
    }
    for pair in stops.windows(2) {
        let ((lo_at, lo), (hi_at, hi)) = (pair[0], pair[1]);
        if at >= lo_at && at <= hi_at {
            let span = hi_at - lo_at;
            if span <= f64::EPSILON {
                return hi;
            }
            return lo.mix(hi, (at - lo_at) / span);
        }
    }
    last.1
}

// ============================================================================
// PALETTE
// ============================================================================

/// The eight semantic colors every layer draws with, resolved once per configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub face: String,
    pub needle: String,
    pub ticks: String,
    pub minor_ticks: String,
    pub numbers: String,
    pub label: String,
    pub units: String,
    pub redline: String,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            face: "#f4f1ea".into(),
            needle: "#d32f2f".into(),
            ticks: "#222222".into(),
            minor_ticks: "#555555".into(),
            numbers: "#222222".into(),
            label: "#333333".into(),
            units: "#555555".into(),
            redline: "#d32f2f".into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            face: "#1b1d22".into(),
            needle: "#ff5722".into(),
            ticks: "#e8e8e8".into(),
            minor_ticks: "#9a9a9a".into(),
            numbers: "#f0f0f0".into(),
            label: "#cfcfcf".into(),
            units: "#a0a0a0".into(),
            redline: "#ff3b30".into(),
        }
    }

    pub fn base(style: FaceStyle) -> Self {
        match style {
            FaceStyle::Light => Self::light(),
            FaceStyle::Dark => Self::dark(),
        }
    }

    /// Each key takes the user override when present, else the base palette of the face style.
    pub fn resolve(style: FaceStyle, overrides: &ColorOverrides) -> Self {
        let base = Self::base(style);
        let pick = |user: &Option<String>, default: String| match user {
            Some(color) if !color.trim().is_empty() => color.clone(),
            _ => default,
        };
        Self {
            face: pick(&overrides.face, base.face),
            needle: pick(&overrides.needle, base.needle),
            ticks: pick(&overrides.ticks, base.ticks),
            minor_ticks: pick(&overrides.minor_ticks, base.minor_ticks),
            numbers: pick(&overrides.numbers, base.numbers),
            label: pick(&overrides.label, base.label),
            units: pick(&overrides.units, base.units),
            redline: pick(&overrides.redline, base.redline),
        }
    }

    pub fn from_config(config: &GaugeConfig) -> Self {
        Self::resolve(config.face_style, &config.colors)
    }

    pub fn face_color(&self) -> Color {
        Color::parse_or(&self.face, Color::WHITE)
    }

    pub fn needle_color(&self) -> Color {
        Color::parse_or(&self.needle, Color::new(0xd3, 0x2f, 0x2f))
    }

    pub fn ticks_color(&self) -> Color {
        Color::parse_or(&self.ticks, Color::BLACK)
    }

    pub fn minor_ticks_color(&self) -> Color {
        Color::parse_or(&self.minor_ticks, Color::BLACK)
    }

    pub fn numbers_color(&self) -> Color {
        Color::parse_or(&self.numbers, Color::BLACK)
    }

    pub fn label_color(&self) -> Color {
        Color::parse_or(&self.label, Color::BLACK)
    }

    pub fn units_color(&self) -> Color {
        Color::parse_or(&self.units, Color::BLACK)
    }

    pub fn redline_color(&self) -> Color {
        Color::parse_or(&self.redline, Color::new(0xff, 0x00, 0x00))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_notations() {
        assert_eq!(Color::parse("#ff8000"), Some(Color::new(0xff, 0x80, 0x00)));
        assert_eq!(Color::parse("#f80"), Some(Color::new(0xff, 0x88, 0x00)));
        assert_eq!(Color::parse("rgb(1, 2, 3)"), Some(Color::new(1, 2, 3)));
        assert_eq!(
            Color::parse("rgba(10,20,30,0.5)"),
            Some(Color::rgba(10, 20, 30, 128))
        );
        assert_eq!(Color::parse("chartreuse"), None);
        assert_eq!(Color::parse("#12345"), None);
    }

    #[test]
    fn hex_triplet_is_strict() {
        assert!(Color::parse_hex_triplet("#a1b2c3").is_some());
        assert!(Color::parse_hex_triplet("#abc").is_none());
        assert!(Color::parse_hex_triplet("rgb(1,2,3)").is_none());
        assert!(Color::parse_hex_triplet("#gg0000").is_none());
    }

    #[test]
    fn stops_interpolate_and_clamp() {
        let stops = vec![
            GradientStop::new(0.0, "#000000"),
            GradientStop::new(0.5, "#ff0000"),
            GradientStop::new(1.0, "#ffffff"),
        ];
        assert_eq!(interpolate_stops(&stops, -1.0, Color::BLACK), Color::BLACK);
        assert_eq!(interpolate_stops(&stops, 2.0, Color::BLACK), Color::WHITE);
        assert_eq!(
            interpolate_stops(&stops, 0.25, Color::BLACK),
            Color::new(0x80, 0x00, 0x00)
        );
        assert_eq!(
            interpolate_stops(&stops, 0.75, Color::BLACK),
            Color::new(0xff, 0x80, 0x80)
        );
    }

    #[test]
    fn empty_stops_use_fallback() {
        assert_eq!(interpolate_stops(&[], 0.3, Color::WHITE), Color::WHITE);
    }

    #[test]
    fn overrides_win_per_key_without_mixing_bases() {
        let overrides = ColorOverrides {
            needle: Some("#00ff00".into()),
            ..ColorOverrides::default()
        };
        let palette = Palette::resolve(FaceStyle::Dark, &overrides);
        let dark = Palette::dark();
        assert_eq!(palette.needle, "#00ff00");
        assert_eq!(palette.face, dark.face);
        assert_eq!(palette.ticks, dark.ticks);
        assert_eq!(palette.redline, dark.redline);
    }

    #[test]
    fn lighten_and_darken_move_toward_extremes() {
        let c = Color::new(100, 100, 100);
        assert_eq!(c.lighten(1.0), Color::WHITE);
        assert_eq!(c.darken(1.0), Color::BLACK);
        assert_eq!(c.lighten(0.0), c);
    }
}
