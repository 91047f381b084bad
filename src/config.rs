use std::path::Path;

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::color::GradientStop;

pub use complication::{
    ArcLabel, Complication, ComplicationFill, ComplicationMarker, ComplicationPointer,
    ComplicationTicks,
};

/// Face tint and base palette selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceStyle {
    #[default]
    Light,
    Dark,
}

/// User color overrides, one optional entry per palette key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorOverrides {
    pub face: Option<String>,
    pub needle: Option<String>,
    pub ticks: Option<String>,
    pub minor_ticks: Option<String>,
    pub numbers: Option<String>,
    pub label: Option<String>,
    pub units: Option<String>,
    pub redline: Option<String>,
}

/// A colored band over a value sub-range.
///
/// `offset` is measured inward from the tick ring and `width` is the band thickness, both as
/// fractions of the dial radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub start: f64,
    pub end: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl Zone {
    pub fn new(start: f64, end: f64, color: impl Into<String>) -> Self {
        Self {
            start,
            end,
            color: color.into(),
            offset: None,
            width: None,
        }
    }
}

/// Free text placed at normalized surface coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextItem {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Fraction of the dial radius
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Family hint; only the loaded typeface is ever used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// Configuration for the digital readout display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DigitalDisplay {
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub color: Option<String>,
    /// When set, the readout sits on a rounded plate of this color.
    pub background: Option<String>,
    pub show_units: bool,
    pub decimals: u32,
}

impl Default for DigitalDisplay {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.72,
            font_size: 0.16,
            color: None,
            background: Some("rgba(0,0,0,0.55)".into()),
            show_units: true,
            decimals: 0,
        }
    }
}

/// Decorative ring around the hub; replaces the center cap and shortens the needle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InnerRing {
    pub radius: f64,
    pub width: f64,
    pub color: Option<String>,
}

impl Default for InnerRing {
    fn default() -> Self {
        Self {
            radius: 0.22,
            width: 0.03,
            color: None,
        }
    }
}

/// Dense ring of tiny ticks just inside the major tick ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MicroTicks {
    pub count: u32,
    pub length: f64,
    pub width: f64,
    pub color: Option<String>,
}

impl Default for MicroTicks {
    fn default() -> Self {
        Self {
            count: 100,
            length: 0.025,
            width: 0.6,
            color: None,
        }
    }
}

/// Ticks up to the needle light up in this color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveTicks {
    pub color: String,
}

impl Default for ActiveTicks {
    fn default() -> Self {
        Self {
            color: "#ffb300".into(),
        }
    }
}

/// Arc filled from the start angle to the needle with a gradient along the arc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressArc {
    pub radius: f64,
    pub width: f64,
    pub stops: Vec<GradientStop>,
    /// Flat color used when no stops are given.
    pub color: Option<String>,
    pub track: Option<String>,
}

impl Default for ProgressArc {
    fn default() -> Self {
        Self {
            radius: 0.97,
            width: 0.035,
            stops: vec![
                GradientStop::new(0.0, "#2e7d32"),
                GradientStop::new(0.6, "#fbc02d"),
                GradientStop::new(1.0, "#d32f2f"),
            ],
            color: None,
            track: Some("rgba(128,128,128,0.25)".into()),
        }
    }
}

/// Secondary value ring drawn concentric with the dial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ring {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub radius: f64,
    pub width: f64,
    pub color: String,
    pub track: Option<String>,
    /// Splits the fill into this many cells when set.
    pub segments: Option<u32>,
    pub gap_degrees: f64,
    pub flash_threshold: Option<f64>,
    pub flash_color: Option<String>,
    pub flash_hz: f64,
    pub start_angle: Option<f64>,
    pub end_angle: Option<f64>,
}

impl Default for Ring {
    fn default() -> Self {
        Self {
            value: 0.0,
            min: 0.0,
            max: 100.0,
            radius: 0.55,
            width: 0.05,
            color: "#29b6f6".into(),
            track: Some("rgba(128,128,128,0.2)".into()),
            segments: None,
            gap_degrees: 2.0,
            flash_threshold: None,
            flash_color: None,
            flash_hz: 2.0,
            start_angle: None,
            end_angle: None,
        }
    }
}

/// Sub-gauge (complication) configuration module
pub mod complication {
    use serde::{Deserialize, Serialize};

    use super::Zone;

    /// Glowing bar filled from the start of the sub-dial to its value
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ComplicationFill {
        pub color: String,
        pub width: f64,
        pub glow: bool,
    }

    impl Default for ComplicationFill {
        fn default() -> Self {
            Self {
                color: "#4fc3f7".into(),
                width: 0.14,
                glow: true,
            }
        }
    }

    /// Radial pointer from the sub-dial center
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ComplicationPointer {
        pub color: String,
        pub width: f64,
    }

    impl Default for ComplicationPointer {
        fn default() -> Self {
            Self {
                color: "#ff7043".into(),
                width: 1.5,
            }
        }
    }

    /// Fixed reference line across the arc at `value`
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ComplicationMarker {
        pub value: f64,
        #[serde(default = "marker_color")]
        pub color: String,
    }

    fn marker_color() -> String {
        "#ffffff".into()
    }

    /// Tick marks around the sub-dial
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ComplicationTicks {
        pub count: u32,
        pub color: Option<String>,
    }

    impl Default for ComplicationTicks {
        fn default() -> Self {
            Self {
                count: 5,
                color: None,
            }
        }
    }

    /// Text laid along the sub-dial arc, centered on the angle of `at`
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ArcLabel {
        pub text: String,
        pub at: f64,
    }

    /// Small independently configured arc dial inside the main face.
    ///
    /// `x`/`y` are normalized surface coordinates of its center, `radius` a fraction of the main
    /// dial radius. Angles follow the main dial convention and may sweep either way.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct Complication {
        pub x: f64,
        pub y: f64,
        pub radius: f64,
        pub min: f64,
        pub max: f64,
        pub value: f64,
        pub start_angle: f64,
        pub end_angle: f64,
        pub label: Option<String>,
        pub units: Option<String>,
        pub track: Option<String>,
        pub zones: Vec<Zone>,
        pub fill: Option<ComplicationFill>,
        pub pointer: Option<ComplicationPointer>,
        pub marker: Option<ComplicationMarker>,
        pub ticks: Option<ComplicationTicks>,
        pub labels: Vec<ArcLabel>,
    }

    impl Default for Complication {
        fn default() -> Self {
            Self {
                x: 0.5,
                y: 0.7,
                radius: 0.22,
                min: 0.0,
                max: 100.0,
                value: 0.0,
                start_angle: -120.0,
                end_angle: 120.0,
                label: None,
                units: None,
                track: Some("rgba(128,128,128,0.35)".into()),
                zones: Vec::new(),
                fill: Some(ComplicationFill::default()),
                pointer: None,
                marker: None,
                ticks: Some(ComplicationTicks::default()),
                labels: Vec::new(),
            }
        }
    }
}

// ============================================================================
// GAUGE CONFIGURATION
// ============================================================================

/// Everything a gauge needs to draw and animate, immutable between rebuilds.
///
/// Angles are in degrees clockwise from 12 o'clock. Keys serialize in camelCase.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GaugeConfig {
    #[builder(default = 0.0)]
    pub min: f64,
    #[builder(default = 100.0)]
    pub max: f64,
    /// Initial value, `min` when absent.
    pub value: Option<f64>,
    #[builder(default, into)]
    pub units: String,
    #[builder(default, into)]
    pub label: String,

    // Ticks
    #[builder(default = 11)]
    pub major_ticks: u32,
    #[builder(default = 4)]
    pub minor_ticks: u32,
    #[builder(default)]
    pub custom_labels: Vec<String>,

    // Sweep
    #[builder(default = -135.0)]
    pub start_angle: f64,
    #[builder(default = 135.0)]
    pub end_angle: f64,

    // Physics
    #[builder(default = 180.0)]
    pub stiffness: f64,
    #[builder(default = 22.0)]
    pub damping: f64,
    #[builder(default = 12.0)]
    pub max_velocity: f64,
    #[builder(default = 400.0)]
    pub max_accel: f64,
    #[builder(default = 0.0)]
    pub needle_jitter: f64,
    #[builder(default = false)]
    pub reduced_motion: bool,

    // Look
    #[builder(default)]
    pub face_style: FaceStyle,
    #[builder(default)]
    pub colors: ColorOverrides,
    #[builder(default = "#ffffff".to_string(), into)]
    pub background: String,
    #[builder(default)]
    pub zones: Vec<Zone>,
    #[builder(default)]
    pub texts: Vec<TextItem>,
    pub redline_start: Option<f64>,
    pub danger_start: Option<f64>,

    // Optional layers
    #[builder(default = false)]
    pub show_odometer: bool,
    #[builder(default = false)]
    pub show_digital_value: bool,
    pub digital_display: Option<DigitalDisplay>,
    #[builder(default = false)]
    pub needle_glow: bool,
    pub inner_ring: Option<InnerRing>,
    pub micro_ticks: Option<MicroTicks>,
    pub active_ticks: Option<ActiveTicks>,
    pub progress_arc: Option<ProgressArc>,
    #[builder(default)]
    pub rings: Vec<Ring>,
    #[builder(default)]
    pub complications: Vec<Complication>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    /// Initial needle value, clamped into range.
    pub fn initial_value(&self) -> f64 {
        let value = self.value.filter(|v| v.is_finite()).unwrap_or(self.min);
        if self.max > self.min {
            value.clamp(self.min, self.max)
        } else {
            value
        }
    }

    /// True when `value` reaches either legacy danger threshold.
    pub fn is_danger(&self, value: f64) -> bool {
        let reaches = |threshold: Option<f64>| threshold.is_some_and(|t| value >= t);
        reaches(self.redline_start) || reaches(self.danger_start)
    }

    /// Replaces non-finite or out-of-domain numbers with defaults so nothing downstream has to.
    pub fn sanitize(mut self) -> Self {
        let defaults = GaugeConfig::default();
        let finite_or = |v: f64, d: f64| if v.is_finite() { v } else { d };
        let positive_or = |v: f64, d: f64| if v.is_finite() && v > 0.0 { v } else { d };

        self.min = finite_or(self.min, defaults.min);
        self.max = finite_or(self.max, defaults.max);
        self.start_angle = finite_or(self.start_angle, defaults.start_angle);
        self.end_angle = finite_or(self.end_angle, defaults.end_angle);
        self.stiffness = if self.stiffness.is_finite() && self.stiffness >= 0.0 {
            self.stiffness
        } else {
            defaults.stiffness
        };
        self.damping = if self.damping.is_finite() && self.damping >= 0.0 {
            self.damping
        } else {
            defaults.damping
        };
        self.max_velocity = positive_or(self.max_velocity, defaults.max_velocity);
        self.max_accel = positive_or(self.max_accel, defaults.max_accel);
        self.needle_jitter = if self.needle_jitter.is_finite() {
            self.needle_jitter.max(0.0)
        } else {
            0.0
        };
        self.value = self.value.filter(|v| v.is_finite());
        self.redline_start = self.redline_start.filter(|v| v.is_finite());
        self.danger_start = self.danger_start.filter(|v| v.is_finite());
        self.zones.retain(|z| z.start.is_finite() && z.end.is_finite());

        self.major_ticks = self.major_ticks.min(MAX_MAJOR_TICKS);
        self.minor_ticks = self.minor_ticks.min(MAX_MINOR_TICKS);
        if let Some(micro) = self.micro_ticks.as_mut() {
            micro.count = micro.count.min(MAX_ARC_DIVISIONS);
        }
        for ring in &mut self.rings {
            ring.segments = ring.segments.map(|n| n.min(MAX_ARC_DIVISIONS));
        }
        for complication in &mut self.complications {
            if let Some(ticks) = complication.ticks.as_mut() {
                ticks.count = ticks.count.min(MAX_MAJOR_TICKS);
            }
        }
        self
    }
}

/// Upper bound for `majorTicks` and complication tick counts.
pub const MAX_MAJOR_TICKS: u32 = 100;

/// Upper bound for `minorTicks` between two majors.
pub const MAX_MINOR_TICKS: u32 = 20;

/// Upper bound for micro-tick counts and ring segments.
pub const MAX_ARC_DIVISIONS: u32 = 720;

// ============================================================================
// PRESETS & RESOLUTION
// ============================================================================

pub const PRESET_NAMES: [&str; 7] = ["speed", "rpm", "volt", "fuel", "temp", "boost", "oil"];

/// Partial configuration for a named preset.
pub fn preset(name: &str) -> Option<Value> {
    let value = match name {
        "speed" => json!({
            "min": 0.0, "max": 140.0, "startAngle": -225.0, "endAngle": 45.0,
            "majorTicks": 8, "minorTicks": 3, "label": "SPEED", "units": "km/h"
        }),
        "rpm" => json!({
            "min": 0.0, "max": 8.0, "startAngle": -135.0, "endAngle": 135.0,
            "majorTicks": 9, "minorTicks": 4, "label": "RPM", "units": "x1000",
            "redlineStart": 6.5
        }),
        "volt" => json!({
            "min": 8.0, "max": 16.0, "startAngle": -60.0, "endAngle": 60.0,
            "majorTicks": 5, "minorTicks": 1, "label": "VOLTS", "units": "V",
            "zones": [
                { "start": 8.0, "end": 11.5, "color": "#d32f2f" },
                { "start": 14.8, "end": 16.0, "color": "#fbc02d" }
            ]
        }),
        "fuel" => json!({
            "min": 0.0, "max": 1.0, "startAngle": -60.0, "endAngle": 60.0,
            "majorTicks": 3, "minorTicks": 1, "label": "FUEL",
            "customLabels": ["E", "1/2", "F"],
            "zones": [{ "start": 0.0, "end": 0.125, "color": "#d32f2f" }]
        }),
        "temp" => json!({
            "min": 40.0, "max": 130.0, "startAngle": -60.0, "endAngle": 60.0,
            "majorTicks": 4, "minorTicks": 2, "label": "TEMP", "units": "°C",
            "dangerStart": 110.0
        }),
        "boost" => json!({
            "min": -1.0, "max": 2.0, "startAngle": -135.0, "endAngle": 135.0,
            "majorTicks": 7, "minorTicks": 4, "label": "BOOST", "units": "bar",
            "faceStyle": "dark", "redlineStart": 1.6
        }),
        "oil" => json!({
            "min": 0.0, "max": 7.0, "startAngle": -100.0, "endAngle": 100.0,
            "majorTicks": 8, "minorTicks": 1, "label": "OIL", "units": "bar",
            "zones": [{ "start": 0.0, "end": 1.0, "color": "#d32f2f" }]
        }),
        _ => return None,
    };
    Some(value)
}

/// Where a configuration comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Preset(String),
    /// A partial JSON object; a `"preset"` key layers it over that preset.
    Overrides(Value),
    Config(GaugeConfig),
}

impl From<&str> for ConfigSource {
    fn from(name: &str) -> Self {
        ConfigSource::Preset(name.to_string())
    }
}

impl From<Value> for ConfigSource {
    fn from(value: Value) -> Self {
        ConfigSource::Overrides(value)
    }
}

impl From<GaugeConfig> for ConfigSource {
    fn from(config: GaugeConfig) -> Self {
        ConfigSource::Config(config)
    }
}

/// Merges a preset or overrides over the defaults. Never fails: unknown presets and malformed
/// overrides fall back with a warning.
pub fn resolve(source: impl Into<ConfigSource>) -> GaugeConfig {
    match source.into() {
        ConfigSource::Config(config) => config.sanitize(),
        ConfigSource::Preset(name) => resolve_layers(Some(&name), None),
        ConfigSource::Overrides(overrides) => {
            let name = overrides
                .get("preset")
                .and_then(Value::as_str)
                .map(str::to_string);
            resolve_layers(name.as_deref(), Some(&overrides))
        }
    }
}

fn resolve_layers(preset_name: Option<&str>, overrides: Option<&Value>) -> GaugeConfig {
    let mut base = match serde_json::to_value(GaugeConfig::default()) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("default configuration failed to serialize: {err}");
            return GaugeConfig::default();
        }
    };

    if let Some(name) = preset_name {
        match preset(name) {
            Some(layer) => merge(&mut base, &layer),
            None => log::warn!("unknown gauge preset {name:?}, using defaults"),
        }
    }
    let preset_only = base.clone();

    if let Some(layer) = overrides {
        if layer.is_object() {
            merge(&mut base, layer);
        } else {
            log::warn!("gauge overrides must be a JSON object, ignoring");
        }
    }

    match serde_json::from_value::<GaugeConfig>(base) {
        Ok(config) => config.sanitize(),
        Err(err) => {
            log::warn!("invalid gauge overrides ({err}), keeping preset/defaults");
            serde_json::from_value::<GaugeConfig>(preset_only)
                .map(GaugeConfig::sanitize)
                .unwrap_or_default()
        }
    }
}

/// Reads a JSON overrides file for [`resolve`].
pub fn read_overrides(path: impl AsRef<Path>) -> crate::error::Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Shallow merge, except `colors` which merges per key.
fn merge(base: &mut Value, overlay: &Value) {
    let (Some(base), Some(overlay)) = (base.as_object_mut(), overlay.as_object()) else {
        return;
    };
    for (key, value) in overlay {
        if key == "preset" {
            continue;
        }
        if key == "colors" {
            if let (Some(Value::Object(existing)), Some(colors)) =
                (base.get_mut(key), value.as_object())
            {
                for (k, v) in colors {
                    existing.insert(k.clone(), v.clone());
                }
                continue;
            }
        }
        base.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_preset_matches_published_range() {
        let config = resolve("speed");
        assert_eq!(config.min, 0.0);
        assert_eq!(config.max, 140.0);
        assert_eq!(config.start_angle, -225.0);
        assert_eq!(config.end_angle, 45.0);
    }

    #[test]
    fn every_preset_deserializes() {
        for name in PRESET_NAMES {
            let config = resolve(name);
            assert!(config.max > config.min, "{name}");
        }
    }

    #[test]
    fn unknown_preset_falls_back_to_defaults() {
        assert_eq!(resolve("warp-drive"), GaugeConfig::default());
    }

    #[test]
    fn overrides_layer_over_named_preset() {
        let config = resolve(json!({ "preset": "rpm", "max": 9.0, "label": "TACHO" }));
        assert_eq!(config.max, 9.0);
        assert_eq!(config.label, "TACHO");
        assert_eq!(config.redline_start, Some(6.5));
        assert_eq!(config.units, "x1000");
    }

    #[test]
    fn colors_merge_per_key() {
        let config = resolve(json!({ "colors": { "needle": "#00ff00" } }));
        assert_eq!(config.colors.needle.as_deref(), Some("#00ff00"));
        assert_eq!(config.colors.face, None);
    }

    #[test]
    fn malformed_overrides_keep_preset() {
        let config = resolve(json!({ "preset": "speed", "max": "fast" }));
        assert_eq!(config.max, 140.0);
    }

    #[test]
    fn camel_case_keys_deserialize() {
        let config = resolve(json!({
            "majorTicks": 6,
            "faceStyle": "dark",
            "showDigitalValue": true,
            "digitalDisplay": { "fontSize": 0.2 },
            "activeTicks": { "color": "#ff0000" },
            "zones": [{ "start": 10.0, "end": 20.0, "color": "#ff0", "width": 0.1 }],
            "texts": [{ "text": "ECO", "x": 0.5, "y": 0.3, "fontSize": 0.1 }],
            "rings": [{ "value": 40.0, "segments": 10, "flashThreshold": 80.0 }],
            "complications": [{ "x": 0.3, "y": 0.6, "marker": { "value": 50.0 } }]
        }));
        assert_eq!(config.major_ticks, 6);
        assert_eq!(config.face_style, FaceStyle::Dark);
        assert!(config.show_digital_value);
        assert_eq!(config.digital_display.as_ref().map(|d| d.font_size), Some(0.2));
        assert_eq!(config.zones[0].width, Some(0.1));
        assert_eq!(config.texts[0].font_size, Some(0.1));
        assert_eq!(config.rings[0].segments, Some(10));
        assert_eq!(config.complications[0].marker.as_ref().map(|m| m.value), Some(50.0));
        assert_eq!(config.complications[0].marker.as_ref().map(|m| m.color.as_str()), Some("#ffffff"));
    }

    #[test]
    fn sanitize_replaces_non_finite_physics() {
        let config = GaugeConfig::builder()
            .stiffness(f64::NAN)
            .max_velocity(-1.0)
            .min(f64::INFINITY)
            .build()
            .sanitize();
        let defaults = GaugeConfig::default();
        assert_eq!(config.stiffness, defaults.stiffness);
        assert_eq!(config.max_velocity, defaults.max_velocity);
        assert_eq!(config.min, defaults.min);
    }

    #[test]
    fn sanitize_bounds_counts() {
        let config = resolve(json!({
            "majorTicks": u32::MAX,
            "minorTicks": u32::MAX,
            "microTicks": { "count": u32::MAX },
            "rings": [{ "segments": u32::MAX }],
            "complications": [{ "ticks": { "count": u32::MAX } }]
        }));
        assert_eq!(config.major_ticks, MAX_MAJOR_TICKS);
        assert_eq!(config.minor_ticks, MAX_MINOR_TICKS);
        assert_eq!(config.micro_ticks.as_ref().map(|m| m.count), Some(MAX_ARC_DIVISIONS));
        assert_eq!(config.rings[0].segments, Some(MAX_ARC_DIVISIONS));
        assert_eq!(
            config.complications[0].ticks.as_ref().map(|t| t.count),
            Some(MAX_MAJOR_TICKS)
        );
    }

    #[test]
    fn unreadable_overrides_file_is_an_error() {
        assert!(matches!(
            read_overrides("/nonexistent/gauge.json"),
            Err(crate::error::GaugeError::Io(_))
        ));
    }

    #[test]
    fn legacy_thresholds_both_color_danger() {
        let config = GaugeConfig::builder()
            .redline_start(80.0)
            .danger_start(60.0)
            .build();
        assert!(!config.is_danger(59.0));
        assert!(config.is_danger(60.0));
        assert!(config.is_danger(85.0));
    }
}
