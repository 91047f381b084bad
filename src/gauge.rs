// ============================================================================
// GAUGE
// ============================================================================

use crate::canvas::Canvas;
use crate::color::Palette;
use crate::config::{resolve, ConfigSource, GaugeConfig};
use crate::error::{GaugeError, Result};
use crate::geometry;
use crate::layers::artwork::{build_static_artwork, paint_static_layers, physical_side, StaticArtwork};
use crate::layers::frame::paint_frame_layers;
use crate::layers::{FrameState, Layout, Scene};
use crate::motion::{MotionSimulator, Physics};
use crate::sweep::{Sweep, SweepEvent, SweepState};
use crate::text::Typeface;

/// Geometry and artwork for one size, density and configuration revision.
struct Cache {
    size: f64,
    density: f64,
    revision: u64,
    layout: Layout,
    /// `None` when the offscreen surface could not be allocated
    artwork: Option<StaticArtwork>,
}

/// One independent gauge: configuration, palette, needle motion, sweep sequencing and the
/// static artwork cache. Nothing is shared between instances.
pub struct Gauge {
    config: GaugeConfig,
    palette: Palette,
    typeface: Option<Typeface>,
    motion: MotionSimulator,
    sweep: Sweep,
    value: f64,
    angle: f64,
    ring_values: Vec<f64>,
    complication_values: Vec<f64>,
    revision: u64,
    cache: Option<Cache>,
    rebuilds: u64,
    on_sweep_complete: Option<Box<dyn FnMut() + Send>>,
}

impl Gauge {
    pub fn new(source: impl Into<ConfigSource>) -> Self {
        let config = resolve(source);
        let value = config.initial_value();
        let angle = geometry::value_to_angle(&config, value);
        let motion = MotionSimulator::new(angle, Physics::from_config(&config))
            .with_reduced_motion(config.reduced_motion)
            .with_jitter(config.needle_jitter);
        Self {
            palette: Palette::from_config(&config),
            typeface: builtin_typeface(),
            motion,
            sweep: Sweep::default(),
            value,
            angle,
            ring_values: config.rings.iter().map(|r| r.value).collect(),
            complication_values: config.complications.iter().map(|c| c.value).collect(),
            revision: 0,
            cache: None,
            rebuilds: 0,
            on_sweep_complete: None,
            config,
        }
    }

    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.set_typeface(Some(typeface));
        self
    }

    /// Replaces the configuration. The needle keeps its position and animates to the value's
    /// angle under the new mapping; the static artwork is rebuilt on the next draw.
    pub fn configure(&mut self, source: impl Into<ConfigSource>) {
        let config = resolve(source);
        if let Some(value) = config.value {
            self.value = value;
        }
        self.palette = Palette::from_config(&config);
        self.motion.set_physics(Physics::from_config(&config));
        self.motion.set_jitter(config.needle_jitter);
        self.motion.set_reduced_motion(config.reduced_motion);
        self.ring_values = config.rings.iter().map(|r| r.value).collect();
        self.complication_values = config.complications.iter().map(|c| c.value).collect();
        self.config = config;
        self.invalidate();
        if !self.sweep.is_active() {
            self.motion.set_target(self.value_to_angle(self.value), false);
        }
    }

    /// Replaces the bundled font. `None` turns every text layer off.
    pub fn set_typeface(&mut self, typeface: Option<Typeface>) {
        self.typeface = typeface;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.revision += 1;
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Last value requested for the needle (remembered even while sweeping).
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Angle returned by the last [`Gauge::advance`].
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn target_angle(&self) -> f64 {
        self.motion.target()
    }

    pub fn sweep_state(&self) -> SweepState {
        self.sweep.state()
    }

    /// Configuration revision; bumps whenever the static artwork must be redrawn.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// How many times the static artwork has been rendered.
    pub fn artwork_rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn value_to_angle(&self, value: f64) -> f64 {
        geometry::value_to_angle(&self.config, value)
    }

    // ------------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------------

    /// Points the needle at `value`. During a sweep the value is only remembered.
    pub fn set_value(&mut self, value: f64, immediate: bool) {
        if !value.is_finite() {
            log::debug!("ignoring non-finite gauge value");
            return;
        }
        self.value = value;
        if !self.sweep.is_active() {
            self.motion.set_target(self.value_to_angle(value), immediate);
            if immediate {
                self.angle = self.motion.angle();
            }
        }
    }

    pub fn ring_value(&self, index: usize) -> Option<f64> {
        self.ring_values.get(index).copied()
    }

    /// Updates a secondary ring; false when there is no such ring or the value is not finite.
    pub fn set_ring_value(&mut self, index: usize, value: f64) -> bool {
        set_live(&mut self.ring_values, index, value)
    }

    pub fn complication_value(&self, index: usize) -> Option<f64> {
        self.complication_values.get(index).copied()
    }

    pub fn set_complication_value(&mut self, index: usize, value: f64) -> bool {
        set_live(&mut self.complication_values, index, value)
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.config.reduced_motion = reduced;
        self.motion.set_reduced_motion(reduced);
        self.angle = self.motion.angle();
    }

    // ------------------------------------------------------------------------
    // Motion
    // ------------------------------------------------------------------------

    /// Starts the self-test sweep: up to `max`, down to `min`, back to the current value.
    pub fn sweep(&mut self) {
        let max_angle = self.value_to_angle(self.config.max);
        self.sweep.start(&mut self.motion, max_angle);
    }

    /// Called once when a sweep returns to idle.
    pub fn on_sweep_complete(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_sweep_complete = Some(Box::new(callback));
    }

    /// Steps physics and sweep sequencing to `timestamp_ms` and returns the angle to draw.
    pub fn advance(&mut self, timestamp_ms: f64) -> f64 {
        self.motion
            .set_deflection(geometry::sweep_fraction(&self.config, self.motion.target()));
        self.angle = self.motion.advance(timestamp_ms);
        let min_angle = self.value_to_angle(self.config.min);
        let real_angle = self.value_to_angle(self.value);
        if let Some(SweepEvent::Completed) =
            self.sweep.update(timestamp_ms, &mut self.motion, min_angle, real_angle)
        {
            if let Some(callback) = self.on_sweep_complete.as_mut() {
                callback();
            }
        }
        self.angle
    }

    pub fn is_settled(&self, threshold: f64) -> bool {
        self.motion.is_settled(threshold)
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Advances to `timestamp_ms` and paints one frame. Returns the drawn angle.
    ///
    /// `frame` is RGBA8 of side `round(size * density)` pixels; `size` is in logical pixels.
    pub fn render(&mut self, frame: &mut [u8], size: f64, density: f64, timestamp_ms: f64) -> Result<f64> {
        let angle = self.advance(timestamp_ms);
        self.draw(frame, size, density, timestamp_ms)?;
        Ok(angle)
    }

    /// Paints the cached static artwork and the per-frame layers at the current angle.
    pub fn draw(&mut self, frame: &mut [u8], size: f64, density: f64, time_ms: f64) -> Result<()> {
        let density = if density.is_finite() && density > 0.0 { density } else { 1.0 };
        if !(size.is_finite() && size > 0.0) {
            return Err(GaugeError::EmptySurface);
        }
        let side = physical_side(size, density);
        let mut canvas = Canvas::new(frame, side, side, density)?;

        self.refresh_cache(size, density);
        let Some(cache) = &self.cache else {
            return Ok(());
        };
        let scene = Scene {
            config: &self.config,
            palette: &self.palette,
            typeface: self.typeface.as_ref(),
            layout: &cache.layout,
        };
        match &cache.artwork {
            Some(artwork) if canvas.blit(artwork.pixels()) => {}
            _ => paint_static_layers(&mut canvas, &scene),
        }
        let state = FrameState {
            angle: self.angle,
            value: self.value,
            time_ms,
            rings: &self.ring_values,
            complications: &self.complication_values,
        };
        paint_frame_layers(&mut canvas, &scene, &state);
        Ok(())
    }

    fn refresh_cache(&mut self, size: f64, density: f64) {
        let current = self.cache.as_ref().is_some_and(|c| {
            c.size == size && c.density == density && c.revision == self.revision
        });
        if current {
            return;
        }
        let layout = Layout::new(size, &self.config, &self.palette, self.typeface.as_ref());
        let artwork = match build_static_artwork(
            size,
            density,
            self.revision,
            &self.config,
            &self.palette,
            self.typeface.as_ref(),
            &layout,
        ) {
            Ok(artwork) => {
                self.rebuilds += 1;
                Some(artwork)
            }
            Err(err) => {
                log::warn!("static artwork unavailable ({err}), drawing static layers every frame");
                None
            }
        };
        self.cache = Some(Cache {
            size,
            density,
            revision: self.revision,
            layout,
            artwork,
        });
    }
}

fn builtin_typeface() -> Option<Typeface> {
    match Typeface::builtin() {
        Ok(face) => Some(face),
        Err(err) => {
            log::warn!("{err}, text layers disabled");
            None
        }
    }
}

fn set_live(values: &mut [f64], index: usize, value: f64) -> bool {
    match values.get_mut(index) {
        Some(slot) if value.is_finite() => {
            *slot = value;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn starts_at_initial_value() {
        let gauge = Gauge::new(json!({ "min": 0.0, "max": 10.0, "value": 4.0 }));
        assert_eq!(gauge.value(), 4.0);
        assert_eq!(gauge.angle(), gauge.value_to_angle(4.0));
    }

    #[test]
    fn immediate_set_value_is_idempotent() {
        let mut gauge = Gauge::new("speed");
        gauge.set_value(70.0, true);
        let expected = (-225.0f64 + 0.5 * 270.0 - 90.0).to_radians();
        for _ in 0..4 {
            assert_relative_eq!(gauge.advance(1000.0), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let mut gauge = Gauge::new("rpm");
        gauge.set_value(3.0, true);
        gauge.set_value(f64::NAN, true);
        assert_eq!(gauge.value(), 3.0);
    }

    #[test]
    fn configure_bumps_revision_and_keeps_value() {
        let mut gauge = Gauge::new("speed");
        gauge.set_value(50.0, true);
        let before = gauge.revision();
        gauge.configure(json!({ "preset": "speed", "max": 200.0 }));
        assert!(gauge.revision() > before);
        assert_eq!(gauge.value(), 50.0);
        assert_eq!(gauge.target_angle(), gauge.value_to_angle(50.0));
    }

    #[test]
    fn live_values_reject_bad_input() {
        let mut gauge = Gauge::new(json!({ "rings": [{ "value": 10.0 }] }));
        assert!(gauge.set_ring_value(0, 20.0));
        assert!(!gauge.set_ring_value(0, f64::INFINITY));
        assert!(!gauge.set_ring_value(3, 1.0));
        assert_eq!(gauge.ring_value(0), Some(20.0));
        assert!(!gauge.set_complication_value(0, 1.0));
    }

    #[test]
    fn needle_at_rest_on_scale_start_does_not_vibrate() {
        let mut gauge = Gauge::new(json!({ "preset": "speed", "needleJitter": 0.2, "value": 0.0 }));
        let rest = gauge.value_to_angle(0.0);
        for i in 0..10 {
            assert_eq!(gauge.advance(i as f64 * 16.0), rest);
        }
        gauge.set_value(140.0, true);
        let full = gauge.value_to_angle(140.0);
        for i in 10..20 {
            assert!((gauge.advance(i as f64 * 16.0) - full).abs() <= 0.2 + 1e-12);
        }
    }

    #[test]
    fn draw_rejects_wrong_frame_size() {
        let mut gauge = Gauge::new("speed");
        let mut frame = vec![0u8; 16];
        assert!(matches!(
            gauge.draw(&mut frame, 100.0, 1.0, 0.0),
            Err(GaugeError::Surface { .. })
        ));
    }
}
