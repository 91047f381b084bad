//! Spring-damper needle motion on a fixed timestep.

use rand::Rng;

use crate::config::GaugeConfig;

/// Physics step, independent of the display refresh rate.
pub const FIXED_STEP: f64 = 1.0 / 120.0;

/// Longest wall-clock gap consumed by one `advance` call, in seconds.
pub const MAX_FRAME_GAP: f64 = 0.1;

/// Default tolerance for [`MotionSimulator::is_settled`], in radians.
pub const SETTLE_THRESHOLD: f64 = 0.001;

/// Absorbs float drift when banked time lands a hair under a whole step.
const STEP_EPSILON: f64 = 1e-9;

/// Spring-damper tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub stiffness: f64,
    pub damping: f64,
    pub max_velocity: f64,
    pub max_accel: f64,
}

impl Physics {
    pub fn from_config(config: &GaugeConfig) -> Self {
        Self {
            stiffness: config.stiffness,
            damping: config.damping,
            max_velocity: config.max_velocity,
            max_accel: config.max_accel,
        }
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::from_config(&GaugeConfig::default())
    }
}

/// One angular degree of freedom driven toward a target.
///
/// All angles are radians. Non-finite inputs are rejected before they reach the state.
#[derive(Debug, Clone)]
pub struct MotionSimulator {
    angle: f64,
    velocity: f64,
    target: f64,
    accumulator: f64,
    last_timestamp: Option<f64>,
    physics: Physics,
    reduced_motion: bool,
    jitter: f64,
    /// How far along its sweep the target sits, `[0, 1]`; scales the jitter
    deflection: f64,
}

impl MotionSimulator {
    /// A simulator at rest on `angle`.
    pub fn new(angle: f64, physics: Physics) -> Self {
        let angle = if angle.is_finite() { angle } else { 0.0 };
        Self {
            angle,
            velocity: 0.0,
            target: angle,
            accumulator: 0.0,
            last_timestamp: None,
            physics,
            reduced_motion: false,
            jitter: 0.0,
            deflection: 0.0,
        }
    }

    /// Snap instead of animate on every retarget.
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Vibration amplitude in radians added to the returned angle at full deflection.
    pub fn with_jitter(mut self, amplitude: f64) -> Self {
        self.set_jitter(amplitude);
        self
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        if reduced {
            self.snap();
        }
    }

    pub fn set_physics(&mut self, physics: Physics) {
        self.physics = physics;
    }

    pub fn set_jitter(&mut self, amplitude: f64) {
        self.jitter = if amplitude.is_finite() { amplitude.max(0.0) } else { 0.0 };
    }

    /// Fraction of the sweep the target has progressed through. A needle resting at the
    /// start of its scale does not vibrate.
    pub fn set_deflection(&mut self, fraction: f64) {
        self.deflection = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Sets the desired angle. `immediate` (or reduced motion) skips the physics entirely.
    pub fn set_target(&mut self, angle: f64, immediate: bool) {
        if !angle.is_finite() {
            log::debug!("ignoring non-finite needle target");
            return;
        }
        self.target = angle;
        if immediate || self.reduced_motion {
            self.snap();
        }
    }

    fn snap(&mut self) {
        self.angle = self.target;
        self.velocity = 0.0;
        self.accumulator = 0.0;
    }

    /// Advances to `timestamp_ms` and returns the angle to render.
    ///
    /// The first call only records the clock. Gaps are capped at [`MAX_FRAME_GAP`] and spent in
    /// whole [`FIXED_STEP`]s; the remainder carries over to the next call.
    pub fn advance(&mut self, timestamp_ms: f64) -> f64 {
        if !timestamp_ms.is_finite() {
            return self.render_angle();
        }
        let Some(last) = self.last_timestamp.replace(timestamp_ms) else {
            return self.angle;
        };

        let mut elapsed = (timestamp_ms - last) / 1000.0;
        if !elapsed.is_finite() || elapsed < 0.0 {
            elapsed = 0.0;
        }
        self.accumulator += elapsed.min(MAX_FRAME_GAP);

        let mut steps = 0u32;
        while self.accumulator + STEP_EPSILON >= FIXED_STEP {
            self.step(FIXED_STEP);
            self.accumulator -= FIXED_STEP;
            steps += 1;
        }
        self.accumulator = self.accumulator.max(0.0);
        log::trace!("motion advanced {steps} steps, angle {:.4}", self.angle);

        self.render_angle()
    }

    /// One semi-implicit Euler step: velocity first, then position from the new velocity.
    fn step(&mut self, dt: f64) {
        let p = &self.physics;
        let accel = (p.stiffness * (self.target - self.angle) - p.damping * self.velocity)
            .clamp(-p.max_accel, p.max_accel);
        let velocity =
            (self.velocity + accel * dt).clamp(-p.max_velocity, p.max_velocity);
        let angle = self.angle + velocity * dt;

        if velocity.is_finite() && angle.is_finite() {
            self.velocity = velocity;
            self.angle = angle;
        } else {
            self.velocity = 0.0;
        }
    }

    fn render_angle(&self) -> f64 {
        let amplitude = self.jitter * self.deflection;
        if amplitude <= 0.0 {
            return self.angle;
        }
        let noise: f64 = rand::rng().random_range(-1.0..=1.0);
        self.angle + noise * amplitude
    }

    /// Angle error and speed both under `threshold`. Non-finite state counts as settled.
    pub fn is_settled(&self, threshold: f64) -> bool {
        let error = (self.target - self.angle).abs();
        let speed = self.velocity.abs();
        if !error.is_finite() || !speed.is_finite() {
            return true;
        }
        error < threshold && speed < threshold
    }
}
