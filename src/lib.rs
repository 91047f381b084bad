// ============================================================================
// CRATE LAYOUT
// ============================================================================
//
// Instrument-cluster gauges drawn into an RGBA frame buffer: a spring-damper needle on a fixed
// timestep, value-independent artwork cached offscreen, and per-frame layers composited on top.

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod layers;
pub mod motion;
pub mod sweep;
pub mod text;
pub mod window;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use canvas::{Canvas, PixelBuffer};
pub use color::{Color, GradientStop, Palette};
pub use config::{resolve, ConfigSource, FaceStyle, GaugeConfig, Zone};
pub use error::{GaugeError, Result};
pub use gauge::Gauge;
pub use geometry::value_to_angle;
pub use layers::artwork::{build_static_artwork, StaticArtwork};
pub use motion::{MotionSimulator, Physics};
pub use sweep::{Sweep, SweepEvent, SweepState};
pub use text::Typeface;
pub use window::{GaugeCommand, WindowOptions};
