use thiserror::Error;

/// Errors raised at the boundaries of the gauge: surfaces, fonts, configuration input and the
/// window host. Drawing itself never fails; malformed input degrades the picture instead.
#[derive(Debug, Error)]
pub enum GaugeError {
    #[error("frame buffer holds {actual} bytes, surface needs {expected}")]
    Surface { expected: usize, actual: usize },

    #[error("surface has no pixels")]
    EmptySurface,

    #[error("could not allocate a {width}x{height} artwork surface")]
    Allocation { width: usize, height: usize },

    #[error("font error: {0}")]
    Font(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("window error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, GaugeError>;
