//! Error taxonomy for the pitch tracker.

use thiserror::Error;

/// Invalid configuration, derived frame geometry, or input buffer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("audio buffer is empty")]
    EmptyAudio,

    #[error("sample rate must be >= 1, got {0}")]
    InvalidSampleRate(u32),

    #[error("correlation window size resolves to non-positive length n={0}")]
    NonPositiveWindow(i64),

    #[error("frame step size resolves to non-positive advance z={0}")]
    NonPositiveFrameStep(i64),

    #[error("lag range is empty or non-positive: k_min={k_min}, K={k_max}")]
    NonPositiveLagRange { k_min: i64, k_max: i64 },

    #[error("audio buffer too short for configuration: computed frame count {0} <= 0")]
    BufferTooShort(i64),

    #[error("min_acceptable_peak_val must be in (0, 1], got {0}")]
    InvalidPeakThreshold(f64),

    #[error("max_hypotheses_per_frame must be >= 2, got {0}")]
    InvalidHypothesisCap(usize),

    #[error("minimum_allowed_freq ({min}) must be < maximum_allowed_freq ({max})")]
    InvalidFrequencyRange { min: f64, max: f64 },
}

/// Numerical degeneracy encountered while refining a candidate lag.
///
/// These are always recovered from locally (fall back to the uninterpolated
/// integer lag); the variant exists so the fallback path is independently
/// testable, not because it is ever propagated to a caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericError {
    #[error("degenerate parabola (a=0) during peak interpolation at lag {0}, falling back to integer lag")]
    DegenerateParabola(i64),
}

/// Top-level error type returned by the pitch-estimation entry points.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PitchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Numeric(#[from] NumericError),
}
