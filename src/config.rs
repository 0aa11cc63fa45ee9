//! Tunable parameters for the pitch tracker.

use crate::error::ConfigError;

/// Immutable bag of scalars controlling every stage of the pipeline.
///
/// A plain struct with a `Default` impl holding the documented defaults,
/// validated once up front rather than per-field.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchTrackerConfig {
    /// Upper F0 bound (Hz). Sets the first-pass minimum lag.
    pub maximum_allowed_freq: f64,
    /// Lower F0 bound (Hz). Sets the maximum lag.
    pub minimum_allowed_freq: f64,
    /// Frame advance, in seconds.
    pub frame_step_size: f64,
    /// Correlation window length, in seconds.
    pub correlation_window_size: f64,
    /// Relative peak threshold factor (tau / theta_max).
    pub min_acceptable_peak_val: f64,
    /// Upper bound on hypotheses retained per frame, including the unvoiced slot.
    pub max_hypotheses_per_frame: usize,
    /// Denominator regulariser C used on the second NCCF pass.
    pub additive_constant: f64,
    /// Offset applied to the unvoiced hypothesis's local cost.
    pub voicing_bias: f64,
    /// Controls the normalised lag weight beta in the voiced local cost.
    pub lag_weight: f64,
    /// Scales the voiced-to-voiced transition cost.
    pub freq_weight: f64,
    /// Baseline voiced-to-voiced transition cost (octave-jump penalty).
    pub doubling_cost: f64,
    /// Baseline voicing-change transition cost.
    pub transition_cost: f64,
    /// Weight applied to the spectral-stationarity term S_i.
    pub spec_mod_transition_cost: f64,
    /// Weight applied to the RMS-ratio term rr_i.
    pub amp_mod_transition_cost: f64,
}

impl Default for PitchTrackerConfig {
    fn default() -> Self {
        Self {
            maximum_allowed_freq: 500.0,
            minimum_allowed_freq: 50.0,
            frame_step_size: 0.01,
            correlation_window_size: 0.0075,
            min_acceptable_peak_val: 0.3,
            max_hypotheses_per_frame: 20,
            additive_constant: 10_000.0,
            voicing_bias: 0.0,
            lag_weight: 0.3,
            freq_weight: 0.02,
            doubling_cost: 0.35,
            transition_cost: 0.005,
            spec_mod_transition_cost: 0.5,
            amp_mod_transition_cost: 100.0,
        }
    }
}

impl PitchTrackerConfig {
    /// Checks range constraints that don't depend on a specific audio buffer.
    ///
    /// Called once at the top of [`crate::estimate_pitch`], before any audio
    /// is touched, so a bad config fails fast.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_acceptable_peak_val > 0.0 && self.min_acceptable_peak_val <= 1.0) {
            return Err(ConfigError::InvalidPeakThreshold(self.min_acceptable_peak_val));
        }
        if self.max_hypotheses_per_frame < 2 {
            return Err(ConfigError::InvalidHypothesisCap(self.max_hypotheses_per_frame));
        }
        if !(self.minimum_allowed_freq > 0.0
            && self.maximum_allowed_freq > 0.0
            && self.minimum_allowed_freq < self.maximum_allowed_freq)
        {
            return Err(ConfigError::InvalidFrequencyRange {
                min: self.minimum_allowed_freq,
                max: self.maximum_allowed_freq,
            });
        }
        if !(self.frame_step_size > 0.0 && self.correlation_window_size > 0.0) {
            return Err(ConfigError::NonPositiveWindow(0));
        }
        Ok(())
    }

    /// The downsampling rate a caller should decimate `original_audio` to
    /// before calling [`crate::estimate_pitch`]:
    /// `rate_d ≈ rate_o / round(rate_o / (4 · maximum_allowed_freq))`.
    pub fn downsample_rate_for(&self, original_rate: u32) -> Result<u32, ConfigError> {
        if original_rate == 0 {
            return Err(ConfigError::InvalidSampleRate(original_rate));
        }
        let ratio = (original_rate as f64 / (4.0 * self.maximum_allowed_freq)).round();
        if ratio <= 0.0 {
            return Err(ConfigError::InvalidFrequencyRange {
                min: self.minimum_allowed_freq,
                max: self.maximum_allowed_freq,
            });
        }
        Ok((original_rate as f64 / ratio).round() as u32)
    }
}
