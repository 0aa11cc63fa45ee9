//! Frame geometry: derives window length, frame advance, lag range, and
//! frame count from a sample rate and configuration.

use crate::config::PitchTrackerConfig;
use crate::error::ConfigError;

/// Which NCCF pass a [`FrameGeometry`] is being resolved for.
///
/// Both passes share one resolution path (`FrameGeometry::resolve`), keyed
/// by this flag rather than a raw boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    First,
    Second,
}

/// Derived integer quantities for one NCCF pass over one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    /// Samples per correlation window (n).
    pub n: i64,
    /// Frame advance, in samples (z).
    pub z: i64,
    /// Minimum lag, in samples (k_min).
    pub k_min: i64,
    /// Maximum lag (exclusive upper bound), in samples (K).
    pub k_max: i64,
    /// Frame count (M).
    pub frame_count: i64,
}

impl FrameGeometry {
    pub fn resolve(
        rate: u32,
        samples_len: usize,
        config: &PitchTrackerConfig,
        pass: Pass,
    ) -> Result<Self, ConfigError> {
        let r = rate as f64;

        let n = (r * config.correlation_window_size).floor() as i64;
        if n <= 0 {
            return Err(ConfigError::NonPositiveWindow(n));
        }

        let z = (r * config.frame_step_size).floor() as i64;
        if z <= 0 {
            return Err(ConfigError::NonPositiveFrameStep(z));
        }

        let k_min = match pass {
            Pass::First => (r / config.maximum_allowed_freq).floor() as i64,
            Pass::Second => 0,
        };
        let k_max = (r / config.minimum_allowed_freq).floor() as i64;
        if k_max - k_min <= 0 {
            return Err(ConfigError::NonPositiveLagRange {
                k_min,
                k_max,
            });
        }

        let frame_count = (samples_len as f64 / z as f64).floor() as i64 - 1;
        if frame_count <= 0 {
            return Err(ConfigError::BufferTooShort(frame_count));
        }

        Ok(Self {
            n,
            z,
            k_min,
            k_max,
            frame_count,
        })
    }

    /// Start sample index of frame `i` (m = i*z).
    pub fn frame_start(&self, i: i64) -> i64 {
        i * self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PitchTrackerConfig {
        PitchTrackerConfig::default()
    }

    #[test]
    fn resolves_expected_geometry_at_16k() {
        // 1 second of audio at 16kHz.
        let geometry = FrameGeometry::resolve(16_000, 16_000, &config(), Pass::First).unwrap();
        assert_eq!(geometry.n, (16_000.0 * 0.0075) as i64);
        assert_eq!(geometry.z, (16_000.0 * 0.01) as i64);
        assert_eq!(geometry.k_min, 16_000 / 500);
        assert_eq!(geometry.k_max, 16_000 / 50);
        assert!(geometry.frame_count > 0);
    }

    #[test]
    fn second_pass_has_zero_k_min() {
        let geometry = FrameGeometry::resolve(16_000, 16_000, &config(), Pass::Second).unwrap();
        assert_eq!(geometry.k_min, 0);
    }

    #[test]
    fn rejects_buffer_too_short() {
        let result = FrameGeometry::resolve(16_000, 10, &config(), Pass::First);
        assert!(matches!(result, Err(ConfigError::BufferTooShort(_))));
    }

    #[test]
    fn frame_step_changes_frame_count_monotonically() {
        let mut fast = config();
        fast.frame_step_size = 0.005;
        let mut slow = config();
        slow.frame_step_size = 0.02;

        let geometry_fast = FrameGeometry::resolve(16_000, 16_000, &fast, Pass::First).unwrap();
        let geometry_slow = FrameGeometry::resolve(16_000, 16_000, &slow, Pass::First).unwrap();

        assert!(geometry_fast.frame_count > geometry_slow.frame_count);
    }
}
