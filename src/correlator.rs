//! The normalized cross-correlation function (NCCF), mean-subtracted variant.

use crate::geometry::{FrameGeometry, Pass};

/// Computes one NCCF value theta(i, k) for frame `i` and lag `k`.
///
/// `samples` is the full buffer for the pass currently in use (downsampled
/// audio on the first pass, original-rate audio on the second). `geometry`
/// must have been resolved for the same buffer and pass.
///
/// The mean used throughout is taken from the reference window `[m, m+n)`
/// only; the lagged window is mean-subtracted with that same mean rather
/// than its own — a deliberate simplification that avoids a second mean
/// computation per lag.
///
/// Returns 0.0 if the lagged window would run past the end of `samples`.
pub fn nccf(samples: &[f64], geometry: &FrameGeometry, frame_index: i64, lag: i64, pass: Pass, additive_constant: f64) -> f64 {
    let m = geometry.frame_start(frame_index) as usize;
    let n = geometry.n as usize;
    let k = lag as usize;

    if m + k + n > samples.len() {
        return 0.0;
    }

    let reference = &samples[m..m + n];
    let mean = reference.iter().sum::<f64>() / n as f64;

    let lagged = &samples[m + k..m + k + n];

    let mut numerator = 0.0;
    let mut e0 = 0.0;
    let mut ek = 0.0;
    for j in 0..n {
        let a = reference[j] - mean;
        let b = lagged[j] - mean;
        numerator += a * b;
        e0 += a * a;
        ek += b * b;
    }

    let denominator = match pass {
        Pass::First => (e0 * ek).sqrt(),
        Pass::Second => (e0 * ek + additive_constant).sqrt(),
    };

    if denominator == 0.0 {
        return 0.0;
    }

    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PitchTrackerConfig;

    #[test]
    fn self_correlation_at_zero_lag_is_near_one() {
        let config = PitchTrackerConfig::default();
        let samples: Vec<f64> = (0..2000)
            .map(|i| (i as f64 * 0.05).sin())
            .collect();
        let geometry = FrameGeometry::resolve(16_000, samples.len(), &config, Pass::First).unwrap();
        let theta = nccf(&samples, &geometry, 0, 0, Pass::First, config.additive_constant);
        assert!((theta - 1.0).abs() < 1e-9, "theta={theta}");
    }

    #[test]
    fn out_of_range_lag_returns_zero() {
        let config = PitchTrackerConfig::default();
        let samples = vec![0.0; 200];
        let geometry = FrameGeometry::resolve(16_000, 16_000, &config, Pass::First).unwrap();
        let theta = nccf(&samples, &geometry, 0, geometry.k_max, Pass::First, config.additive_constant);
        assert_eq!(theta, 0.0);
    }

    #[test]
    fn correlation_is_bounded() {
        let config = PitchTrackerConfig::default();
        let samples: Vec<f64> = (0..16_000)
            .map(|i| (i as f64 * 0.1).sin() + 0.01 * ((i * 7919) % 97) as f64)
            .collect();
        let geometry = FrameGeometry::resolve(16_000, samples.len(), &config, Pass::First).unwrap();
        for k in geometry.k_min..geometry.k_max {
            let theta = nccf(&samples, &geometry, 0, k, Pass::First, config.additive_constant);
            assert!(theta >= -1.0 - 1e-9 && theta <= 1.0 + 1e-9, "theta={theta} at k={k}");
        }
    }

    #[test]
    fn second_pass_regularises_pure_noise() {
        // A constant-zero frame has e0=ek=0; the additive constant should
        // keep the second-pass denominator from collapsing to NaN on noise
        // frames generally, and here exercises the zero-energy branch.
        let config = PitchTrackerConfig::default();
        let samples = vec![0.0; 16_000];
        let geometry = FrameGeometry::resolve(16_000, samples.len(), &config, Pass::Second).unwrap();
        let theta = nccf(&samples, &geometry, 0, 10, Pass::Second, config.additive_constant);
        assert_eq!(theta, 0.0);
    }
}
