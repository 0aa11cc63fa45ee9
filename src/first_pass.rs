//! First-pass NCCF scanner: runs on the downsampled buffer, finds peaks per
//! frame, parabolically refines each, and rescales to original-rate lags.

use crate::config::PitchTrackerConfig;
use crate::correlator::nccf;
use crate::geometry::{FrameGeometry, Pass};
use crate::hypothesis::Hypothesis;
use crate::selection::cap_and_sort;

/// Scans all frames of the downsampled buffer, returning one candidate list
/// per frame (lags already rescaled into original-rate samples).
pub fn scan(downsampled_samples: &[f64], geometry: &FrameGeometry, config: &PitchTrackerConfig, sample_rate_ratio: f64) -> Vec<Vec<Hypothesis>> {
    (0..geometry.frame_count)
        .map(|i| scan_frame(downsampled_samples, geometry, config, i, sample_rate_ratio))
        .collect()
}

fn scan_frame(samples: &[f64], geometry: &FrameGeometry, config: &PitchTrackerConfig, frame_index: i64, sample_rate_ratio: f64) -> Vec<Hypothesis> {
    let lag_count = (geometry.k_max - geometry.k_min) as usize;
    let mut values = vec![0.0f64; lag_count];
    let mut theta_max = 0.0f64;

    for (idx, k) in (geometry.k_min..geometry.k_max).enumerate() {
        let theta = nccf(samples, geometry, frame_index, k, Pass::First, config.additive_constant);
        values[idx] = theta;
        if theta > theta_max {
            theta_max = theta;
        }
    }

    let tau = theta_max * config.min_acceptable_peak_val;

    let mut candidates = Vec::new();
    for (idx, &theta) in values.iter().enumerate() {
        if theta >= tau {
            let lag_index = idx as i64;
            let refined = interpolate_peak(&values, idx, lag_index + geometry.k_min);
            let lag_out = (refined * sample_rate_ratio).round();
            if lag_out <= 0.0 {
                // A degenerate rescale at the very bottom of the lag range;
                // the DP tracker's V->V cost assumes lag > 0 for every
                // voiced hypothesis, so drop it rather than emit lag=0.
                continue;
            }
            let lag_out = lag_out as u32;
            candidates.push(Hypothesis::Voiced {
                lag: lag_out,
                correlation: theta,
            });
        }
    }

    cap_and_sort(candidates, config.max_hypotheses_per_frame.saturating_sub(1))
}

/// Parabolic interpolation of a peak at `lag_index` within `values`,
/// clamped at the array endpoints to use the three nearest samples.
/// `lag_at_index` is the true lag corresponding to `values[lag_index]`,
/// used to anchor the x-coordinates of the fit.
///
/// Falls back to the uninterpolated integer lag on a degenerate (a=0)
/// parabola.
fn interpolate_peak(values: &[f64], lag_index: usize, lag_at_index: i64) -> f64 {
    let len = values.len();

    let (i0, i1, i2) = if lag_index == 0 {
        (0usize, 1usize.min(len - 1), 2usize.min(len - 1))
    } else if lag_index >= len - 1 {
        (len.saturating_sub(3), len.saturating_sub(2), len - 1)
    } else {
        (lag_index - 1, lag_index, lag_index + 1)
    };

    let x0 = lag_at_index + (i0 as i64 - lag_index as i64);
    let x1 = lag_at_index + (i1 as i64 - lag_index as i64);
    let x2 = lag_at_index + (i2 as i64 - lag_index as i64);

    let (y0, y1, y2) = (values[i0], values[i1], values[i2]);

    match fit_parabola_vertex(x0 as f64, y0, x1 as f64, y1, x2 as f64, y2) {
        Some(vertex) => vertex,
        None => {
            log::trace!("degenerate parabola at lag {lag_at_index}, falling back to integer lag");
            lag_at_index as f64
        }
    }
}

/// Fits `y = a*x^2 + b*x + c` through three points and returns the vertex
/// `-b / (2a)`, or `None` if `a` is degenerate (coincident/collinear points).
fn fit_parabola_vertex(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> Option<f64> {
    let denom = (x0 - x1) * (x0 - x2) * (x1 - x2);
    if denom == 0.0 {
        return None;
    }
    let a = (x2 * (y1 - y0) + x1 * (y0 - y2) + x0 * (y2 - y1)) / denom;
    if a == 0.0 {
        return None;
    }
    let b = (x2 * x2 * (y0 - y1) + x1 * x1 * (y2 - y0) + x0 * x0 * (y1 - y2)) / denom;
    Some(-b / (2.0 * a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_of_symmetric_parabola_is_centered() {
        // y = -(x-5)^2 + 10, sampled at x=4,5,6
        let vertex = fit_parabola_vertex(4.0, 9.0, 5.0, 10.0, 6.0, 9.0).unwrap();
        assert!((vertex - 5.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_parabola_returns_none() {
        // Collinear points: a = 0.
        assert!(fit_parabola_vertex(1.0, 1.0, 2.0, 2.0, 3.0, 3.0).is_none());
    }

    #[test]
    fn frame_result_is_sorted_and_bounded() {
        let config = PitchTrackerConfig::default();
        let samples: Vec<f64> = (0..4000).map(|i| (i as f64 * 0.2).sin()).collect();
        let geometry = FrameGeometry::resolve(2000, samples.len(), &config, Pass::First).unwrap();
        let candidates = scan(&samples, &geometry, &config, 8.0);
        assert!(!candidates.is_empty());
        for frame in &candidates {
            assert!(frame.len() <= config.max_hypotheses_per_frame - 1);
            let lags: Vec<u32> = frame.iter().map(|h| h.lag()).collect();
            let mut sorted = lags.clone();
            sorted.sort();
            assert_eq!(lags, sorted);
            for h in frame {
                assert!(h.correlation() >= -1.0 - 1e-9 && h.correlation() <= 1.0 + 1e-9);
            }
        }
    }
}
