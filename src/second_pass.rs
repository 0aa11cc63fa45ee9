//! Second-pass NCCF refiner: runs on the original-rate buffer in a small
//! neighbourhood of each first-pass candidate lag.

use std::collections::BTreeMap;

use crate::config::PitchTrackerConfig;
use crate::correlator::nccf;
use crate::geometry::{FrameGeometry, Pass};
use crate::hypothesis::Hypothesis;
use crate::selection::cap_and_sort;

const NEIGHBOURHOOD_RADIUS: i64 = 3;

/// Refines every frame's first-pass candidates against the original-rate
/// buffer, producing the final hypothesis set per frame.
pub fn refine(original_samples: &[f64], geometry: &FrameGeometry, config: &PitchTrackerConfig, first_pass: &[Vec<Hypothesis>]) -> Vec<Vec<Hypothesis>> {
    first_pass
        .iter()
        .enumerate()
        .map(|(i, candidates)| refine_frame(original_samples, geometry, config, i as i64, candidates))
        .collect()
}

fn refine_frame(samples: &[f64], geometry: &FrameGeometry, config: &PitchTrackerConfig, frame_index: i64, first_pass_candidates: &[Hypothesis]) -> Vec<Hypothesis> {
    // lag -> theta, accumulated across every first-pass peak's neighbourhood.
    let mut accumulated: BTreeMap<i64, f64> = BTreeMap::new();
    let mut theta_max = 0.0f64;

    for candidate in first_pass_candidates {
        let p = candidate.lag() as i64;

        if p <= NEIGHBOURHOOD_RADIUS || p >= (geometry.k_max - geometry.k_min) - NEIGHBOURHOOD_RADIUS {
            continue;
        }

        for k in (p - NEIGHBOURHOOD_RADIUS)..=(p + NEIGHBOURHOOD_RADIUS) {
            if k < 0 {
                continue;
            }
            let theta = nccf(samples, geometry, frame_index, k, Pass::Second, config.additive_constant);
            accumulated.insert(k, theta);
            if theta > theta_max {
                theta_max = theta;
            }
        }
    }

    let tau = theta_max * config.min_acceptable_peak_val;

    let candidates: Vec<Hypothesis> = accumulated
        .into_iter()
        .filter(|&(_, theta)| theta >= tau)
        .map(|(lag, correlation)| Hypothesis::Voiced {
            lag: lag as u32,
            correlation,
        })
        .collect();

    cap_and_sort(candidates, config.max_hypotheses_per_frame.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_first_pass_yields_empty_refinement() {
        let config = PitchTrackerConfig::default();
        let samples = vec![0.0; 16_000];
        let geometry = FrameGeometry::resolve(16_000, samples.len(), &config, Pass::Second).unwrap();
        let first_pass = vec![Vec::new(); geometry.frame_count as usize];
        let refined = refine(&samples, &geometry, &config, &first_pass);
        assert_eq!(refined.len(), first_pass.len());
        assert!(refined.iter().all(|f| f.is_empty()));
    }

    #[test]
    fn rejects_candidates_near_lag_boundaries() {
        let config = PitchTrackerConfig::default();
        let samples: Vec<f64> = (0..16_000).map(|i| (i as f64 * 0.3).sin()).collect();
        let geometry = FrameGeometry::resolve(16_000, samples.len(), &config, Pass::Second).unwrap();
        let first_pass = vec![vec![Hypothesis::Voiced { lag: 1, correlation: 0.9 }]];
        let refined = refine_frame(&samples, &geometry, &config, 0, &first_pass[0]);
        assert!(refined.is_empty());
    }

    #[test]
    fn refines_a_plausible_candidate() {
        let config = PitchTrackerConfig::default();
        // 200 Hz sine at 16kHz -> period ~= 80 samples.
        let samples: Vec<f64> = (0..16_000)
            .map(|i| (2.0 * std::f64::consts::PI * 200.0 * i as f64 / 16_000.0).sin())
            .collect();
        let geometry = FrameGeometry::resolve(16_000, samples.len(), &config, Pass::Second).unwrap();
        let first_pass = vec![Hypothesis::Voiced { lag: 80, correlation: 0.5 }];
        let refined = refine_frame(&samples, &geometry, &config, 0, &first_pass);
        assert!(!refined.is_empty());
        let best = refined
            .iter()
            .max_by(|a, b| a.correlation().partial_cmp(&b.correlation()).unwrap())
            .unwrap();
        assert!((best.lag() as i64 - 80).abs() <= 3);
    }
}
