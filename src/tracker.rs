//! Viterbi-style dynamic programming over the per-frame hypothesis sets.

use crate::config::PitchTrackerConfig;
use crate::descriptors::Descriptors;
use crate::hypothesis::Hypothesis;

/// One column of the Viterbi trellis: a hypothesis plus its accumulated
/// cost and the index of the predecessor (in the previous frame's column)
/// that achieved it.
struct Node {
    hypothesis: Hypothesis,
    cumulative_cost: f64,
    backpointer: Option<usize>,
}

/// Runs the DP tracker over every frame's hypothesis set (the unvoiced
/// sentinel is appended here, once per frame) and returns one F0 value per
/// frame, recovered by tracing the minimum-cost path.
pub fn track(refined: &[Vec<Hypothesis>], descriptors: &[Descriptors], config: &PitchTrackerConfig, original_rate: u32) -> Vec<f64> {
    if refined.is_empty() {
        return Vec::new();
    }

    let beta = config.lag_weight / (original_rate as f64 / config.minimum_allowed_freq);

    let mut columns: Vec<Vec<Node>> = Vec::with_capacity(refined.len());

    for (i, candidates) in refined.iter().enumerate() {
        let theta_max = candidates
            .iter()
            .map(|h| h.correlation())
            .fold(0.0f64, f64::max);

        let mut hypotheses: Vec<Hypothesis> = candidates.clone();
        hypotheses.push(Hypothesis::Unvoiced);

        let mut column = Vec::with_capacity(hypotheses.len());

        if i == 0 {
            for h in hypotheses {
                let cost = local_cost(&h, theta_max, config, beta);
                column.push(Node {
                    hypothesis: h,
                    cumulative_cost: cost,
                    backpointer: None,
                });
            }
        } else {
            let prev_column = &columns[i - 1];
            let descriptor = descriptors[i];
            for h in hypotheses {
                let d = local_cost(&h, theta_max, config, beta);
                let mut best_cost = f64::INFINITY;
                let mut best_prev = 0usize;
                for (prev_idx, prev_node) in prev_column.iter().enumerate() {
                    let delta = transition_cost(&prev_node.hypothesis, &h, config, descriptor);
                    let candidate_cost = prev_node.cumulative_cost + delta;
                    if candidate_cost < best_cost {
                        best_cost = candidate_cost;
                        best_prev = prev_idx;
                    }
                }
                column.push(Node {
                    hypothesis: h,
                    cumulative_cost: d + best_cost,
                    backpointer: Some(best_prev),
                });
            }
        }

        columns.push(column);
    }

    let last = columns.len() - 1;
    let mut best_idx = 0usize;
    let mut best_cost = f64::INFINITY;
    for (idx, node) in columns[last].iter().enumerate() {
        if node.cumulative_cost < best_cost {
            best_cost = node.cumulative_cost;
            best_idx = idx;
        }
    }

    let mut path = vec![Hypothesis::Unvoiced; columns.len()];
    let mut idx = best_idx;
    for frame in (0..columns.len()).rev() {
        let node = &columns[frame][idx];
        path[frame] = node.hypothesis;
        if let Some(back) = node.backpointer {
            idx = back;
        }
    }

    path.iter()
        .map(|h| match h {
            Hypothesis::Voiced { lag, .. } if *lag > 0 => original_rate as f64 / *lag as f64,
            _ => 0.0,
        })
        .collect()
}

fn local_cost(hypothesis: &Hypothesis, theta_max: f64, config: &PitchTrackerConfig, beta: f64) -> f64 {
    match hypothesis {
        Hypothesis::Unvoiced => config.voicing_bias + theta_max,
        Hypothesis::Voiced { lag, correlation } => {
            1.0 - correlation * (1.0 - beta * *lag as f64)
        }
    }
}

fn transition_cost(prev: &Hypothesis, curr: &Hypothesis, config: &PitchTrackerConfig, descriptor: Descriptors) -> f64 {
    match (prev, curr) {
        (Hypothesis::Unvoiced, Hypothesis::Unvoiced) => 0.0,
        (Hypothesis::Voiced { lag: lag_prev, .. }, Hypothesis::Voiced { lag: lag_curr, .. }) => {
            let ratio = (*lag_curr as f64 / *lag_prev as f64).ln();
            config.freq_weight * (config.doubling_cost + (ratio - 2.0f64.ln()).abs())
        }
        (Hypothesis::Voiced { .. }, Hypothesis::Unvoiced) => {
            config.transition_cost
                + config.spec_mod_transition_cost * descriptor.s
                + config.amp_mod_transition_cost * descriptor.rr
        }
        (Hypothesis::Unvoiced, Hypothesis::Voiced { .. }) => {
            config.transition_cost
                + config.spec_mod_transition_cost * descriptor.s
                + config.amp_mod_transition_cost / descriptor.rr
        }
    }
}
