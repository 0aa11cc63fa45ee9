//! Shared peak-thresholding and candidate-capping logic used by both the
//! first-pass scanner and the second-pass refiner.

use crate::hypothesis::Hypothesis;

/// Keeps at most `cap` candidates (by correlation, descending), then
/// re-sorts the survivors by lag ascending.
///
/// `cap` is `max_hypotheses_per_frame - 1` — one slot is always reserved
/// for the unvoiced hypothesis appended later by the DP tracker.
pub fn cap_and_sort(mut candidates: Vec<Hypothesis>, cap: usize) -> Vec<Hypothesis> {
    if candidates.len() > cap {
        candidates.sort_by(|a, b| {
            b.correlation()
                .partial_cmp(&a.correlation())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(cap);
    }
    candidates.sort_by_key(|h| h.lag());
    candidates
}
