//! Ties frame geometry, the two NCCF passes, and the DP tracker together
//! behind one entry point that takes a caller-supplied original-rate and
//! downsampled buffer pair and returns per-frame F0.

use crate::audio::AudioBuffer;
use crate::config::PitchTrackerConfig;
use crate::descriptors::compute_descriptors;
use crate::error::PitchError;
use crate::first_pass;
use crate::geometry::{FrameGeometry, Pass};
use crate::second_pass;
use crate::tracker;

/// A richer per-frame result: the voicing decision alongside F0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchFrame {
    pub f0: f64,
    pub voiced: bool,
}

/// Estimates fundamental frequency per frame.
///
/// `original` is the full-rate buffer; `downsampled` must be decimated to
/// (approximately) `rate_o / round(rate_o / (4 * maximum_allowed_freq))`,
/// per [`PitchTrackerConfig::downsample_rate_for`]. Decoding, mixdown, and
/// resampling to produce these two buffers are the caller's responsibility.
pub fn estimate_pitch(original: &AudioBuffer, downsampled: &AudioBuffer, config: &PitchTrackerConfig) -> Result<Vec<f64>, PitchError> {
    config.validate()?;

    log::info!(
        "estimating pitch: original_rate={} downsampled_rate={} samples={}",
        original.rate(),
        downsampled.rate(),
        original.len()
    );

    let sample_rate_ratio = original.rate() as f64 / downsampled.rate() as f64;

    let first_pass_geometry = FrameGeometry::resolve(downsampled.rate(), downsampled.len(), config, Pass::First)?;
    let second_pass_geometry = FrameGeometry::resolve(original.rate(), original.len(), config, Pass::Second)?;

    log::debug!(
        "first-pass geometry: n={} z={} k_min={} k_max={} frames={}",
        first_pass_geometry.n,
        first_pass_geometry.z,
        first_pass_geometry.k_min,
        first_pass_geometry.k_max,
        first_pass_geometry.frame_count
    );

    let first_pass_candidates = first_pass::scan(downsampled.samples(), &first_pass_geometry, config, sample_rate_ratio);

    let frame_count = first_pass_candidates.len().min(second_pass_geometry.frame_count as usize);
    let first_pass_candidates = &first_pass_candidates[..frame_count];

    let refined = second_pass::refine(original.samples(), &second_pass_geometry, config, first_pass_candidates);

    log::debug!(
        "second-pass refinement complete: {} frames, {} total voiced candidates",
        refined.len(),
        refined.iter().map(|f| f.len()).sum::<usize>()
    );

    let frame_starts: Vec<i64> = (0..refined.len() as i64)
        .map(|i| second_pass_geometry.frame_start(i))
        .collect();
    let descriptors = compute_descriptors(original.samples(), original.rate(), &frame_starts);

    let f0 = tracker::track(&refined, &descriptors, config, original.rate());

    log::info!("pitch estimation complete: {} frames", f0.len());

    Ok(f0)
}

/// Convenience wrapper over [`estimate_pitch`] that also reports the
/// voicing decision per frame, instead of relying on `f0 == 0.0`.
pub fn estimate_pitch_frames(original: &AudioBuffer, downsampled: &AudioBuffer, config: &PitchTrackerConfig) -> Result<Vec<PitchFrame>, PitchError> {
    let f0 = estimate_pitch(original, downsampled, config)?;
    Ok(f0
        .into_iter()
        .map(|f0| PitchFrame { f0, voiced: f0 > 0.0 })
        .collect())
}
