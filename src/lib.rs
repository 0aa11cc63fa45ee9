//! A Rust implementation of David Talkin's Robust Algorithm for Pitch
//! Tracking (RAPT): a two-pass normalized cross-correlation function (NCCF)
//! candidate generator feeding a dynamic-programming voicing/pitch tracker.
//!
//! WAV decoding, channel mixdown, low-pass filtering, and resampling are
//! out of scope here — callers supply an original-rate [`AudioBuffer`] and
//! a decimated [`AudioBuffer`] (see [`PitchTrackerConfig::downsample_rate_for`]
//! for the expected decimation ratio).

mod audio;
mod config;
mod correlator;
mod descriptors;
mod error;
mod first_pass;
mod geometry;
mod hypothesis;
mod pipeline;
mod second_pass;
mod selection;
mod tracker;

pub use audio::AudioBuffer;
pub use config::PitchTrackerConfig;
pub use error::{ConfigError, NumericError, PitchError};
pub use geometry::{FrameGeometry, Pass};
pub use hypothesis::Hypothesis;
pub use pipeline::{estimate_pitch, estimate_pitch_frames, PitchFrame};
