//! Frame-local audio descriptors used by the DP tracker's voicing-change
//! transition costs: spectral stationarity (S_i) and RMS ratio (rr_i).
//!
//! Both are computed from the original-rate audio using consecutive Hann
//! windows: `rr_i` compares windowed RMS energy between a frame and its
//! predecessor, and `S_i` compares their FFT magnitude spectra as an
//! Itakura-distortion proxy, via `rustfft`.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Constant fallback value — `0.2 / (itakura_distortion - 0.8)` with
/// `itakura_distortion` taken as 1 — used when a frame's spectrum is too
/// quiet to measure.
const STATIONARITY_FALLBACK: f64 = 0.2 / (1.0 - 0.8);

/// Per-frame `(S_i, rr_i)` pair, valid for the transition *into* frame `i`
/// from frame `i-1`. Index 0 holds the fallback values and is never
/// consulted by the tracker (frame 0 has no predecessor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptors {
    pub s: f64,
    pub rr: f64,
}

/// Computes `(S_i, rr_i)` for every frame, given the original-rate samples
/// and each frame's start sample index.
pub fn compute_descriptors(samples: &[f64], rate: u32, frame_starts: &[i64]) -> Vec<Descriptors> {
    let window_len = ((0.03 * rate as f64).floor() as usize).max(1);
    let hann = hann_window(window_len);
    let hann_energy: f64 = hann.iter().map(|w| w * w).sum();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(window_len);

    let mut prev: Option<(f64, Vec<f64>)> = None;
    let mut out = Vec::with_capacity(frame_starts.len());

    for &start in frame_starts {
        let (rms, magnitudes) = analyze_window(samples, start, window_len, &hann, hann_energy, fft.as_ref());

        let descriptor = match &prev {
            None => Descriptors { s: STATIONARITY_FALLBACK, rr: 1.0 },
            Some((prev_rms, prev_mag)) => {
                let rr = if *prev_rms == 0.0 { 1.0 } else { rms / prev_rms };
                let s = spectral_stationarity(prev_mag, &magnitudes);
                Descriptors { s, rr }
            }
        };

        out.push(descriptor);
        prev = Some((rms, magnitudes));
    }

    out
}

fn analyze_window(samples: &[f64], start: i64, window_len: usize, hann: &[f64], hann_energy: f64, fft: &dyn rustfft::Fft<f64>) -> (f64, Vec<f64>) {
    let start = start.max(0) as usize;
    let mut windowed = vec![0.0f64; window_len];
    for j in 0..window_len {
        let idx = start + j;
        if idx < samples.len() {
            windowed[j] = samples[idx] * hann[j];
        }
    }

    let energy: f64 = windowed.iter().map(|x| x * x).sum();
    let rms = if hann_energy > 0.0 { (energy / hann_energy).sqrt() } else { 0.0 };

    let mut buffer: Vec<Complex<f64>> = windowed.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);
    let num_bins = window_len / 2 + 1;
    let magnitudes: Vec<f64> = buffer.iter().take(num_bins).map(|c| c.norm()).collect();

    (rms, magnitudes)
}

/// Mean absolute log-magnitude difference between two spectra, over bins
/// where both magnitudes clear a noise floor relative to their own maxima.
/// Falls back to [`STATIONARITY_FALLBACK`] when too few bins qualify.
fn spectral_stationarity(prev: &[f64], curr: &[f64]) -> f64 {
    let floor_prev = prev.iter().cloned().fold(0.0f64, f64::max) * 1e-6;
    let floor_curr = curr.iter().cloned().fold(0.0f64, f64::max) * 1e-6;

    let mut total = 0.0;
    let mut count = 0usize;
    for (p, c) in prev.iter().zip(curr.iter()) {
        if *p > floor_prev && *c > floor_curr && floor_prev > 0.0 && floor_curr > 0.0 {
            total += (c.ln() - p.ln()).abs();
            count += 1;
        }
    }

    if count < 2 {
        STATIONARITY_FALLBACK
    } else {
        total / count as f64
    }
}

fn hann_window(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / (len - 1) as f64).cos())
        .collect()
}
