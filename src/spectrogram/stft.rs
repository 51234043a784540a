//! Short-time Fourier transform
//!
//! Conventions:
//! - Signal zero-padded by `fft_size / 2` on both sides so frame `t` is
//!   centred on sample `t * hop_size`
//! - Periodic Hann window
//! - Unscaled magnitudes `|X[k]|` for bins `0..=fft_size / 2`
//! - `1 + len / hop_size` frames
//!
//! # Example
//!
//! ```
//! use tonecheck::spectrogram::stft::magnitude_frames;
//!
//! let samples = vec![0.0f32; 4096];
//! let frames = magnitude_frames(&samples, 1024, 512)?;
//! assert_eq!(frames.len(), 9);
//! assert_eq!(frames[0].len(), 513);
//! # Ok::<(), tonecheck::AnalysisError>(())
//! ```

use crate::error::AnalysisError;
use crate::io::sample_buffer::SampleBuffer;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Periodic Hann window of length `n`
pub fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            (0.5 - 0.5 * phase.cos()) as f32
        })
        .collect()
}

/// Compute per-frame magnitude spectra
///
/// # Returns
///
/// One vector of `fft_size / 2 + 1` magnitudes per frame
///
/// # Errors
///
/// Returns `AnalysisError::Usage` for empty input, `fft_size < 2` or a zero hop.
pub fn magnitude_frames(
    samples: &[f32],
    fft_size: usize,
    hop_size: usize,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::Usage("Empty audio samples".to_string()));
    }

    if fft_size < 2 {
        return Err(AnalysisError::Usage("FFT size must be >= 2".to_string()));
    }

    if hop_size == 0 {
        return Err(AnalysisError::Usage("Hop size must be > 0".to_string()));
    }

    let window = hann_window(fft_size);
    let num_bins = fft_size / 2 + 1;

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_size);

    let mut buffer = SampleBuffer::centered(samples, fft_size / 2, hop_size);
    let mut frames = Vec::with_capacity(buffer.window_count(fft_size));
    let mut scratch = vec![Complex::new(0.0f32, 0.0); fft_size];

    while let Some(chunk) = buffer.next_window(fft_size) {
        for ((slot, &x), &w) in scratch.iter_mut().zip(chunk).zip(&window) {
            *slot = Complex::new(x * w, 0.0);
        }

        fft.process(&mut scratch);

        frames.push(scratch[..num_bins].iter().map(|c| c.norm()).collect());
    }

    Ok(frames)
}
