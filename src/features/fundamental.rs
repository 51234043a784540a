//! Approximate fundamental frequency
//!
//! Monotone running-maximum tracker: frames are scanned in order and, within
//! each frame, bins from 1 upwards. Whenever a bin beats the largest magnitude
//! seen so far in the whole scan, its frequency is folded into the estimate
//! with [`running_average`]. The result sits at or slightly below the
//! dominant bin and depends on scan order; it is not an argmax.
//!
//! # Example
//!
//! ```
//! use tonecheck::features::{fundamental::estimate_fundamental, FrameWindow};
//! use tonecheck::Spectrogram;
//!
//! // 5 bins (FFT size 8) at 8 kHz: bins are 0, 1000, 2000, 3000, 4000 Hz
//! let mut mags = vec![vec![0.0f32; 4]; 5];
//! mags[2] = vec![0.0, 0.0, 1.0, 1.0];
//! let spec = Spectrogram::from_magnitudes(&mags, 8000, 8, 4, 16)?;
//!
//! let window = FrameWindow::new(spec.num_frames(), 1)?;
//! let estimate = estimate_fundamental(&spec, &window, 4.0);
//! assert_eq!(estimate.fundamental_hz, 2000.0);
//! assert_eq!(estimate.max_allowed_hz, 8000.0);
//! # Ok::<(), tonecheck::AnalysisError>(())
//! ```

use super::{running_average, FrameWindow};
use crate::spectrogram::Spectrogram;

/// Fundamental estimate and the derived out-of-band ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundamentalEstimate {
    /// Approximate fundamental in Hz (0.0 if the window holds no energy)
    pub fundamental_hz: f32,
    /// `fundamental_hz * harmonic_multiple`
    pub max_allowed_hz: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tracker {
    max_energy: f32,
    estimate: Option<f32>,
}

impl Tracker {
    fn observe(self, energy: f32, frequency: f32) -> Self {
        if energy > self.max_energy {
            Self {
                max_energy: energy,
                estimate: Some(running_average(self.estimate, frequency)),
            }
        } else {
            self
        }
    }
}

/// Estimate the fundamental over the frames of `window`
///
/// DC (bin 0) is never considered.
pub fn estimate_fundamental(
    spectrogram: &Spectrogram,
    window: &FrameWindow,
    harmonic_multiple: f32,
) -> FundamentalEstimate {
    let freqs = &spectrogram.bin_frequencies()[1..];

    let tracker = window.frames().fold(Tracker::default(), |tracker, frame| {
        spectrogram.frame(frame)[1..]
            .iter()
            .zip(freqs)
            .fold(tracker, |t, (&energy, &freq)| t.observe(energy, freq))
    });

    let fundamental_hz = tracker.estimate.unwrap_or(0.0);
    let max_allowed_hz = fundamental_hz * harmonic_multiple;

    log::debug!(
        "Fundamental: {:.1} Hz (peak magnitude {:.3}), max allowed {:.1} Hz",
        fundamental_hz,
        tracker.max_energy,
        max_allowed_hz
    );

    FundamentalEstimate {
        fundamental_hz,
        max_allowed_hz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 9 bins (FFT size 16) at 1600 Hz: bin b is 100*b Hz
    fn spec_from(mags: Vec<Vec<f32>>) -> Spectrogram {
        let frames = mags[0].len();
        Spectrogram::from_magnitudes(&mags, 1600, 16, 8, frames * 8).unwrap()
    }

    #[test]
    fn test_single_peak() {
        let mut mags = vec![vec![0.0f32; 6]; 9];
        mags[3] = vec![5.0; 6];
        let spec = spec_from(mags);
        let window = FrameWindow::new(6, 1).unwrap();

        let est = estimate_fundamental(&spec, &window, 4.0);
        assert_eq!(est.fundamental_hz, 300.0);
        assert_eq!(est.max_allowed_hz, 1200.0);
    }

    #[test]
    fn test_running_maximum_averages_frequencies() {
        // Rising magnitudes across bins 1..=4 within one frame
        let mut mags = vec![vec![0.0f32; 4]; 9];
        for b in 1..=4 {
            mags[b][2] = b as f32;
        }
        let spec = spec_from(mags);
        let window = FrameWindow::new(4, 1).unwrap();

        // 100 -> (100+200)/2=150 -> (150+300)/2=225 -> (225+400)/2=312.5
        let est = estimate_fundamental(&spec, &window, 4.0);
        assert_eq!(est.fundamental_hz, 312.5);
    }

    #[test]
    fn test_maximum_is_global_not_per_frame() {
        // Frame 2 peaks at bin 4 (energy 10); frame 3 peaks at bin 2 (energy 8),
        // which never beats the global maximum and so never updates.
        let mut mags = vec![vec![0.0f32; 5]; 9];
        mags[4][2] = 10.0;
        mags[2][3] = 8.0;
        let spec = spec_from(mags);
        let window = FrameWindow::new(5, 1).unwrap();

        let est = estimate_fundamental(&spec, &window, 4.0);
        assert_eq!(est.fundamental_hz, 400.0);
    }

    #[test]
    fn test_equal_energy_does_not_update() {
        let mut mags = vec![vec![0.0f32; 4]; 9];
        mags[2][2] = 5.0;
        mags[6][2] = 5.0;
        let spec = spec_from(mags);
        let window = FrameWindow::new(4, 1).unwrap();

        assert_eq!(estimate_fundamental(&spec, &window, 4.0).fundamental_hz, 200.0);
    }

    #[test]
    fn test_boundary_frames_and_dc_ignored() {
        let mut mags = vec![vec![0.0f32; 6]; 9];
        // Loud energy in excluded lead-in frame and trailing skipped frame
        mags[7][0] = 100.0;
        mags[7][5] = 100.0;
        // DC everywhere
        mags[0] = vec![1000.0; 6];
        mags[2][3] = 1.0;
        let spec = spec_from(mags);
        let window = FrameWindow::new(6, 2).unwrap();

        assert_eq!(estimate_fundamental(&spec, &window, 4.0).fundamental_hz, 200.0);
    }

    #[test]
    fn test_silence() {
        let spec = spec_from(vec![vec![0.0f32; 5]; 9]);
        let window = FrameWindow::new(5, 1).unwrap();
        let est = estimate_fundamental(&spec, &window, 4.0);
        assert_eq!(est.fundamental_hz, 0.0);
        assert_eq!(est.max_allowed_hz, 0.0);
    }
}
