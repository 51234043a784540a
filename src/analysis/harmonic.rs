//! Out-of-band spike scanner
//!
//! A bin is offending when its magnitude exceeds the energy threshold at a
//! frequency above the allowed ceiling (`fundamental * harmonic_multiple`).
//! Every frame with at least one offending bin is a harmonic error.
//!
//! Running statistics are kept across the whole scan and reported with each
//! error as they stood at that frame:
//! - `max_frequency`: highest offending frequency
//! - `max_energy`: largest offending magnitude
//! - `max_energy_frequency`: frequency paired with `max_energy`, only moved
//!   when a new energy maximum also lies above the current value

use crate::features::{running_average, FrameWindow};
use crate::spectrogram::Spectrogram;
use serde::{Deserialize, Serialize};

/// A frame containing out-of-band energy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicError {
    /// Frame index in the spectrogram
    pub frame: usize,
    /// Frame time in seconds
    pub time_seconds: f32,
    /// Running average of this frame's offending frequencies
    pub average_frequency: f32,
    /// Highest offending frequency seen so far in the scan
    pub max_frequency: f32,
    /// Largest offending magnitude seen so far in the scan
    pub max_energy: f32,
}

/// Result of a harmonic scan
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarmonicScan {
    /// Flagged frames in frame order
    pub errors: Vec<HarmonicError>,
    /// Highest offending frequency (0.0 if none)
    pub max_frequency: f32,
    /// Largest offending magnitude (0.0 if none)
    pub max_energy: f32,
    /// Frequency paired with `max_energy` (monotone update)
    pub max_energy_frequency: f32,
}

impl HarmonicScan {
    fn observe(&mut self, energy: f32, frequency: f32) {
        if energy > self.max_energy {
            self.max_energy = energy;
            if frequency > self.max_energy_frequency {
                self.max_energy_frequency = frequency;
            }
        }
        if frequency > self.max_frequency {
            self.max_frequency = frequency;
        }
    }
}

/// Scan the frames of `window` for energy above `max_allowed_hz`
///
/// # Arguments
///
/// * `spectrogram` - Magnitude spectrogram
/// * `window` - Frames to scan
/// * `max_allowed_hz` - Frequency ceiling; only bins strictly above it count
/// * `energy_threshold` - Magnitude a bin must strictly exceed to count
pub fn scan_harmonics(
    spectrogram: &Spectrogram,
    window: &FrameWindow,
    max_allowed_hz: f32,
    energy_threshold: f32,
) -> HarmonicScan {
    let freqs = &spectrogram.bin_frequencies()[1..];
    let times = spectrogram.frame_times();

    let scan = window.frames().fold(HarmonicScan::default(), |mut scan, frame| {
        let mut average: Option<f32> = None;

        for (&energy, &freq) in spectrogram.frame(frame)[1..].iter().zip(freqs) {
            if energy > energy_threshold && freq > max_allowed_hz {
                average = Some(running_average(average, freq));
                scan.observe(energy, freq);
            }
        }

        if let Some(average_frequency) = average {
            let error = HarmonicError {
                frame,
                time_seconds: times[frame],
                average_frequency,
                max_frequency: scan.max_frequency,
                max_energy: scan.max_energy,
            };
            scan.errors.push(error);
        }
        scan
    });

    log::debug!(
        "Harmonic scan above {:.1} Hz: {} frames flagged, max freq {:.1} Hz, max energy {:.3} at {:.1} Hz",
        max_allowed_hz,
        scan.errors.len(),
        scan.max_frequency,
        scan.max_energy,
        scan.max_energy_frequency
    );

    scan
}
