//! Clip metadata reported alongside the verdict

use crate::spectrogram::Spectrogram;
use serde::{Deserialize, Serialize};

/// Shape of the analysed clip and its spectrogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSummary {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of samples
    pub num_samples: usize,
    /// Time of the last sample in seconds
    pub duration_seconds: f32,
    /// Time of the last frame in seconds
    pub last_frame_seconds: f32,
    /// Frequency of the last bin in Hz
    pub last_bin_hz: f32,
    /// Number of STFT frames
    pub num_frames: usize,
    /// Number of frequency bins
    pub num_bins: usize,
    /// Algorithm version
    pub algorithm_version: String,
}

impl ClipSummary {
    /// Summarize a spectrogram
    pub fn from_spectrogram(spectrogram: &Spectrogram) -> Self {
        let sample_rate = spectrogram.sample_rate();
        let num_samples = spectrogram.num_samples();

        Self {
            sample_rate,
            num_samples,
            duration_seconds: num_samples.saturating_sub(1) as f32 / sample_rate as f32,
            last_frame_seconds: spectrogram.frame_times().last().copied().unwrap_or(0.0),
            last_bin_hz: spectrogram.bin_frequencies().last().copied().unwrap_or(0.0),
            num_frames: spectrogram.num_frames(),
            num_bins: spectrogram.num_bins(),
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
