//! # Tonecheck
//!
//! Spectral anomaly detection for captured test tones. A clip that should
//! contain one sustained tone is transformed to a magnitude spectrogram and
//! checked for dropouts, clicks and out-of-band spikes.
//!
//! ## Features
//!
//! - **Fundamental Estimation**: Running-maximum tracker over the spectrogram
//! - **Variance Analysis**: Frame-energy outliers against the clip mean
//! - **Harmonic Scan**: Energy above a multiple of the fundamental
//! - **Reporting**: Text and JSON reports, optional spectrogram PNG
//!
//! ## Quick Start
//!
//! ```no_run
//! use tonecheck::{analyze_audio, AnalysisConfig};
//!
//! // Mono f32 samples of the captured tone
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 48000;
//!
//! let report = analyze_audio(&samples, sample_rate, AnalysisConfig::default())?;
//!
//! println!("Fundamental: {:.1} Hz", report.fundamental_hz);
//! println!("{}", report.verdict);
//! # Ok::<(), tonecheck::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio Input → Preprocessing → Spectrogram → Feature Extraction → Analysis → Report
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod plot;
pub mod preprocessing;
pub mod spectrogram;

// Re-export main types
pub use analysis::result::{AnomalyReport, Verdict};
pub use config::{AnalysisConfig, PlotTrigger};
pub use error::AnalysisError;
pub use plot::FrequencyScale;
pub use spectrogram::Spectrogram;

use std::path::Path;

/// Report and spectrogram of an analysed file
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    /// Anomaly report
    pub report: AnomalyReport,
    /// Spectrogram the report was computed from
    pub spectrogram: Spectrogram,
}

/// Normalize samples and compute their magnitude spectrogram
///
/// # Errors
///
/// Returns `AnalysisError::Usage` for empty input, a zero sample rate or an
/// invalid configuration.
pub fn compute_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<Spectrogram, AnalysisError> {
    config.validate()?;

    if samples.is_empty() {
        return Err(AnalysisError::Usage("Empty audio samples".to_string()));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::Usage("Invalid sample rate".to_string()));
    }

    let mut processed = samples.to_vec();
    let norm = preprocessing::normalization::normalize(&mut processed, config.normalization)?;
    log::debug!("Normalization: peak {:.4}, gain {:.4}", norm.peak, norm.gain);

    Spectrogram::compute(&processed, sample_rate, config.fft_size, config.hop_size)
}

/// Main analysis function
///
/// Runs the full pipeline on mono samples: normalization, STFT, fundamental
/// estimate, energy profile, variance analysis and harmonic scan.
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `AnomalyReport` with the statistics, flagged frames and verdict
///
/// # Errors
///
/// Returns `AnalysisError::Usage` for invalid input or configuration and
/// `AnalysisError::DegenerateInput` when the clip is too short or constant
/// for the statistics to be defined.
///
/// # Example
///
/// ```no_run
/// use tonecheck::{analyze_audio, AnalysisConfig};
///
/// let samples: Vec<f32> = (0..96_000)
///     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48_000.0).sin())
///     .collect();
/// let report = analyze_audio(&samples, 48_000, AnalysisConfig::default())?;
/// assert!(report.verdict.is_pass());
/// # Ok::<(), tonecheck::AnalysisError>(())
/// ```
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: AnalysisConfig,
) -> Result<AnomalyReport, AnalysisError> {
    log::debug!(
        "Starting tone analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    let spectrogram = compute_spectrogram(samples, sample_rate, &config)?;
    analysis::analyze_spectrogram(&spectrogram, &config)
}

/// Decode, resample and analyse an audio file
///
/// The spectrogram is returned alongside the report so callers can plot it.
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` if the file cannot be decoded, plus
/// every error [`analyze_audio`] can return.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<FileAnalysis, AnalysisError> {
    config.validate()?;

    let (samples, sample_rate) = io::load_audio(path, config.target_sample_rate)?;
    log::debug!(
        "Loaded {}: {} samples at {} Hz",
        path.display(),
        samples.len(),
        sample_rate
    );

    let spectrogram = compute_spectrogram(&samples, sample_rate, config)?;
    let report = analysis::analyze_spectrogram(&spectrogram, config)?;

    Ok(FileAnalysis {
        report,
        spectrogram,
    })
}
