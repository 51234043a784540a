//! Anomaly detection and result aggregation
//!
//! Runs the detection passes over a spectrogram, strictly in order:
//! 1. Fundamental estimate and out-of-band ceiling
//! 2. Frame energy profile
//! 3. Variance scan
//! 4. Harmonic spike scan
//!
//! and combines their outputs into an [`AnomalyReport`].

pub mod harmonic;
pub mod metadata;
pub mod report;
pub mod result;
pub mod variance;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::energy::build_energy_profile;
use crate::features::fundamental::estimate_fundamental;
use crate::features::FrameWindow;
use crate::spectrogram::Spectrogram;
use metadata::ClipSummary;
use result::{AnomalyReport, Verdict};

/// Check a magnitude spectrogram for dropouts and out-of-band spikes
///
/// # Errors
///
/// Returns `AnalysisError::DegenerateInput` when the spectrogram has fewer
/// than `frame_skip + 3` frames or the frame-energy standard deviation is
/// zero, and `AnalysisError::Usage` for an invalid configuration. Detected
/// anomalies are not errors; they produce a FAIL verdict.
pub fn analyze_spectrogram(
    spectrogram: &Spectrogram,
    config: &AnalysisConfig,
) -> Result<AnomalyReport, AnalysisError> {
    config.validate()?;

    let window = FrameWindow::new(spectrogram.num_frames(), config.frame_skip)?;
    log::debug!(
        "Analysing frames {:?} of {}",
        window.frames(),
        spectrogram.num_frames()
    );

    let fundamental = estimate_fundamental(spectrogram, &window, config.harmonic_multiple);
    let profile = build_energy_profile(spectrogram, &window);
    let variance = variance::analyze_variance(&profile, config.max_delta_energy_sqr)?;
    let spikes = harmonic::scan_harmonics(
        spectrogram,
        &window,
        fundamental.max_allowed_hz,
        config.energy_threshold,
    );

    let verdict = Verdict::from_counts(variance.errors.len(), spikes.errors.len());
    log::debug!("Verdict: {}", verdict);

    Ok(AnomalyReport {
        clip: ClipSummary::from_spectrogram(spectrogram),
        fundamental_hz: fundamental.fundamental_hz,
        max_allowed_hz: fundamental.max_allowed_hz,
        energy_threshold: config.energy_threshold,
        average_frame_energy: variance.average_energy,
        energy_std_dev: variance.std_dev,
        max_energy_deviation: variance.max_deviation,
        deviation_to_std_ratio: variance.deviation_ratio,
        variance_errors: variance.errors,
        harmonic_errors: spikes.errors,
        max_frequency: spikes.max_frequency,
        max_energy: spikes.max_energy,
        max_energy_frequency: spikes.max_energy_frequency,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 9 bins at 1600 Hz (bin b = 100*b Hz); tone in bin 2 with slight
    /// frame-to-frame variation so the energy statistics are defined.
    fn tone_magnitudes(frames: usize) -> Vec<Vec<f32>> {
        let mut mags = vec![vec![0.0f32; frames]; 9];
        for f in 0..frames {
            mags[2][f] = 50.0 + (f % 3) as f32 * 0.1;
        }
        mags
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            frame_skip: 2,
            ..AnalysisConfig::default()
        }
    }

    fn spec_from(mags: &[Vec<f32>]) -> Spectrogram {
        let frames = mags[0].len();
        Spectrogram::from_magnitudes(mags, 1600, 16, 8, frames * 8).unwrap()
    }

    #[test]
    fn test_clean_tone_passes() {
        let report = analyze_spectrogram(&spec_from(&tone_magnitudes(40)), &config()).unwrap();

        assert_eq!(report.fundamental_hz, 200.0);
        assert_eq!(report.max_allowed_hz, 800.0);
        assert!(report.verdict.is_pass());
        assert_eq!(report.variance_error_count(), 0);
        assert_eq!(report.harmonic_error_count(), 0);
        assert!(report.energy_std_dev > 0.0);
    }

    #[test]
    fn test_dropout_and_spike_fail() {
        let mut mags = tone_magnitudes(40);
        mags[2][20] = 0.0; // dropout
        mags[8][30] = 1.0; // 800 Hz is not above the ceiling
        mags[7][31] = 0.5; // 700 Hz, in band
        let report = analyze_spectrogram(&spec_from(&mags), &config()).unwrap();
        assert_eq!(report.variance_error_count(), 1);
        assert_eq!(report.variance_errors[0].frame, 20);
        assert_eq!(report.harmonic_error_count(), 0);

        let config = AnalysisConfig {
            harmonic_multiple: 3.0,
            ..config()
        };
        let report = analyze_spectrogram(&spec_from(&mags), &config).unwrap();
        assert_eq!(report.harmonic_error_count(), 2);
        assert_eq!(report.max_frequency, 800.0);
        assert_eq!(
            report.verdict,
            Verdict::Fail {
                variance_errors: 1,
                harmonic_errors: 2
            }
        );
    }

    #[test]
    fn test_dc_bias_does_not_change_outcome() {
        let mut mags = tone_magnitudes(40);
        mags[2][20] = 0.0;
        mags[8][30] = 1.0;
        let mut biased = mags.clone();
        biased[0].iter_mut().for_each(|m| *m += 75.0);

        let config = AnalysisConfig {
            harmonic_multiple: 3.0,
            ..config()
        };
        let a = analyze_spectrogram(&spec_from(&mags), &config).unwrap();
        let b = analyze_spectrogram(&spec_from(&biased), &config).unwrap();

        assert_eq!(a.variance_errors, b.variance_errors);
        assert_eq!(a.harmonic_errors, b.harmonic_errors);
        assert_eq!(a.average_frame_energy, b.average_frame_energy);
        assert_eq!(a, b);
    }

    #[test]
    fn test_minimum_length_is_degenerate_not_nan() {
        // frame_skip + 3 frames leaves a single analysed frame
        let spec = spec_from(&tone_magnitudes(5));
        let result = analyze_spectrogram(&spec, &config());
        assert!(matches!(result, Err(AnalysisError::DegenerateInput(_))));

        let spec = spec_from(&tone_magnitudes(4));
        let result = analyze_spectrogram(&spec, &config());
        assert!(matches!(result, Err(AnalysisError::DegenerateInput(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalysisConfig {
            harmonic_multiple: -1.0,
            ..config()
        };
        let result = analyze_spectrogram(&spec_from(&tone_magnitudes(40)), &config);
        assert!(matches!(result, Err(AnalysisError::Usage(_))));
    }
}
