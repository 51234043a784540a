//! Frame-energy variance analysis
//!
//! Flags frames whose aggregate energy strays from the clip mean. A dropout
//! shows up as a frame far below the mean, a click or burst as one far above.
//!
//! # Algorithm
//!
//! 1. `mean = total / N` over the energy profile
//! 2. For every frame, `d² = (E - mean)²`; frames with `d²` above the threshold
//!    are variance errors carrying `d = sqrt(d²)`
//! 3. Population standard deviation `sqrt(Σd² / N)`
//! 4. Ratio of the largest flagged deviation to the standard deviation
//!
//! # Example
//!
//! ```
//! use tonecheck::analysis::variance::analyze_variance;
//! use tonecheck::features::energy::EnergyProfile;
//!
//! let profile = EnergyProfile::from_energies(&[10.0, 10.0, 10.0, 30.0]);
//! let stats = analyze_variance(&profile, 100.0)?;
//! assert_eq!(stats.errors.len(), 1);
//! assert_eq!(stats.errors[0].deviation, 15.0);
//! # Ok::<(), tonecheck::AnalysisError>(())
//! ```

use crate::error::AnalysisError;
use crate::features::energy::EnergyProfile;
use serde::{Deserialize, Serialize};

/// A frame whose energy deviates too far from the mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceError {
    /// Frame index in the spectrogram
    pub frame: usize,
    /// Frame time in seconds
    pub time_seconds: f32,
    /// `|E - mean|`
    pub deviation: f32,
}

/// Frame-energy statistics and the frames that failed them
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceAnalysis {
    /// Mean frame energy
    pub average_energy: f32,
    /// Population standard deviation of frame energy
    pub std_dev: f32,
    /// Largest deviation among flagged frames (0.0 if none)
    pub max_deviation: f32,
    /// `max_deviation / std_dev`
    pub deviation_ratio: f32,
    /// Flagged frames in frame order
    pub errors: Vec<VarianceError>,
}

#[derive(Debug, Default)]
struct Accumulator {
    sum_sq: f64,
    max_deviation: f32,
    errors: Vec<VarianceError>,
}

/// Population standard deviation `sqrt(Σ(x - mean)² / N)`
///
/// Returns `None` for an empty slice.
pub fn population_std_dev(values: &[f32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
    Some((sum_sq / n).sqrt())
}

/// Scan the energy profile for outlier frames
///
/// # Arguments
///
/// * `profile` - Frame energies from [`crate::features::energy::build_energy_profile`]
/// * `max_delta_energy_sqr` - Squared deviation above which a frame is flagged
///
/// # Errors
///
/// Returns `AnalysisError::DegenerateInput` if the profile is empty or the
/// standard deviation is zero (the ratio would be undefined).
pub fn analyze_variance(
    profile: &EnergyProfile,
    max_delta_energy_sqr: f32,
) -> Result<VarianceAnalysis, AnalysisError> {
    let mean = profile.mean().ok_or_else(|| {
        AnalysisError::DegenerateInput("No frames to compute energy statistics over".to_string())
    })?;

    let threshold = max_delta_energy_sqr as f64;

    let acc = profile
        .frames
        .iter()
        .fold(Accumulator::default(), |mut acc, frame| {
            let delta_sqr = (frame.energy as f64 - mean).powi(2);
            acc.sum_sq += delta_sqr;

            if delta_sqr > threshold {
                let deviation = delta_sqr.sqrt() as f32;
                acc.max_deviation = acc.max_deviation.max(deviation);
                acc.errors.push(VarianceError {
                    frame: frame.frame,
                    time_seconds: frame.time_seconds,
                    deviation,
                });
            }
            acc
        });

    let std_dev = (acc.sum_sq / profile.len() as f64).sqrt();

    if std_dev <= 0.0 || !std_dev.is_finite() {
        return Err(AnalysisError::DegenerateInput(format!(
            "Frame energy standard deviation is {} over {} frames; clip too short or constant",
            std_dev,
            profile.len()
        )));
    }

    let deviation_ratio = (acc.max_deviation as f64 / std_dev) as f32;

    log::debug!(
        "Variance: mean={:.3}, sd={:.3}, {} flagged, max deviation {:.3} ({:.1} sd)",
        mean,
        std_dev,
        acc.errors.len(),
        acc.max_deviation,
        deviation_ratio
    );

    Ok(VarianceAnalysis {
        average_energy: mean as f32,
        std_dev: std_dev as f32,
        max_deviation: acc.max_deviation,
        deviation_ratio,
        errors: acc.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_not_sample_std_dev() {
        // mean 5, squared deviations sum to 32 over 8 values
        let values = [2.0f32, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_std_dev(&values), Some(2.0));

        let profile = EnergyProfile::from_energies(&values);
        let stats = analyze_variance(&profile, 100.0).unwrap();
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.average_energy, 5.0);
        // sample std dev would be sqrt(32 / 7)
        assert!((stats.std_dev - (32.0f32 / 7.0).sqrt()).abs() > 0.1);
    }

    #[test]
    fn test_flags_outliers_above_threshold() {
        let mut energies = vec![100.0f32; 20];
        energies[7] = 80.0; // dropout
        energies[12] = 101.0; // within tolerance
        let profile = EnergyProfile::from_energies(&energies);

        let stats = analyze_variance(&profile, 9.0).unwrap();
        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors[0].frame, 7);

        let mean = (100.0 * 18.0 + 80.0 + 101.0) / 20.0;
        assert!((stats.errors[0].deviation - (mean - 80.0)).abs() < 1e-4);
        assert_eq!(stats.max_deviation, stats.errors[0].deviation);

        let sd = population_std_dev(&energies).unwrap() as f32;
        assert!((stats.std_dev - sd).abs() < 1e-5);
        assert!((stats.deviation_ratio - stats.max_deviation / sd).abs() < 1e-4);
    }

    #[test]
    fn test_threshold_is_strict() {
        // mean 3, deviations exactly 3 → d² = 9, not above 9
        let profile = EnergyProfile::from_energies(&[0.0, 6.0]);
        let stats = analyze_variance(&profile, 9.0).unwrap();
        assert!(stats.errors.is_empty());
        assert_eq!(stats.max_deviation, 0.0);
        assert_eq!(stats.deviation_ratio, 0.0);
    }

    #[test]
    fn test_constant_profile_is_degenerate() {
        let profile = EnergyProfile::from_energies(&[5.0, 5.0, 5.0]);
        let err = analyze_variance(&profile, 9.0).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput(_)));
    }

    #[test]
    fn test_single_frame_is_degenerate() {
        let profile = EnergyProfile::from_energies(&[42.0]);
        assert!(matches!(
            analyze_variance(&profile, 9.0),
            Err(AnalysisError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_empty_profile_is_degenerate() {
        let profile = EnergyProfile::from_energies(&[]);
        assert!(matches!(
            analyze_variance(&profile, 9.0),
            Err(AnalysisError::DegenerateInput(_))
        ));
    }
}
