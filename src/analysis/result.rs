//! Analysis result types

use super::harmonic::HarmonicError;
use super::metadata::ClipSummary;
use super::variance::VarianceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final classification of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum Verdict {
    /// No variance or harmonic errors
    Pass,
    /// At least one error of either kind
    Fail {
        /// Number of frames with deviating energy
        variance_errors: usize,
        /// Number of frames with out-of-band energy
        harmonic_errors: usize,
    },
}

impl Verdict {
    /// Classify from the two error counts
    pub fn from_counts(variance_errors: usize, harmonic_errors: usize) -> Self {
        if variance_errors > 0 || harmonic_errors > 0 {
            Verdict::Fail {
                variance_errors,
                harmonic_errors,
            }
        } else {
            Verdict::Pass
        }
    }

    /// True for [`Verdict::Pass`]
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail {
                variance_errors,
                harmonic_errors,
            } => write!(
                f,
                "FAIL: {} variance errors, {} harmonic errors",
                variance_errors, harmonic_errors
            ),
        }
    }
}

/// Complete anomaly report for one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Clip and spectrogram shape
    pub clip: ClipSummary,

    /// Approximate fundamental in Hz
    pub fundamental_hz: f32,

    /// Frequency above which energy is out of band
    pub max_allowed_hz: f32,

    /// Magnitude above which out-of-band energy is an error
    pub energy_threshold: f32,

    /// Mean frame energy
    pub average_frame_energy: f32,

    /// Population standard deviation of frame energy
    pub energy_std_dev: f32,

    /// Largest flagged deviation from the mean frame energy
    pub max_energy_deviation: f32,

    /// `max_energy_deviation / energy_std_dev`
    pub deviation_to_std_ratio: f32,

    /// Frames with deviating energy
    pub variance_errors: Vec<VarianceError>,

    /// Frames with out-of-band energy
    pub harmonic_errors: Vec<HarmonicError>,

    /// Highest offending frequency in Hz (0.0 if none)
    pub max_frequency: f32,

    /// Largest offending magnitude (0.0 if none)
    pub max_energy: f32,

    /// Frequency paired with `max_energy`
    pub max_energy_frequency: f32,

    /// PASS / FAIL
    pub verdict: Verdict,
}

impl AnomalyReport {
    /// Number of variance errors
    pub fn variance_error_count(&self) -> usize {
        self.variance_errors.len()
    }

    /// Number of harmonic errors
    pub fn harmonic_error_count(&self) -> usize {
        self.harmonic_errors.len()
    }
}
