//! Peak normalization
//!
//! Scales a capture so its largest absolute sample is 1.0. Thresholds in
//! [`crate::AnalysisConfig`] are calibrated against normalized input, so the
//! captured level does not change the verdict.
//!
//! # Example
//!
//! ```
//! use tonecheck::preprocessing::normalization::{normalize, NormalizationMethod};
//!
//! let mut samples = vec![0.0f32, 0.25, -0.5];
//! let metadata = normalize(&mut samples, NormalizationMethod::Peak)?;
//! assert_eq!(samples, vec![0.0, 0.5, -1.0]);
//! assert_eq!(metadata.peak, 0.5);
//! # Ok::<(), tonecheck::AnalysisError>(())
//! ```

use crate::error::AnalysisError;

/// Normalization method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationMethod {
    /// Leave samples untouched
    None,
    /// Divide by the peak absolute sample
    Peak,
}

/// Level metadata returned from normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationMetadata {
    /// Peak absolute sample before normalization
    pub peak: f32,
    /// Linear gain applied
    pub gain: f32,
}

/// Peaks at or below this are treated as silence
const EPSILON: f32 = 1e-10;

fn normalize_peak(samples: &mut [f32]) -> NormalizationMetadata {
    let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);

    if peak <= EPSILON {
        log::warn!("Audio is silent or extremely quiet, cannot normalize");
        return NormalizationMetadata { peak, gain: 1.0 };
    }

    let gain = 1.0 / peak;
    for sample in samples.iter_mut() {
        *sample *= gain;
    }

    log::debug!(
        "Peak normalization: peak={:.4} ({:.2} dBFS), gain={:.4}",
        peak,
        20.0 * peak.log10(),
        gain
    );

    NormalizationMetadata { peak, gain }
}

/// Normalize audio samples in place
///
/// # Errors
///
/// Returns `AnalysisError::Usage` for empty input.
pub fn normalize(
    samples: &mut [f32],
    method: NormalizationMethod,
) -> Result<NormalizationMetadata, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::Usage("Empty audio samples".to_string()));
    }

    match method {
        NormalizationMethod::None => {
            let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);
            Ok(NormalizationMetadata { peak, gain: 1.0 })
        }
        NormalizationMethod::Peak => Ok(normalize_peak(samples)),
    }
}
