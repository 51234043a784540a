//! Audio I/O modules
//!
//! Decoding with Symphonia, sample-rate conversion and windowed buffering.

pub mod decoder;
pub mod resample;
pub mod sample_buffer;

use crate::error::AnalysisError;
use std::path::Path;

/// Decode a file to mono samples, resampling to `target_rate` when given
///
/// Returns the samples and their effective sample rate.
pub fn load_audio(
    path: &Path,
    target_rate: Option<u32>,
) -> Result<(Vec<f32>, u32), AnalysisError> {
    let (samples, native_rate) = decoder::decode_audio(path)?;

    match target_rate {
        Some(rate) if rate != native_rate => {
            log::debug!("Resampling {} Hz -> {} Hz", native_rate, rate);
            let resampled = resample::resample(&samples, native_rate, rate)?;
            Ok((resampled, rate))
        }
        _ => Ok((samples, native_rate)),
    }
}
