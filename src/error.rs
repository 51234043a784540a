//! Error types for the tone checker

use std::fmt;

/// Errors that can occur while checking a clip
///
/// A FAIL verdict is not an error: detected dropouts and spikes are reported
/// through [`crate::AnomalyReport`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Missing or invalid input path, or an invalid configuration
    Usage(String),

    /// Audio file could not be read or decoded
    DecodingError(String),

    /// Clip too short, or statistics undefined (zero standard deviation)
    DegenerateInput(String),

    /// Failure in a post-analysis stage (e.g. writing the spectrogram image)
    ProcessingError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Usage(msg) => write!(f, "Usage error: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::DegenerateInput(msg) => write!(f, "Degenerate input: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<symphonia::core::errors::Error> for AnalysisError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AnalysisError::DecodingError(err.to_string())
    }
}
