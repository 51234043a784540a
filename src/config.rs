//! Configuration parameters for tone checking

use crate::error::AnalysisError;
use crate::plot::FrequencyScale;
use crate::preprocessing::normalization::NormalizationMethod;

/// When the spectrogram image is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotTrigger {
    /// Never render
    Never,
    /// Render only when the verdict is FAIL
    OnFail,
    /// Render after every run
    Always,
}

impl PlotTrigger {
    /// Whether a run with the given outcome should be plotted
    pub fn should_plot(self, failed: bool) -> bool {
        match self {
            PlotTrigger::Never => false,
            PlotTrigger::OnFail => failed,
            PlotTrigger::Always => true,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Input
    /// Rate the decoded clip is resampled to (default: Some(48000))
    /// `None` keeps the file's native sample rate
    pub target_sample_rate: Option<u32>,

    /// Normalization applied before the transform (default: Peak)
    pub normalization: NormalizationMethod,

    // STFT parameters
    /// FFT size in samples (default: 1024)
    /// Larger sizes resolve narrower frequencies
    pub fft_size: usize,

    /// Hop length in samples (default: 512)
    pub hop_size: usize,

    // Detection
    /// Frames excluded at the end of the clip (default: 8)
    /// Start and end of a capture naturally show cut-in/cut-out transients
    pub frame_skip: usize,

    /// Bin magnitude above which out-of-band energy is an error (default: 0.15)
    pub energy_threshold: f32,

    /// Squared frame-energy deviation from the mean that flags a frame (default: 9.0)
    /// Raise to e.g. 100.0 when the capture is not a pure sine (analog sims, effects)
    pub max_delta_energy_sqr: f32,

    /// Multiple of the fundamental above which energy is out of band (default: 4.0)
    pub harmonic_multiple: f32,

    // Presentation
    /// When to render the spectrogram image (default: Never)
    pub plot_trigger: PlotTrigger,

    /// Frequency axis of the rendered spectrogram (default: Log)
    pub plot_scale: FrequencyScale,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: Some(48_000),
            normalization: NormalizationMethod::Peak,
            fft_size: 1024,
            hop_size: 512,
            frame_skip: 8,
            energy_threshold: 0.15,
            max_delta_energy_sqr: 9.0,
            harmonic_multiple: 4.0,
            plot_trigger: PlotTrigger::Never,
            plot_scale: FrequencyScale::Log,
        }
    }
}

impl AnalysisConfig {
    /// Preset for captures analysed at their recorded level
    ///
    /// Skips peak normalization and uses the looser 0.2 energy threshold.
    pub fn unnormalized() -> Self {
        Self {
            normalization: NormalizationMethod::None,
            energy_threshold: 0.2,
            ..Self::default()
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.fft_size < 2 {
            return Err(AnalysisError::Usage(format!(
                "FFT size must be >= 2, got {}",
                self.fft_size
            )));
        }

        if self.hop_size == 0 || self.hop_size > self.fft_size {
            return Err(AnalysisError::Usage(format!(
                "Hop size must be in 1..={}, got {}",
                self.fft_size, self.hop_size
            )));
        }

        if self.target_sample_rate == Some(0) {
            return Err(AnalysisError::Usage(
                "Target sample rate must be > 0".to_string(),
            ));
        }

        if !self.energy_threshold.is_finite() || self.energy_threshold < 0.0 {
            return Err(AnalysisError::Usage(format!(
                "Energy threshold must be a finite value >= 0, got {}",
                self.energy_threshold
            )));
        }

        if !self.max_delta_energy_sqr.is_finite() || self.max_delta_energy_sqr < 0.0 {
            return Err(AnalysisError::Usage(format!(
                "Squared energy deviation threshold must be a finite value >= 0, got {}",
                self.max_delta_energy_sqr
            )));
        }

        if !self.harmonic_multiple.is_finite() || self.harmonic_multiple <= 0.0 {
            return Err(AnalysisError::Usage(format!(
                "Harmonic multiple must be > 0, got {}",
                self.harmonic_multiple
            )));
        }

        Ok(())
    }
}
