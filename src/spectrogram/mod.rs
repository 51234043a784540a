//! Magnitude spectrogram
//!
//! The spectrogram is the hand-off point between the transform adapter and
//! the detection passes. It is built once per clip and only read afterwards.
//!
//! Magnitudes are addressed as `(bin, frame)`; bin 0 is DC. Frames are stored
//! contiguously so the frame-major scans in [`crate::features`] and
//! [`crate::analysis`] read memory in order.

pub mod stft;

use crate::error::AnalysisError;

/// Magnitude spectrogram with its frequency and time axes
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// Frame-major magnitudes: `data[frame * num_bins + bin]`
    data: Vec<f32>,
    num_bins: usize,
    num_frames: usize,
    bin_frequencies: Vec<f32>,
    frame_times: Vec<f32>,
    sample_rate: u32,
    fft_size: usize,
    hop_size: usize,
    num_samples: usize,
}

impl Spectrogram {
    /// Compute the STFT magnitude spectrogram of mono samples
    ///
    /// See [`stft::magnitude_frames`] for the transform conventions.
    pub fn compute(
        samples: &[f32],
        sample_rate: u32,
        fft_size: usize,
        hop_size: usize,
    ) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::Usage("Invalid sample rate".to_string()));
        }

        let frames = stft::magnitude_frames(samples, fft_size, hop_size)?;
        let num_bins = fft_size / 2 + 1;
        let num_frames = frames.len();
        let data: Vec<f32> = frames.into_iter().flatten().collect();

        log::debug!(
            "Spectrogram: {} frames x {} bins (fft={}, hop={})",
            num_frames,
            num_bins,
            fft_size,
            hop_size
        );

        Ok(Self::assemble(
            data,
            num_bins,
            num_frames,
            sample_rate,
            fft_size,
            hop_size,
            samples.len(),
        ))
    }

    /// Build a spectrogram from an externally computed magnitude matrix
    ///
    /// `magnitudes` is indexed `[bin][frame]` and must hold `fft_size / 2 + 1`
    /// rows of equal length with finite, non-negative values.
    pub fn from_magnitudes(
        magnitudes: &[Vec<f32>],
        sample_rate: u32,
        fft_size: usize,
        hop_size: usize,
        num_samples: usize,
    ) -> Result<Self, AnalysisError> {
        if sample_rate == 0 || fft_size < 2 || hop_size == 0 {
            return Err(AnalysisError::Usage(format!(
                "Invalid spectrogram parameters: sr={}, fft={}, hop={}",
                sample_rate, fft_size, hop_size
            )));
        }

        let num_bins = fft_size / 2 + 1;
        if magnitudes.len() != num_bins {
            return Err(AnalysisError::Usage(format!(
                "Expected {} bins for FFT size {}, got {}",
                num_bins,
                fft_size,
                magnitudes.len()
            )));
        }

        let num_frames = magnitudes[0].len();
        if magnitudes.iter().any(|row| row.len() != num_frames) {
            return Err(AnalysisError::Usage(
                "Spectrogram rows have unequal frame counts".to_string(),
            ));
        }

        if magnitudes
            .iter()
            .flatten()
            .any(|&m| !m.is_finite() || m < 0.0)
        {
            return Err(AnalysisError::Usage(
                "Spectrogram magnitudes must be finite and non-negative".to_string(),
            ));
        }

        let mut data = vec![0.0f32; num_bins * num_frames];
        for (bin, row) in magnitudes.iter().enumerate() {
            for (frame, &m) in row.iter().enumerate() {
                data[frame * num_bins + bin] = m;
            }
        }

        Ok(Self::assemble(
            data,
            num_bins,
            num_frames,
            sample_rate,
            fft_size,
            hop_size,
            num_samples,
        ))
    }

    fn assemble(
        data: Vec<f32>,
        num_bins: usize,
        num_frames: usize,
        sample_rate: u32,
        fft_size: usize,
        hop_size: usize,
        num_samples: usize,
    ) -> Self {
        let bin_frequencies = (0..num_bins)
            .map(|b| (b as f64 * sample_rate as f64 / fft_size as f64) as f32)
            .collect();
        let frame_times = (0..num_frames)
            .map(|f| (f as f64 * hop_size as f64 / sample_rate as f64) as f32)
            .collect();

        Self {
            data,
            num_bins,
            num_frames,
            bin_frequencies,
            frame_times,
            sample_rate,
            fft_size,
            hop_size,
            num_samples,
        }
    }

    /// Magnitude at `(bin, frame)`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn magnitude(&self, bin: usize, frame: usize) -> f32 {
        assert!(bin < self.num_bins && frame < self.num_frames);
        self.data[frame * self.num_bins + bin]
    }

    /// All bin magnitudes of one frame, DC first
    pub fn frame(&self, frame: usize) -> &[f32] {
        let start = frame * self.num_bins;
        &self.data[start..start + self.num_bins]
    }

    /// Number of frequency bins (`fft_size / 2 + 1`)
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Number of time frames
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Bin index → frequency in Hz
    pub fn bin_frequencies(&self) -> &[f32] {
        &self.bin_frequencies
    }

    /// Frame index → time in seconds
    pub fn frame_times(&self) -> &[f32] {
        &self.frame_times
    }

    /// Sample rate of the transformed signal
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// FFT size used for the transform
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Hop length used for the transform
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of samples in the transformed signal
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Decibel view of the magnitudes, frame-major like [`Spectrogram::frame`]
    ///
    /// `20 * log10(max(1e-5, m))`, floored at `max_db - top_db`.
    pub fn to_db(&self, top_db: f32) -> Vec<f32> {
        const AMIN: f32 = 1e-5;

        let mut db: Vec<f32> = self
            .data
            .iter()
            .map(|&m| 20.0 * m.max(AMIN).log10())
            .collect();

        let max_db = db.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let floor = max_db - top_db.abs();
        for v in db.iter_mut() {
            *v = v.max(floor);
        }
        db
    }
}
