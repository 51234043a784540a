//! Per-frame energy profile
//!
//! Sums the non-DC bin magnitudes of every frame in the [`FrameWindow`].

use super::FrameWindow;
use crate::spectrogram::Spectrogram;
use serde::{Deserialize, Serialize};

/// Aggregate energy of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameEnergy {
    /// Frame index in the spectrogram
    pub frame: usize,
    /// Frame time in seconds
    pub time_seconds: f32,
    /// Sum of magnitudes over bins `1..`
    pub energy: f32,
}

/// Frame energies of a clip with their grand total
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyProfile {
    /// One entry per analysed frame, in frame order
    pub frames: Vec<FrameEnergy>,
    /// Sum of all frame energies
    pub total: f64,
}

impl EnergyProfile {
    /// Build a profile directly from energy values
    ///
    /// Frames are numbered from 0 with zero timestamps.
    pub fn from_energies(energies: &[f32]) -> Self {
        let frames: Vec<FrameEnergy> = energies
            .iter()
            .enumerate()
            .map(|(frame, &energy)| FrameEnergy {
                frame,
                time_seconds: 0.0,
                energy,
            })
            .collect();
        let total = energies.iter().map(|&e| e as f64).sum();
        Self { frames, total }
    }

    /// Number of analysed frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frame was analysed
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Mean frame energy, `None` for an empty profile
    pub fn mean(&self) -> Option<f64> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.total / self.frames.len() as f64)
        }
    }
}

/// Sum bin magnitudes (DC excluded) for each frame of `window`
pub fn build_energy_profile(spectrogram: &Spectrogram, window: &FrameWindow) -> EnergyProfile {
    let times = spectrogram.frame_times();

    let frames: Vec<FrameEnergy> = window
        .frames()
        .map(|frame| {
            let energy: f64 = spectrogram.frame(frame)[1..].iter().map(|&m| m as f64).sum();
            FrameEnergy {
                frame,
                time_seconds: times[frame],
                energy: energy as f32,
            }
        })
        .collect();

    let total = frames.iter().map(|f| f.energy as f64).sum();

    log::debug!(
        "Energy profile: {} frames, total energy {:.3}",
        frames.len(),
        total
    );

    EnergyProfile { frames, total }
}
