//! Feature extraction modules
//!
//! Reductions of the spectrogram that the detection passes build on:
//! - Fundamental frequency (monotone running-maximum tracker)
//! - Per-frame energy profile
//!
//! Both operate on the same [`FrameWindow`], which drops the boundary frames
//! where cut-in and cut-out transients are expected.

pub mod energy;
pub mod fundamental;

use crate::error::AnalysisError;
use std::ops::Range;

/// Leading frames excluded from every pass
const LEAD_IN_FRAMES: usize = 2;

/// Range of frames the detection passes look at
///
/// For `T` total frames and a skip count `S` this is `[2, T - S)`. The
/// smallest clip that yields a window has `S + 3` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameWindow {
    start: usize,
    end: usize,
}

impl FrameWindow {
    /// Window for a clip with `total_frames` frames
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DegenerateInput` if fewer than
    /// `frame_skip + 3` frames are available.
    pub fn new(total_frames: usize, frame_skip: usize) -> Result<Self, AnalysisError> {
        let required = frame_skip + LEAD_IN_FRAMES + 1;
        if total_frames < required {
            return Err(AnalysisError::DegenerateInput(format!(
                "Clip too short: {} frames, need at least {} (frame skip {})",
                total_frames, required, frame_skip
            )));
        }

        Ok(Self {
            start: LEAD_IN_FRAMES,
            end: total_frames - frame_skip,
        })
    }

    /// Frame indices in scan order
    pub fn frames(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of frames in the window
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; a window holds at least one frame
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Fold a new frequency into a running estimate
///
/// The first observation is taken as-is; later ones are averaged with the
/// current estimate, so recent observations weigh more.
pub(crate) fn running_average(current: Option<f32>, frequency: f32) -> f32 {
    match current {
        None => frequency,
        Some(prev) => (prev + frequency) * 0.5,
    }
}
