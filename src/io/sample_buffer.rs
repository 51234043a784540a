//! Sample windowing for the STFT

/// Buffer yielding overlapping analysis windows
///
/// Windows start every `hop` samples; a window is only produced while it
/// fits entirely inside the buffer.
#[derive(Debug)]
pub struct SampleBuffer {
    /// Buffer data
    data: Vec<f32>,
    /// Start of the next window
    position: usize,
    /// Distance between window starts
    hop: usize,
}

impl SampleBuffer {
    /// Create a buffer over `samples` with `pad` zeros on either side
    ///
    /// With `pad = window_size / 2` every window is centred on a multiple of
    /// `hop` in the original signal.
    pub fn centered(samples: &[f32], pad: usize, hop: usize) -> Self {
        let mut data = Vec::with_capacity(samples.len() + 2 * pad);
        data.resize(pad, 0.0);
        data.extend_from_slice(samples);
        data.resize(samples.len() + 2 * pad, 0.0);
        Self {
            data,
            position: 0,
            hop: hop.max(1),
        }
    }

    /// Number of windows of `window_size` this buffer yields from the start
    pub fn window_count(&self, window_size: usize) -> usize {
        if window_size > self.data.len() {
            0
        } else {
            (self.data.len() - window_size) / self.hop + 1
        }
    }

    /// Get next window of samples
    pub fn next_window(&mut self, window_size: usize) -> Option<&[f32]> {
        if self.position + window_size > self.data.len() {
            return None;
        }

        let start = self.position;
        self.position += self.hop;
        Some(&self.data[start..start + window_size])
    }
}
