//! Channel mixing utilities (multi-channel to mono conversion)

/// Downmix interleaved multi-channel samples to mono by averaging channels
///
/// A trailing partial frame is dropped.
///
/// # Example
///
/// ```
/// use tonecheck::preprocessing::channel_mixer::downmix_interleaved;
///
/// let stereo = [1.0f32, 0.0, 0.5, 0.5];
/// assert_eq!(downmix_interleaved(&stereo, 2), vec![0.5, 0.5]);
/// ```
pub fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        n => interleaved
            .chunks_exact(n)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_passthrough() {
        let samples = vec![0.1f32, -0.2, 0.3];
        assert_eq!(downmix_interleaved(&samples, 1), samples);
    }

    #[test]
    fn test_stereo_average() {
        let samples = vec![1.0f32, -1.0, 0.4, 0.2];
        let mono = downmix_interleaved(&samples, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.0).abs() < 1e-7);
        assert!((mono[1] - 0.3).abs() < 1e-7);
    }

    #[test]
    fn test_partial_frame_dropped() {
        let samples = vec![0.3f32, 0.3, 0.3, 0.6, 0.6, 0.6, 0.9];
        assert_eq!(downmix_interleaved(&samples, 3).len(), 2);
        assert!(downmix_interleaved(&samples, 0).is_empty());
    }
}
