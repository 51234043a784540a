//! Sample-rate conversion
//!
//! Cubic (Hermite) interpolation between neighbouring samples. When the
//! target rate is lower, the input is first band-limited with a
//! windowed-sinc low-pass so content above the new Nyquist frequency is
//! removed instead of folding back into the analysed band.

use crate::error::AnalysisError;
use std::f64::consts::PI;

/// Low-pass cutoff as a fraction of the target sample rate
const CUTOFF_FRACTION: f64 = 0.45;

/// Filter half-length per unit of decimation ratio
const TAPS_PER_RATIO: usize = 128;

/// Resample `input` from `from_rate` to `to_rate`
///
/// Output length is `round(len * to_rate / from_rate)`. Equal rates return a
/// copy of the input. Downsampling applies an anti-alias low-pass at
/// `0.45 * to_rate` before interpolating.
pub fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AnalysisError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(AnalysisError::Usage(format!(
            "Invalid resample rates: {} -> {}",
            from_rate, to_rate
        )));
    }

    if from_rate == to_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let filtered;
    let input = if to_rate < from_rate {
        let ratio = (from_rate as f64 / to_rate as f64).ceil() as usize;
        let taps = design_lowpass(
            CUTOFF_FRACTION * to_rate as f64 / from_rate as f64,
            2 * TAPS_PER_RATIO * ratio + 1,
        );
        log::debug!(
            "Anti-alias low-pass: {} taps, cutoff {:.0} Hz",
            taps.len(),
            CUTOFF_FRACTION * to_rate as f64
        );
        filtered = convolve_centered(input, &taps);
        filtered.as_slice()
    } else {
        input
    };

    let step = from_rate as f64 / to_rate as f64;
    let out_len = (input.len() as f64 / step).round() as usize;
    let last = input.len() - 1;
    let at = |i: isize| input[i.clamp(0, last as isize) as usize];

    let output = (0..out_len)
        .map(|n| {
            let t = n as f64 * step;
            let idx = t.floor() as isize;
            let frac = (t - idx as f64) as f32;
            hermite(frac, at(idx - 1), at(idx), at(idx + 1), at(idx + 2))
        })
        .collect();

    Ok(output)
}

fn hermite(t: f32, y0: f32, y1: f32, y2: f32, y3: f32) -> f32 {
    let c0 = y1;
    let c1 = 0.5 * (y2 - y0);
    let c2 = y0 - 2.5 * y1 + 2.0 * y2 - 0.5 * y3;
    let c3 = 0.5 * (y3 - y0) + 1.5 * (y1 - y2);
    ((c3 * t + c2) * t + c1) * t + c0
}

/// Blackman-windowed sinc low-pass with unity DC gain
///
/// `cutoff` is the cutoff frequency divided by the sample rate (0..0.5).
/// `num_taps` should be odd so the filter has an integer delay.
fn design_lowpass(cutoff: f64, num_taps: usize) -> Vec<f64> {
    let fc = cutoff.clamp(0.001, 0.499);
    let mid = (num_taps - 1) as f64 / 2.0;
    let span = (num_taps - 1).max(1) as f64;

    let mut taps: Vec<f64> = (0..num_taps)
        .map(|i| {
            let n = i as f64 - mid;
            let sinc = if n.abs() < 1e-10 {
                2.0 * fc
            } else {
                (2.0 * PI * fc * n).sin() / (PI * n)
            };
            let phase = 2.0 * PI * i as f64 / span;
            let window = 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos();
            sinc * window
        })
        .collect();

    let sum: f64 = taps.iter().sum();
    if sum.abs() > 1e-15 {
        for tap in &mut taps {
            *tap /= sum;
        }
    }
    taps
}

/// Zero-phase FIR filtering; samples outside the input count as zero
fn convolve_centered(input: &[f32], taps: &[f64]) -> Vec<f32> {
    let half = taps.len() / 2;
    (0..input.len())
        .map(|i| {
            let lo = half.saturating_sub(i);
            let hi = taps.len().min(input.len() + half - i);
            (lo..hi)
                .map(|k| taps[k] * input[i + k - half] as f64)
                .sum::<f64>() as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, rate: u32, seconds: f64) -> Vec<f32> {
        let n = (rate as f64 * seconds).round() as usize;
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / rate as f64).sin() as f32)
            .collect()
    }

    #[test]
    fn test_identity() {
        let input = sine(440.0, 48000, 0.01);
        assert_eq!(resample(&input, 48000, 48000).unwrap(), input);
    }

    #[test]
    fn test_output_length() {
        let input = sine(440.0, 44100, 1.0);
        let output = resample(&input, 44100, 48000).unwrap();
        assert_eq!(output.len(), 48000);
    }

    #[test]
    fn test_tone_preserved() {
        let input = sine(440.0, 44100, 0.5);
        let output = resample(&input, 44100, 48000).unwrap();
        let expected = sine(440.0, 48000, 0.5);

        // Compare away from the edges
        let max_err = output[100..output.len() - 100]
            .iter()
            .zip(&expected[100..])
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_err < 1e-3, "max interpolation error {}", max_err);
    }

    #[test]
    fn test_lowpass_design() {
        let taps = design_lowpass(0.225, 257);
        assert_eq!(taps.len(), 257);

        let dc_gain: f64 = taps.iter().sum();
        assert!((dc_gain - 1.0).abs() < 1e-9, "DC gain {}", dc_gain);

        for i in 0..taps.len() / 2 {
            assert!((taps[i] - taps[taps.len() - 1 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_downsample_removes_content_above_nyquist() {
        // 30 kHz cannot be represented at 48 kHz and must not fold to 18 kHz
        let input = sine(30_000.0, 96_000, 0.1);
        let output = resample(&input, 96_000, 48_000).unwrap();
        assert_eq!(output.len(), 4800);

        let residual = output[200..output.len() - 200]
            .iter()
            .fold(0.0f32, |m, &x| m.max(x.abs()));
        assert!(residual < 1e-3, "aliased residual {}", residual);
    }

    #[test]
    fn test_downsample_keeps_passband() {
        let input = sine(1_000.0, 96_000, 0.1);
        let output = resample(&input, 96_000, 48_000).unwrap();
        let expected = sine(1_000.0, 48_000, 0.1);

        let max_err = output[200..output.len() - 200]
            .iter()
            .zip(&expected[200..])
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_err < 1e-3, "passband error {}", max_err);
    }

    #[test]
    fn test_convolve_centered_identity() {
        let input = [1.0f32, -2.0, 3.0, 0.5];
        let output = convolve_centered(&input, &[0.0, 1.0, 0.0]);
        assert_eq!(output, input.to_vec());
    }

    #[test]
    fn test_invalid_rate() {
        assert!(resample(&[0.0, 1.0], 0, 48000).is_err());
    }
}
