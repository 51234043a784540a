//! Spectrogram image rendering
//!
//! Renders the decibel view of a [`Spectrogram`] as an 8-bit RGB PNG: one
//! column per frame, one row per output bin, low frequencies at the bottom.

use crate::error::AnalysisError;
use crate::spectrogram::Spectrogram;
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Dynamic range shown in the image
const TOP_DB: f32 = 80.0;

/// Lowest top-of-scale level (unit magnitude)
const REFERENCE_DB: f32 = 0.0;

/// Colour stops from quietest to loudest
const PALETTE: [[u8; 3]; 5] = [
    [0, 0, 0],
    [40, 20, 120],
    [190, 40, 80],
    [250, 170, 30],
    [255, 255, 230],
];

/// Frequency axis of the rendered image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyScale {
    /// One row per bin
    Linear,
    /// Rows spaced logarithmically from bin 1 to the Nyquist bin
    Log,
}

/// RGB pixels of a rendered spectrogram
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramImage {
    /// Width in pixels (number of frames)
    pub width: u32,
    /// Height in pixels (number of bins)
    pub height: u32,
    /// Row-major RGB triples, top row first
    pub pixels: Vec<u8>,
}

/// Map a level in `0.0..=1.0` onto the palette
fn colormap(level: f32) -> [u8; 3] {
    let pos = level.clamp(0.0, 1.0) * (PALETTE.len() - 1) as f32;
    let lo = (pos.floor() as usize).min(PALETTE.len() - 2);
    let t = pos - lo as f32;
    let (a, b) = (PALETTE[lo], PALETTE[lo + 1]);

    let mut rgb = [0u8; 3];
    for (c, out) in rgb.iter_mut().enumerate() {
        *out = (a[c] as f32 + t * (b[c] as f32 - a[c] as f32)).round() as u8;
    }
    rgb
}

/// Spectrogram bin drawn on image row `row` (0 = top)
fn row_to_bin(row: usize, height: usize, num_bins: usize, scale: FrequencyScale) -> usize {
    let from_bottom = height - 1 - row;
    match scale {
        FrequencyScale::Linear => from_bottom,
        FrequencyScale::Log => {
            if height < 2 || num_bins < 3 {
                return from_bottom;
            }
            let last = (num_bins - 1) as f64;
            let t = from_bottom as f64 / (height - 1) as f64;
            (last.powf(t).round() as usize).clamp(1, num_bins - 1)
        }
    }
}

/// Render the decibel spectrogram to RGB pixels
///
/// # Errors
///
/// Returns `AnalysisError::Usage` if the spectrogram has no frames.
pub fn render_spectrogram(
    spectrogram: &Spectrogram,
    scale: FrequencyScale,
) -> Result<SpectrogramImage, AnalysisError> {
    let width = spectrogram.num_frames();
    let height = spectrogram.num_bins();
    if width == 0 || height == 0 {
        return Err(AnalysisError::Usage("Cannot plot an empty spectrogram".to_string()));
    }

    let db = spectrogram.to_db(TOP_DB);
    // Never scale relative to a peak below 0 dB, so silence renders dark
    let reference = db.iter().copied().fold(REFERENCE_DB, f32::max);
    let floor = reference - TOP_DB;

    let mut pixels = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        let bin = row_to_bin(row, height, height, scale);
        for frame in 0..width {
            let level = (db[frame * height + bin] - floor) / TOP_DB;
            pixels.extend_from_slice(&colormap(level));
        }
    }

    Ok(SpectrogramImage {
        width: width as u32,
        height: height as u32,
        pixels,
    })
}

/// Encode an RGB image as PNG into `writer`
fn encode_png_to_writer<W: Write>(
    image: &SpectrogramImage,
    writer: W,
) -> Result<(), png::EncodingError> {
    let mut encoder = Encoder::new(writer, image.width, image.height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(Compression::Default);
    encoder.set_filter(FilterType::NoFilter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&image.pixels)?;
    Ok(())
}

/// Render and encode a spectrogram as PNG bytes
pub fn encode_spectrogram_png(
    spectrogram: &Spectrogram,
    scale: FrequencyScale,
) -> Result<Vec<u8>, AnalysisError> {
    let image = render_spectrogram(spectrogram, scale)?;
    let mut buffer = Vec::new();
    encode_png_to_writer(&image, &mut buffer)
        .map_err(|e| AnalysisError::ProcessingError(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer)
}

/// Render a spectrogram and write it to `path` as PNG
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` if the file cannot be created or
/// the image cannot be encoded.
pub fn render_spectrogram_png(
    spectrogram: &Spectrogram,
    scale: FrequencyScale,
    path: &Path,
) -> Result<(), AnalysisError> {
    let image = render_spectrogram(spectrogram, scale)?;

    let file = File::create(path).map_err(|e| {
        AnalysisError::ProcessingError(format!("Cannot create {}: {}", path.display(), e))
    })?;
    encode_png_to_writer(&image, BufWriter::new(file))
        .map_err(|e| AnalysisError::ProcessingError(format!("PNG encoding failed: {}", e)))?;

    log::debug!(
        "Wrote {}x{} spectrogram to {}",
        image.width,
        image.height,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_spectrogram() -> Spectrogram {
        // 9 bins x 6 frames, one loud bin
        let mut mags = vec![vec![0.0f32; 6]; 9];
        mags[4] = vec![10.0; 6];
        Spectrogram::from_magnitudes(&mags, 1600, 16, 8, 48).unwrap()
    }

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(colormap(0.0), PALETTE[0]);
        assert_eq!(colormap(1.0), PALETTE[4]);
        assert_eq!(colormap(-3.0), PALETTE[0]);
        assert_eq!(colormap(0.25), PALETTE[1]);
    }

    #[test]
    fn test_row_to_bin() {
        assert_eq!(row_to_bin(0, 9, 9, FrequencyScale::Linear), 8);
        assert_eq!(row_to_bin(8, 9, 9, FrequencyScale::Linear), 0);
        assert_eq!(row_to_bin(0, 513, 513, FrequencyScale::Log), 512);
        assert_eq!(row_to_bin(512, 513, 513, FrequencyScale::Log), 1);
    }

    #[test]
    fn test_loud_bin_is_brightest() {
        let image = render_spectrogram(&test_spectrogram(), FrequencyScale::Linear).unwrap();
        assert_eq!((image.width, image.height), (6, 9));
        assert_eq!(image.pixels.len(), 6 * 9 * 3);

        // bin 4 is row 4 from the top
        let row = 4 * 6 * 3;
        assert_eq!(&image.pixels[row..row + 3], &PALETTE[4]);
        assert_eq!(&image.pixels[0..3], &PALETTE[0]);
    }

    #[test]
    fn test_silence_renders_dark() {
        let mags = vec![vec![0.0f32; 6]; 9];
        let spec = Spectrogram::from_magnitudes(&mags, 1600, 16, 8, 48).unwrap();
        let image = render_spectrogram(&spec, FrequencyScale::Log).unwrap();

        assert!(image.pixels.chunks_exact(3).all(|px| px == PALETTE[0]));
    }

    #[test]
    fn test_quiet_content_is_not_full_scale() {
        // Peak at -20 dB stays a quarter of the way up the palette
        let mut mags = vec![vec![0.0f32; 6]; 9];
        mags[4] = vec![0.1; 6];
        let spec = Spectrogram::from_magnitudes(&mags, 1600, 16, 8, 48).unwrap();
        let image = render_spectrogram(&spec, FrequencyScale::Linear).unwrap();

        let row = 4 * 6 * 3;
        assert_eq!(&image.pixels[row..row + 3], &colormap(0.75));
        assert_ne!(&image.pixels[row..row + 3], &PALETTE[4]);
    }

    #[test]
    fn test_png_encoding() {
        let spec = test_spectrogram();
        let bytes = encode_spectrogram_png(&spec, FrequencyScale::Log).unwrap();
        assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

        let again = encode_spectrogram_png(&spec, FrequencyScale::Log).unwrap();
        assert_eq!(bytes, again);

        let reader = png::Decoder::new(bytes.as_slice()).read_info().unwrap();
        assert_eq!(reader.info().width, 6);
        assert_eq!(reader.info().height, 9);
    }

    #[test]
    fn test_empty_spectrogram_rejected() {
        let mags = vec![Vec::<f32>::new(); 9];
        let spec = Spectrogram::from_magnitudes(&mags, 1600, 16, 8, 0).unwrap();
        assert!(matches!(
            render_spectrogram(&spec, FrequencyScale::Linear),
            Err(AnalysisError::Usage(_))
        ));
    }
}
