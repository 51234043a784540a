//! Audio decoding using Symphonia

use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::downmix_interleaved;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Outcome of one demuxer read
#[derive(Debug)]
enum Demux<P> {
    Packet(P),
    /// Track list changed; the decoder must be reset
    Reset,
    /// Normal end of stream
    End,
}

/// Classify a demuxer result
///
/// Only an unexpected EOF ends the stream normally. Every other failure is
/// fatal: a clip with missing packets would splice across the gap and hide
/// the dropout the analysis is looking for.
fn demux_step<P>(
    result: Result<P, SymphoniaError>,
    decoded_samples: usize,
) -> Result<Demux<P>, AnalysisError> {
    match result {
        Ok(packet) => Ok(Demux::Packet(packet)),
        Err(SymphoniaError::ResetRequired) => Ok(Demux::Reset),
        Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Ok(Demux::End)
        }
        Err(e) => Err(decoding_error(e, decoded_samples)),
    }
}

fn decoding_error(err: SymphoniaError, decoded_samples: usize) -> AnalysisError {
    AnalysisError::DecodingError(format!(
        "Decoding failed after {} samples: {}",
        decoded_samples, err
    ))
}

/// Decode an audio file to mono PCM samples
///
/// Multi-channel audio is downmixed by averaging channels. A corrupt packet
/// or demuxer failure aborts decoding.
///
/// # Arguments
///
/// * `path` - Path to audio file (WAV, AIFF, FLAC, MP3, Ogg Vorbis, ...)
///
/// # Returns
///
/// Tuple of (samples, sample_rate)
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` if the file cannot be opened, has no
/// supported audio track, contains a corrupt packet, or yields no samples.
pub fn decode_audio(path: &Path) -> Result<(Vec<f32>, u32), AnalysisError> {
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path).map_err(|e| {
        AnalysisError::DecodingError(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("No supported audio tracks found".to_string()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match demux_step(format.next_packet(), samples.len())? {
            Demux::Packet(packet) => packet,
            Demux::Reset => {
                decoder.reset();
                continue;
            }
            Demux::End => break,
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| decoding_error(e, samples.len()))?;
        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend(downmix_interleaved(buf.samples(), spec.channels.count()));
    }

    let sample_rate = sample_rate
        .ok_or_else(|| AnalysisError::DecodingError("Unknown sample rate".to_string()))?;

    if samples.is_empty() {
        return Err(AnalysisError::DecodingError(format!(
            "No audio samples decoded from {}",
            path.display()
        )));
    }

    log::debug!("Decoded {} samples at {} Hz", samples.len(), sample_rate);

    Ok((samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_stream() {
        let eof = SymphoniaError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "end of stream",
        ));
        assert!(matches!(demux_step::<()>(Err(eof), 100), Ok(Demux::End)));
        assert!(matches!(
            demux_step::<()>(Err(SymphoniaError::ResetRequired), 100),
            Ok(Demux::Reset)
        ));
        assert!(matches!(demux_step(Ok(7u8), 0), Ok(Demux::Packet(7))));
    }

    #[test]
    fn test_corrupt_stream_is_fatal() {
        let truncated = SymphoniaError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "bad chunk",
        ));
        assert!(matches!(
            demux_step::<()>(Err(truncated), 4096),
            Err(AnalysisError::DecodingError(_))
        ));

        let corrupt = demux_step::<()>(Err(SymphoniaError::DecodeError("invalid frame")), 4096);
        match corrupt {
            Err(AnalysisError::DecodingError(msg)) => {
                assert!(msg.contains("4096"));
                assert!(msg.contains("invalid frame"));
            }
            other => panic!("expected a decoding error, got {:?}", other),
        }

        let err = decoding_error(SymphoniaError::DecodeError("bad packet"), 512);
        assert!(matches!(err, AnalysisError::DecodingError(_)));
    }

    #[test]
    fn test_missing_file() {
        let result = decode_audio(Path::new("/nonexistent/clip.wav"));
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }
}
