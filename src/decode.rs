//! Decoder boundary — raw file bytes in, `DecodedAudio` out.
//!
//! The browser build gets its decoded audio from the host; native hosts
//! can enable the `decode` feature for WAV (hound) and MP3 (minimp3).

use crate::audio::DecodedAudio;
use crate::error::DecodeError;

pub trait AudioDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, DecodeError>;
}

#[cfg(feature = "decode")]
pub use standard::StandardDecoder;

#[cfg(feature = "decode")]
mod standard {
    use std::io::Cursor;

    use log::debug;

    use super::AudioDecoder;
    use crate::audio::DecodedAudio;
    use crate::error::DecodeError;

    /// Sniffs the container and decodes WAV or MP3.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StandardDecoder;

    impl AudioDecoder for StandardDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, DecodeError> {
            if bytes.is_empty() {
                return Err(DecodeError::Empty);
            }
            if is_wav(bytes) {
                decode_wav(bytes)
            } else if is_mp3(bytes) {
                decode_mp3(bytes)
            } else {
                Err(DecodeError::UnsupportedFormat)
            }
        }
    }

    fn is_wav(bytes: &[u8]) -> bool {
        bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
    }

    fn is_mp3(bytes: &[u8]) -> bool {
        let frame_sync = bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0;
        bytes.starts_with(b"ID3") || frame_sync
    }

    fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio, DecodeError> {
        let reader = hound::WavReader::new(Cursor::new(bytes))
            .map_err(|e| DecodeError::Corrupt(e.to_string()))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| DecodeError::Corrupt(e.to_string()))?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| DecodeError::Corrupt(e.to_string()))?
            }
        };

        debug!(
            "decoded WAV: {} Hz, {} ch, {}-bit, {} samples",
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            samples.len()
        );
        DecodedAudio::from_interleaved(spec.sample_rate, spec.channels, &samples)
            .map_err(|e| DecodeError::Corrupt(e.to_string()))
    }

    fn decode_mp3(bytes: &[u8]) -> Result<DecodedAudio, DecodeError> {
        let mut decoder = minimp3::Decoder::new(Cursor::new(bytes));
        let mut samples = Vec::new();
        let mut format: Option<(u32, u16)> = None;

        loop {
            match decoder.next_frame() {
                Ok(frame) => {
                    let frame_format = (frame.sample_rate as u32, frame.channels as u16);
                    match format {
                        None => format = Some(frame_format),
                        // Mid-stream format changes are not representable
                        Some(f) if f != frame_format => {
                            return Err(DecodeError::Corrupt(format!(
                                "stream format changed from {f:?} to {frame_format:?}"
                            )));
                        }
                        Some(_) => {}
                    }
                    samples.extend(frame.data.iter().map(|&s| s as f32 / 32768.0));
                }
                Err(minimp3::Error::Eof) => break,
                Err(minimp3::Error::SkippedData) => continue,
                Err(e) => return Err(DecodeError::Corrupt(format!("{e:?}"))),
            }
        }

        let (sample_rate, channels) =
            format.ok_or_else(|| DecodeError::Corrupt("no MPEG audio frames found".to_string()))?;
        debug!(
            "decoded MP3: {} Hz, {} ch, {} samples",
            sample_rate,
            channels,
            samples.len()
        );
        DecodedAudio::from_interleaved(sample_rate, channels, &samples)
            .map_err(|e| DecodeError::Corrupt(e.to_string()))
    }

}
