//! Frequency-ratio conversion applied between decoding and WAV export.
//!
//! Three methods mirror the choices offered by the web UI. Only `Speed`
//! actually moves the pitch; `Resample` changes the sample rate while
//! keeping pitch and tempo, and `Pitch` passes audio through unchanged
//! because no tempo-preserving pitch shifter is implemented.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::audio::DecodedAudio;
use crate::dsp::resample::{resample_to, varispeed};
use crate::error::{AudioError, ConvertError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMethod {
    /// Keep tempo, change pitch. Currently a passthrough.
    #[default]
    Pitch,
    /// Play back at `ratio` speed: pitch and tempo both change.
    Speed,
    /// Render at `sample_rate * ratio` with the same frame count.
    Resample,
}

/// Ratios at or below this are rejected.
pub const MIN_RATIO: f64 = 0.25;
/// Largest accepted ratio.
pub const MAX_RATIO: f64 = 4.0;

/// Accepted range is `(MIN_RATIO, MAX_RATIO]`. Outside it the output
/// length of `Speed` is unbounded.
pub fn ratio_in_range(ratio: f64) -> bool {
    ratio.is_finite() && ratio > MIN_RATIO && ratio <= MAX_RATIO
}

/// Apply `method` with frequency `ratio` and return the new audio.
pub fn convert(
    audio: &DecodedAudio,
    ratio: f64,
    method: ConversionMethod,
) -> Result<DecodedAudio, ConvertError> {
    if !ratio_in_range(ratio) {
        return Err(ConvertError::InvalidRatio(ratio));
    }

    let out = match method {
        ConversionMethod::Pitch => {
            warn!("pitch method has no pitch-shifting stage; audio passed through unchanged");
            audio.clone()
        }
        ConversionMethod::Speed => {
            let channels = audio
                .channels()
                .iter()
                .map(|ch| varispeed(ch, ratio))
                .collect();
            DecodedAudio::new(audio.sample_rate(), channels)?
        }
        ConversionMethod::Resample => {
            let dst_rate = (audio.sample_rate() as f64 * ratio).floor() as u32;
            if dst_rate == 0 {
                return Err(AudioError::InvalidSampleRate.into());
            }
            let channels = audio
                .channels()
                .iter()
                .map(|ch| resample_to(ch, audio.sample_rate(), dst_rate, audio.frame_count()))
                .collect();
            DecodedAudio::new(dst_rate, channels)?
        }
    };

    debug!(
        "{:?} conversion: {} frames @ {} Hz -> {} frames @ {} Hz",
        method,
        audio.frame_count(),
        audio.sample_rate(),
        out.frame_count(),
        out.sample_rate()
    );
    Ok(out)
}
