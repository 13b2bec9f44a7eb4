//! Session — one loaded file and the conversions derived from it.
//!
//! A `Session` is built once per file and never mutated. Converting
//! produces a separate `Conversion`; a failed conversion returns an error
//! and leaves the session exactly as it was.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::{debug, warn};
use serde::Serialize;

use crate::audio::DecodedAudio;
use crate::config::{ConverterConfig, EXPORT_SUFFIX};
use crate::convert::convert;
use crate::decode::AudioDecoder;
use crate::dsp::wav::{WavContainer, empty_container, encode};
use crate::error::SessionError;
use crate::format::{format_file_size, format_time};

/// What the host knows about an input file before reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

/// Reject oversized and non-audio files before any decoding happens.
pub fn validate_source(source: &SourceFile, config: &ConverterConfig) -> Result<(), SessionError> {
    if source.size > config.max_file_size {
        return Err(SessionError::FileTooLarge {
            size: source.size,
            limit: config.max_file_size,
        });
    }
    if !source.mime_type.starts_with("audio/") {
        return Err(SessionError::UnsupportedMimeType(source.mime_type.clone()));
    }
    Ok(())
}

/// Strip the last extension from `name` and append `_432Hz.wav`.
pub fn export_file_name(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 && !name[idx + 1..].is_empty() && !name[idx..].contains('/') => {
            &name[..idx]
        }
        _ => name,
    };
    format!("{stem}{EXPORT_SUFFIX}")
}

/// A playable `data:` URL for the browser preview element.
pub fn preview_data_url(wav: &WavContainer) -> String {
    format!(
        "data:{};base64,{}",
        WavContainer::MIME_TYPE,
        STANDARD.encode(wav.as_bytes())
    )
}

/// Encode `result`, or fall back to a header-only container when an
/// upstream stage failed. The error is handed back for separate reporting.
pub fn encode_or_empty<E: std::fmt::Display>(
    result: Result<DecodedAudio, E>,
    sample_rate: u32,
    channels: u16,
) -> (WavContainer, Option<E>) {
    match result {
        Ok(audio) => (encode(&audio), None),
        Err(e) => {
            warn!("substituting empty WAV container: {e}");
            (empty_container(sample_rate, channels), Some(e))
        }
    }
}

/// WAV bytes plus the message of the failure that emptied them, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackExport {
    pub wav: Vec<u8>,
    pub error: Option<String>,
}

/// Convert and encode `audio`. Never fails: on any conversion or config
/// error the export is a header-only WAV in the source's format, and the
/// failure comes back as `EncodingProducedEmptyContainer`.
pub fn convert_or_empty(
    audio: &DecodedAudio,
    config: &ConverterConfig,
) -> (WavContainer, Option<SessionError>) {
    let result = config
        .validate()
        .map_err(SessionError::from)
        .and_then(|()| convert(audio, config.ratio, config.method).map_err(SessionError::from));
    let (wav, err) = encode_or_empty(result, audio.sample_rate(), audio.channel_count());
    (
        wav,
        err.map(|e| SessionError::EncodingProducedEmptyContainer(e.to_string())),
    )
}

impl FallbackExport {
    pub fn new(audio: &DecodedAudio, config: &ConverterConfig) -> Self {
        let (wav, err) = convert_or_empty(audio, config);
        FallbackExport {
            wav: wav.into_bytes(),
            error: err.map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    source: SourceFile,
    audio: DecodedAudio,
}

impl Session {
    /// Validate the file, then decode it.
    pub fn load(
        source: SourceFile,
        bytes: &[u8],
        decoder: &dyn AudioDecoder,
        config: &ConverterConfig,
    ) -> Result<Session, SessionError> {
        validate_source(&source, config)?;
        let audio = decoder.decode(bytes)?;
        debug!(
            "loaded '{}': {} ch, {} Hz, {}",
            source.name,
            audio.channel_count(),
            audio.sample_rate(),
            format_time(audio.duration_secs())
        );
        Ok(Session { source, audio })
    }

    /// Wrap audio that the host has already decoded.
    pub fn from_decoded(
        source: SourceFile,
        audio: DecodedAudio,
        config: &ConverterConfig,
    ) -> Result<Session, SessionError> {
        validate_source(&source, config)?;
        Ok(Session { source, audio })
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn audio(&self) -> &DecodedAudio {
        &self.audio
    }

    /// WAV of the unconverted audio, for playback.
    pub fn preview(&self) -> WavContainer {
        encode(&self.audio)
    }

    pub fn convert(&self, config: &ConverterConfig) -> Result<Conversion, SessionError> {
        config.validate()?;
        let audio = convert(&self.audio, config.ratio, config.method)?;
        let wav = encode(&audio);
        Ok(Conversion {
            file_name: export_file_name(&self.source.name),
            audio,
            wav,
        })
    }
}

/// Result of one conversion request.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub audio: DecodedAudio,
    pub wav: WavContainer,
    pub file_name: String,
}

/// Display details of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub file_name: String,
    pub duration: String,
    pub size: String,
    pub format: String,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Conversion {
    pub fn summary(&self) -> ConversionSummary {
        ConversionSummary {
            file_name: self.file_name.clone(),
            duration: format_time(self.audio.duration_secs()),
            size: format_file_size(self.wav.len() as u64),
            format: "WAV".to_string(),
            sample_rate: self.audio.sample_rate(),
            channels: self.audio.channel_count(),
        }
    }

    pub fn preview_url(&self) -> String {
        preview_data_url(&self.wav)
    }
}
