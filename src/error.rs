use thiserror::Error;

/// Violations of the `DecodedAudio` invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    #[error("invalid channel count: audio must have at least one channel")]
    InvalidChannelCount,
    #[error("invalid sample rate: must be a positive number of Hz")]
    InvalidSampleRate,
    #[error("channel {channel} has {found} frames, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        found: usize,
    },
}

/// Failures turning raw file bytes into `DecodedAudio`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("no audio data to decode")]
    Empty,
    #[error("unsupported audio format")]
    UnsupportedFormat,
    #[error("corrupt audio data: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("invalid conversion ratio {0}: must be above 0.25 and at most 4")]
    InvalidRatio(f64),
    #[error(transparent)]
    Audio(#[from] AudioError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid conversion ratio {0}: must be above 0.25 and at most 4")]
    InvalidRatio(f64),
    #[error("maximum file size must be greater than zero")]
    ZeroSizeLimit,
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-visible failures of the load / convert flow. None of these leave
/// a session in a partially updated state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("file is too large ({size} bytes, max {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("not an audio file (type '{0}')")]
    UnsupportedMimeType(String),
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// An upstream stage failed and a header-only WAV was exported instead.
    #[error("conversion produced an empty container: {0}")]
    EncodingProducedEmptyContainer(String),
}
