pub mod audio;
pub mod config;
pub mod convert;
pub mod decode;
pub mod dsp;
pub mod error;
pub mod format;
pub mod session;

use crate::audio::DecodedAudio;
use crate::config::ConverterConfig;
use crate::session::SourceFile;
use wasm_bindgen::prelude::*;

pub use crate::dsp::wav::{WavContainer, encode};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the tune432-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: install the panic hook and console logger.
/// Safe to call more than once.
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console")]
    {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Debug).ok();
    }
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// An empty string means "all defaults".
fn parse_config(config_json: &str) -> Result<ConverterConfig, JsValue> {
    if config_json.trim().is_empty() {
        return Ok(ConverterConfig::default());
    }
    ConverterConfig::from_json(config_json).map_err(js_err)
}

/// WASM-exposed: encode interleaved f32 samples as a 16-bit PCM WAV file.
#[wasm_bindgen]
pub fn encode_wav(
    sample_rate: u32,
    channel_count: u16,
    interleaved: Vec<f32>,
) -> Result<Vec<u8>, JsValue> {
    let audio = DecodedAudio::from_interleaved(sample_rate, channel_count, &interleaved)
        .map_err(js_err)?;
    Ok(encode(&audio).into_bytes())
}

/// WASM-exposed: apply the configured 432 Hz conversion to interleaved
/// samples and return the resulting WAV bytes.
#[wasm_bindgen]
pub fn convert_wav(
    sample_rate: u32,
    channel_count: u16,
    interleaved: Vec<f32>,
    config_json: &str,
) -> Result<Vec<u8>, JsValue> {
    let config = parse_config(config_json)?;
    let audio = DecodedAudio::from_interleaved(sample_rate, channel_count, &interleaved)
        .map_err(js_err)?;
    let converted = convert::convert(&audio, config.ratio, config.method).map_err(js_err)?;
    Ok(encode(&converted).into_bytes())
}

/// WASM-exposed: like `convert_wav`, but a failed conversion yields a
/// header-only WAV. Returns `{ wav, error }`; `error` is null on success.
#[wasm_bindgen]
pub fn convert_wav_or_empty(
    sample_rate: u32,
    channel_count: u16,
    interleaved: Vec<f32>,
    config_json: &str,
) -> Result<JsValue, JsValue> {
    let config = parse_config(config_json)?;
    let audio = DecodedAudio::from_interleaved(sample_rate, channel_count, &interleaved)
        .map_err(js_err)?;
    let export = session::FallbackExport::new(&audio, &config);
    serde_wasm_bindgen::to_value(&export).map_err(js_err)
}

/// WASM-exposed: convert and return `{ fileName, duration, size, format,
/// sampleRate, channels }` for the results panel.
#[wasm_bindgen]
pub fn convert_summary(
    name: &str,
    mime_type: &str,
    size: f64,
    sample_rate: u32,
    channel_count: u16,
    interleaved: Vec<f32>,
    config_json: &str,
) -> Result<JsValue, JsValue> {
    let config = parse_config(config_json)?;
    let audio = DecodedAudio::from_interleaved(sample_rate, channel_count, &interleaved)
        .map_err(js_err)?;
    let source = SourceFile {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size: size as u64,
    };
    let session = session::Session::from_decoded(source, audio, &config).map_err(js_err)?;
    let conversion = session.convert(&config).map_err(js_err)?;
    serde_wasm_bindgen::to_value(&conversion.summary()).map_err(js_err)
}

/// WASM-exposed: download name for a converted file.
#[wasm_bindgen]
pub fn export_name(name: &str) -> String {
    session::export_file_name(name)
}

/// WASM-exposed: check size and MIME type before the host decodes a file.
#[wasm_bindgen]
pub fn validate_file(
    name: &str,
    mime_type: &str,
    size: f64,
    config_json: &str,
) -> Result<(), JsValue> {
    let config = parse_config(config_json)?;
    let source = SourceFile {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size: size as u64,
    };
    session::validate_source(&source, &config).map_err(js_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_wav_from_interleaved() {
        let wav = encode_wav(44100, 2, vec![0.0, 0.0, 1.0, -1.0]).unwrap();
        assert_eq!(wav.len(), 44 + 8);
        assert_eq!(&wav[48..52], &[0xFF, 0x7F, 0x00, 0x80]);
    }

    #[test]
    fn export_name_strips_extension() {
        assert_eq!(export_name("Track 01.m4a"), "Track 01_432Hz.wav");
    }

    #[test]
    fn version_matches_manifest() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }
}
