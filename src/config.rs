//! Converter configuration, loadable from the JSON the web UI sends.

use serde::{Deserialize, Serialize};

use crate::convert::{ConversionMethod, ratio_in_range};
use crate::error::ConfigError;

/// Frequency ratio from A4 = 440 Hz to A4 = 432 Hz.
pub const TARGET_RATIO: f64 = 432.0 / 440.0;

/// Largest accepted input file (50 MiB).
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Appended to the source file stem when naming the exported file.
pub const EXPORT_SUFFIX: &str = "_432Hz.wav";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterConfig {
    /// Target / source frequency ratio.
    pub ratio: f64,
    pub method: ConversionMethod,
    /// Input files above this many bytes are rejected before decoding.
    pub max_file_size: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            ratio: TARGET_RATIO,
            method: ConversionMethod::default(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl ConverterConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ConverterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ratio_in_range(self.ratio) {
            return Err(ConfigError::InvalidRatio(self.ratio));
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::ZeroSizeLimit);
        }
        Ok(())
    }
}
