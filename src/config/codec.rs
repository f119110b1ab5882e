//! Text-format and symbol-reading settings.

use super::{parse_env_bool, parse_env_var, Config};
use crate::error::{HuffError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for reading symbols from text and for the textual table format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Text between a symbol and its code on a table line
    pub separator: String,
    /// Line that terminates a rendered table
    pub end_sentinel: String,
    /// Drop whitespace characters when reading input symbols
    pub skip_whitespace: bool,
    /// Print the parsed decode table before the decoded text
    pub echo_decode_table: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            separator: ": ".to_string(),
            end_sentinel: "END".to_string(),
            skip_whitespace: true,
            echo_decode_table: true,
        }
    }
}

impl CodecConfig {
    /// Settings that reproduce the classic command line behaviour
    pub fn original_preset() -> Self {
        Self::default()
    }

    /// Every character is a symbol and decoding prints only the text
    ///
    /// Whitespace symbols cannot be written as table lines, so this is meant
    /// for library use through the in-memory API.
    pub fn verbatim_preset() -> Self {
        Self {
            skip_whitespace: false,
            echo_decode_table: false,
            ..Self::default()
        }
    }
}

impl Config for CodecConfig {
    fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(HuffError::configuration("separator must not be empty"));
        }
        if self.separator.contains(['0', '1']) {
            return Err(HuffError::configuration(format!(
                "separator {:?} must not contain bit characters",
                self.separator
            )));
        }
        if self.end_sentinel.trim().is_empty() {
            return Err(HuffError::configuration("end sentinel must not be blank"));
        }
        if self.end_sentinel.contains(self.separator.as_str()) {
            return Err(HuffError::configuration(format!(
                "end sentinel {:?} must not contain the separator {:?}",
                self.end_sentinel, self.separator
            )));
        }
        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.separator = parse_env_var(&format!("{}SEPARATOR", prefix), config.separator);
        config.end_sentinel =
            parse_env_var(&format!("{}END_SENTINEL", prefix), config.end_sentinel);
        config.skip_whitespace =
            parse_env_bool(&format!("{}SKIP_WHITESPACE", prefix), config.skip_whitespace);
        config.echo_decode_table =
            parse_env_bool(&format!("{}ECHO_DECODE_TABLE", prefix), config.echo_decode_table);
        config.validate()?;
        Ok(config)
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            HuffError::configuration(format!("Failed to serialize codec config: {}", e))
        })?;
        std::fs::write(path, serialized).map_err(|e| {
            HuffError::configuration(format!("Failed to write codec config file: {}", e))
        })?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HuffError::configuration(format!("Failed to read codec config file: {}", e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            HuffError::configuration(format!("Failed to parse codec config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}
