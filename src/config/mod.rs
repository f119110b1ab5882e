//! Configuration for the huffcode collaborators
//!
//! The core algorithms take no options. What is configurable is how symbols
//! are read from text and how tables are rendered to and parsed from their
//! line-oriented textual form; [`CodecConfig`] collects those settings.
//!
//! # Environment Initialization
//!
//! ```rust
//! use huffcode::config::{CodecConfig, Config};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads HUFFCODE_SEPARATOR, HUFFCODE_END_SENTINEL, ...
//! let config = CodecConfig::from_env()?;
//! assert!(config.validate().is_ok());
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod codec;


pub use codec::CodecConfig;

/// Common configuration trait providing validation, environment
/// initialization and file persistence.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables with the
    /// `HUFFCODE_` prefix, falling back to defaults for unset variables.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix("HUFFCODE_")
    }

    /// Initialize configuration from environment variables with a custom prefix.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true, everything
/// else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
