//! Rendering options, optionally loaded from a TOML file.
//!
//! A missing config file yields `RenderConfig::default()`. Unknown keys are
//! accepted by serde but logged as warnings, since they are usually typos.
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read render config: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid TOML in render config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Render config {path} is larger than {limit} bytes")]
    TooLarge { path: String, limit: u64 },
}

// ============================================================================
// Configuration
// ============================================================================

/// Options shared by every output format.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Spaces per nesting level in XML output. 0 writes compact XML.
    pub xml_indent: usize,

    /// Pretty-print JSON Feed output with two-space indentation.
    pub json_pretty: bool,

    /// Value for RSS `<generator>` and Atom `<generator>`.
    pub generator: Option<String>,

    /// Language tag for RSS `<language>` and JSON Feed `language`.
    pub language: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            xml_indent: 2,
            json_pretty: true,
            generator: None,
            language: None,
        }
    }
}

impl RenderConfig {
    /// Largest accepted config file, in bytes.
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] = ["xml_indent", "json_pretty", "generator", "language"];

    /// Reads a render configuration from `path`.
    ///
    /// An absent file means "use the defaults". The file is read through a
    /// bounded reader, so an oversized file is rejected without loading it
    /// whole.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No render config, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::new();
        file.take(Self::MAX_FILE_SIZE + 1).read_to_end(&mut bytes)?;
        if bytes.len() as u64 > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                path: path.display().to_string(),
                limit: Self::MAX_FILE_SIZE,
            });
        }

        let content =
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text. Blank text yields the defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: RenderConfig = toml::from_str(content)?;
        tracing::info!(
            xml_indent = config.xml_indent,
            json_pretty = config.json_pretty,
            "Loaded render configuration"
        );
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
