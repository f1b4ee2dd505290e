//! Serializable analysis configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file) gives interval 2, RSI 14, and every analysis enabled:
//!
//! ```toml
//! [pivots]
//! interval = 3
//! begin_index = 10
//!
//! [rsi]
//! periods = 21
//!
//! [sections]
//! gaps = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use structlab_core::{DEFAULT_INTERVAL, DEFAULT_RSI_PERIODS};

/// Content hash of a configuration.
pub type ConfigId = String;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub pivots: PivotConfig,
    pub rsi: RsiConfig,
    pub sections: SectionConfig,
}

/// Pivot window and optional scan narrowing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PivotConfig {
    /// Bars on each side of the candidate.
    pub interval: usize,
    /// Requested first scanned index (ignored if it would over-narrow).
    pub begin_index: Option<usize>,
    /// Requested end of the scan, exclusive (ignored if it would over-narrow).
    pub stop_index: Option<usize>,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            begin_index: None,
            stop_index: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RsiConfig {
    pub periods: usize,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            periods: DEFAULT_RSI_PERIODS,
        }
    }
}

/// Which analyses to run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SectionConfig {
    pub swings: bool,
    pub breaks: bool,
    /// Per-swing break status.
    pub status: bool,
    pub gaps: bool,
    pub rsi: bool,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            swings: true,
            breaks: true,
            status: true,
            gaps: true,
            rsi: true,
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pivots.interval == 0 {
            return Err(ConfigError::Invalid(
                "pivots.interval must be >= 1".to_string(),
            ));
        }
        if self.rsi.periods == 0 {
            return Err(ConfigError::Invalid("rsi.periods must be >= 1".to_string()));
        }
        Ok(())
    }

    /// Deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share an ID, so reports can be
    /// matched to the settings that produced them.
    pub fn config_id(&self) -> ConfigId {
        // Plain structs of numbers and bools: serialization cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
