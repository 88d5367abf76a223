//! Configuration for a streaming filter.
//!
//! A config names the filter class and its design parameters, the number of
//! interleaved channels, and the block size the caller delivers. It can be
//! built in code or loaded from TOML:
//!
//! ```toml
//! channels = 8
//! block_size = 128
//!
//! [filter]
//! type = "highpass"
//! cutoff = 0.002
//! half_length = 100
//! window = "blackman"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::signal_processing::{BlockFilter, FilterKind, Window};

/// Streaming filter configuration
///
/// # Example
/// ```
/// use blockfir::config::FilterConfig;
///
/// let config = FilterConfig::from_toml_str(
///     "channels = 2\n[filter]\ntype = \"mean\"\nlength = 4\n",
/// )
/// .unwrap();
/// assert_eq!(config.channels, 2);
/// assert_eq!(config.block_size, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Number of interleaved channels per frame
    pub channels: usize,
    /// Frames per delivered block (only used by block-driving callers)
    pub block_size: usize,
    /// Filter class and design parameters
    pub filter: FilterKind,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            channels: 1,
            block_size: 256,
            filter: FilterKind::Lowpass {
                cutoff: 0.1,
                half_length: 16,
                window: Window::Hamming,
            },
        }
    }
}

impl FilterConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| FilterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| FilterError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Check sizes and design parameters without allocating the filter.
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(FilterError::Config("channels must be at least 1".to_string()));
        }
        if self.block_size == 0 {
            return Err(FilterError::Config(
                "block_size must be at least 1 frame".to_string(),
            ));
        }
        self.filter
            .validate()
            .map_err(|e| FilterError::Config(e.to_string()))
    }

    /// Design the configured filter.
    pub fn build(&self) -> Result<BlockFilter> {
        self.validate()?;
        self.filter.design(self.channels)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| FilterError::Config(e.to_string()))
    }
}
