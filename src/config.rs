//! YAML configuration for [`freqs`](crate::freqs::freqs) and the whole-table scan.
//!
//! ```yaml
//! freqs:
//!   top: 10
//!   render_plot: true
//!   image_format: png
//!   style:
//!     gradient: viridis
//! scan:
//!   max_variance_ratio: 0.8
//! ```

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::freqs::{FreqsOptions, ScanOptions};

/// Options loaded from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FreqsConfig {
    /// Options for keyed frequency tables.
    pub freqs: FreqsOptions,
    /// Options for whole-table scans.
    pub scan: ScanOptions,
}

impl FreqsConfig {
    /// Parse from a YAML string. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) on malformed YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        tracing::debug!(target: "trueno_freqs", top = %config.freqs.top, "loaded configuration");
        Ok(config)
    }

    /// Load from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
