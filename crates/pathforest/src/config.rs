//! Analysis configuration with builder pattern.
//!
//! [`AnalysisConfig`] uses the `bon` crate for builder generation with
//! validation at build time.
//!
//! # Example
//!
//! ```
//! use pathforest::{AnalysisConfig, ArtifactFormat, Verbosity};
//!
//! // All defaults: top 5 paths per class, " AND " delimiter, CSV artifact
//! let config = AnalysisConfig::builder().build().unwrap();
//! assert_eq!(config.top_k, 5);
//!
//! let config = AnalysisConfig::builder()
//!     .top_k(10)
//!     .delimiter(" & ")
//!     .format(ArtifactFormat::Json)
//!     .verbosity(Verbosity::Info)
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use bon::Builder;

use crate::logger::Verbosity;

/// Number of paths reported per class unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 5;

/// Delimiter placed between rendered conditions unless configured otherwise.
pub const DEFAULT_DELIMITER: &str = " AND ";

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// At least one path per class must be reported.
    InvalidTopK,
    /// The condition delimiter must not be empty.
    EmptyDelimiter,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTopK => write!(f, "top_k must be at least 1"),
            Self::EmptyDelimiter => write!(f, "delimiter must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// ArtifactFormat
// =============================================================================

/// On-disk format of the persisted pathway table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactFormat {
    /// Comma separated values with a header row.
    #[default]
    Csv,
    /// JSON array of row objects.
    Json,
}

impl ArtifactFormat {
    /// Infer the format from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactFormat::Json,
            _ => ArtifactFormat::Csv,
        }
    }
}

impl FromStr for ArtifactFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ArtifactFormat::Csv),
            "json" => Ok(ArtifactFormat::Json),
            other => Err(format!("expected 'csv' or 'json', got '{other}'")),
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::Csv => f.write_str("csv"),
            ArtifactFormat::Json => f.write_str("json"),
        }
    }
}

// =============================================================================
// AnalysisConfig
// =============================================================================

/// Configuration for a decision-path analysis run.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct AnalysisConfig {
    /// Number of most frequent paths reported per class. Default: 5.
    #[builder(default = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Separator between rendered conditions. Default: `" AND "`.
    #[builder(into, default = DEFAULT_DELIMITER.to_string())]
    pub delimiter: String,

    /// Number of threads for per-tree walking. `1` = sequential, `0` = all cores.
    /// Default: 1.
    #[builder(default = 1)]
    pub n_threads: usize,

    /// Persisted artifact format. Default: CSV.
    #[builder(default)]
    pub format: ArtifactFormat,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: analysis_config_builder::IsComplete> AnalysisConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `top_k == 0` or the delimiter is empty.
    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl AnalysisConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }
        if self.delimiter.is_empty() {
            return Err(ConfigError::EmptyDelimiter);
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            delimiter: DEFAULT_DELIMITER.to_string(),
            n_threads: 1,
            format: ArtifactFormat::Csv,
            verbosity: Verbosity::Silent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AnalysisConfig::builder().build().unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.delimiter, " AND ");
        assert_eq!(config.n_threads, 1);
        assert_eq!(config.format, ArtifactFormat::Csv);
        assert_eq!(config.verbosity, Verbosity::Silent);
    }

    #[test]
    fn default_impl_matches_builder() {
        let built = AnalysisConfig::builder().build().unwrap();
        let default = AnalysisConfig::default();
        assert_eq!(built.top_k, default.top_k);
        assert_eq!(built.delimiter, default.delimiter);
        assert_eq!(built.n_threads, default.n_threads);
    }

    #[test]
    fn rejects_zero_top_k() {
        let err = AnalysisConfig::builder().top_k(0).build().unwrap_err();
        assert_eq!(err, ConfigError::InvalidTopK);
    }

    #[test]
    fn rejects_empty_delimiter() {
        let err = AnalysisConfig::builder().delimiter("").build().unwrap_err();
        assert_eq!(err, ConfigError::EmptyDelimiter);
    }

    #[test]
    fn format_from_path() {
        assert_eq!(ArtifactFormat::from_path(Path::new("out.JSON")), ArtifactFormat::Json);
        assert_eq!(ArtifactFormat::from_path(Path::new("out.csv")), ArtifactFormat::Csv);
        assert_eq!(ArtifactFormat::from_path(Path::new("out")), ArtifactFormat::Csv);
        assert_eq!("Json".parse::<ArtifactFormat>().unwrap(), ArtifactFormat::Json);
        assert!("xlsx".parse::<ArtifactFormat>().is_err());
    }
}
