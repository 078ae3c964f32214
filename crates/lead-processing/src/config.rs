//! Configuration types for the lead cleaning pipeline.
//!
//! Directories and limits are passed explicitly to the pipeline through
//! [`PipelineConfig`] instead of living in process-wide state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Files larger than this are read in chunks (100 MiB).
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Rows per chunk when reading large delimited files.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Rows returned in a preview.
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// Configuration for the lead cleaning pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lead_processing::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .output_dir("outputs")
///     .chunk_size(50_000)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory where cleaned CSV files are written.
    /// Default: "outputs"
    pub output_dir: PathBuf,

    /// Input files above this size (bytes) are read in chunks.
    /// Default: 100 MiB
    pub large_file_threshold_bytes: u64,

    /// Rows per chunk for chunked reads.
    /// Default: 10,000
    pub chunk_size: usize,

    /// Maximum rows included in the in-memory preview.
    /// Default: 10
    pub preview_limit: usize,

    /// File name prefix for valid-leads output.
    /// Default: "valid_leads"
    pub valid_leads_prefix: String,

    /// File name prefix for filtered-leads output.
    /// Default: "filtered_leads"
    pub filtered_leads_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            large_file_threshold_bytes: DEFAULT_LARGE_FILE_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            valid_leads_prefix: "valid_leads".to_string(),
            filtered_leads_prefix: "filtered_leads".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.chunk_size == 0 {
            return Err(ConfigValidationError::ZeroLimit {
                field: "chunk_size".to_string(),
            });
        }

        if self.preview_limit == 0 {
            return Err(ConfigValidationError::ZeroLimit {
                field: "preview_limit".to_string(),
            });
        }

        for (field, prefix) in [
            ("valid_leads_prefix", &self.valid_leads_prefix),
            ("filtered_leads_prefix", &self.filtered_leads_prefix),
        ] {
            if prefix.trim().is_empty() {
                return Err(ConfigValidationError::EmptyPrefix {
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': must be at least 1")]
    ZeroLimit { field: String },

    #[error("Invalid value for '{field}': prefix must not be empty")]
    EmptyPrefix { field: String },
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    output_dir: Option<PathBuf>,
    large_file_threshold_bytes: Option<u64>,
    chunk_size: Option<usize>,
    preview_limit: Option<usize>,
    valid_leads_prefix: Option<String>,
    filtered_leads_prefix: Option<String>,
}

impl PipelineConfigBuilder {
    /// Set the output directory for cleaned files.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the size above which inputs are read in chunks.
    pub fn large_file_threshold_bytes(mut self, bytes: u64) -> Self {
        self.large_file_threshold_bytes = Some(bytes);
        self
    }

    /// Set the number of rows per chunk.
    pub fn chunk_size(mut self, rows: usize) -> Self {
        self.chunk_size = Some(rows);
        self
    }

    /// Set the number of rows in the in-memory preview.
    pub fn preview_limit(mut self, rows: usize) -> Self {
        self.preview_limit = Some(rows);
        self
    }

    /// Set the output file prefix for the valid-leads path.
    pub fn valid_leads_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.valid_leads_prefix = Some(prefix.into());
        self
    }

    /// Set the output file prefix for the filtered-leads path.
    pub fn filtered_leads_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filtered_leads_prefix = Some(prefix.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            large_file_threshold_bytes: self
                .large_file_threshold_bytes
                .unwrap_or(defaults.large_file_threshold_bytes),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            preview_limit: self.preview_limit.unwrap_or(defaults.preview_limit),
            valid_leads_prefix: self
                .valid_leads_prefix
                .unwrap_or(defaults.valid_leads_prefix),
            filtered_leads_prefix: self
                .filtered_leads_prefix
                .unwrap_or(defaults.filtered_leads_prefix),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.large_file_threshold_bytes, 100 * 1024 * 1024);
        assert_eq!(config.chunk_size, 10_000);
        assert_eq!(config.preview_limit, 10);
        assert_eq!(config.valid_leads_prefix, "valid_leads");
        assert_eq!(config.filtered_leads_prefix, "filtered_leads");
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .output_dir("custom")
            .chunk_size(500)
            .preview_limit(3)
            .large_file_threshold_bytes(1024)
            .valid_leads_prefix("clean")
            .build()
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("custom"));
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.preview_limit, 3);
        assert_eq!(config.large_file_threshold_bytes, 1024);
        assert_eq!(config.valid_leads_prefix, "clean");
        assert_eq!(config.filtered_leads_prefix, "filtered_leads");
    }

    #[test]
    fn test_validation_zero_chunk_size() {
        let result = PipelineConfig::builder().chunk_size(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::ZeroLimit { .. }
        ));
    }

    #[test]
    fn test_validation_empty_prefix() {
        let result = PipelineConfig::builder().filtered_leads_prefix("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyPrefix { .. }
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "output_dir": "leads_out",
            "large_file_threshold_bytes": 2048,
            "chunk_size": 250,
            "preview_limit": 5,
            "valid_leads_prefix": "valid",
            "filtered_leads_prefix": "filtered"
        }"#;

        let config: PipelineConfig =
            serde_json::from_str(json).expect("Should deserialize from JSON");

        assert_eq!(config.output_dir.to_str().unwrap(), "leads_out");
        assert_eq!(config.large_file_threshold_bytes, 2048);
        assert_eq!(config.chunk_size, 250);
        assert_eq!(config.preview_limit, 5);
        assert!(config.validate().is_ok());
    }
}
