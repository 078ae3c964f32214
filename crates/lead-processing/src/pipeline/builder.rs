//! Main lead cleaning pipeline module.
//!
//! This module provides the core `LeadPipeline` struct and builder for
//! orchestrating a run: load, map columns, sanitize, optionally filter by
//! role, write.

use crate::cleaner::{RecordSanitizer, Sanitized};
use crate::config::PipelineConfig;
use crate::error::{LeadError, Result, ResultExt};
use crate::filter::{RoleMatcher, RoleTokens};
use crate::loader::{FileKind, Loader};
use crate::mapper::{map_columns, to_canonical_records};
use crate::reporting::LeadWriter;
use crate::types::{CanonicalRecord, FilteredLeadsResult, ValidLeadsResult};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

/// The lead cleaning pipeline.
///
/// A pipeline holds only immutable configuration; each run works on its own
/// input file and writes its own uniquely named output, so one pipeline can
/// serve concurrent runs.
///
/// # Example
///
/// ```rust,ignore
/// use lead_processing::{LeadPipeline, PipelineConfig, RoleTokens};
///
/// let pipeline = LeadPipeline::builder()
///     .config(PipelineConfig::builder().output_dir("outputs").build()?)
///     .build()?;
///
/// let result = pipeline.run_valid_leads("uploads/contacts.csv", "csv")?;
/// println!("{}", result.summary_line());
///
/// let tokens = RoleTokens::from_selection(["CEO", "Founder"]);
/// let result = pipeline.run_filtered_leads("uploads/contacts.xlsx", "xlsx", &tokens)?;
/// ```
#[derive(Debug, Clone)]
pub struct LeadPipeline {
    config: PipelineConfig,
    loader: Loader,
    sanitizer: RecordSanitizer,
    writer: LeadWriter,
}

// Runs may execute on several request threads sharing one pipeline
static_assertions::assert_impl_all!(LeadPipeline: Send, Sync);

impl LeadPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> LeadPipelineBuilder {
        LeadPipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Clean an uploaded contact list and write the valid leads.
    ///
    /// # Errors
    ///
    /// - [`LeadError::FileTypeRejected`] for an unsupported extension
    /// - [`LeadError::LoadFailure`] if the file cannot be read
    /// - [`LeadError::ColumnMappingIncomplete`] if a canonical field has no column
    ///
    /// No output file exists for a failed run.
    pub fn run_valid_leads(&self, path: impl AsRef<Path>, ext: &str) -> Result<ValidLeadsResult> {
        self.report(self.valid_leads_internal(path.as_ref(), ext))
    }

    /// Clean an uploaded contact list, keep records whose title matches a
    /// role token, and write them.
    ///
    /// Counts are reported against the uploaded row count.
    ///
    /// # Errors
    ///
    /// Same as [`run_valid_leads`](Self::run_valid_leads), plus
    /// [`LeadError::EmptyRoleSelection`] when `tokens` holds no usable token;
    /// that check happens before the file is opened.
    pub fn run_filtered_leads(
        &self,
        path: impl AsRef<Path>,
        ext: &str,
        tokens: &RoleTokens,
    ) -> Result<FilteredLeadsResult> {
        self.report(self.filtered_leads_internal(path.as_ref(), ext, tokens))
    }

    /// Re-read up to `limit` rows from a previously written output file.
    pub fn preview(&self, output_file_name: &str, limit: usize) -> Result<Vec<CanonicalRecord>> {
        self.writer.preview(output_file_name, limit)
    }

    /// Log the outcome of a run.
    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            error!("Pipeline error: {}", e);
        }
        result
    }

    fn valid_leads_internal(&self, path: &Path, ext: &str) -> Result<ValidLeadsResult> {
        let start_time = Instant::now();
        info!("Starting valid leads run for {}", path.display());

        let (total_uploaded, sanitized) = self.load_and_sanitize(path, ext)?;
        let counts = sanitized.counts;

        info!("Step 4: Writing output...");
        let output_file_name = self
            .writer
            .write(&self.config.valid_leads_prefix, &sanitized.records)
            .context("Writing output")?;

        let result = ValidLeadsResult {
            output_file_name,
            total_uploaded,
            duplicates_removed: counts.duplicates_removed(),
            invalid_removed: counts.invalid_removed(),
            valid_count: counts.valid_count,
            preview_rows: self.preview_rows(&sanitized.records),
        };

        info!("{}", result.summary_line());
        debug!("Run finished in {}ms", start_time.elapsed().as_millis());
        Ok(result)
    }

    fn filtered_leads_internal(
        &self,
        path: &Path,
        ext: &str,
        tokens: &RoleTokens,
    ) -> Result<FilteredLeadsResult> {
        let start_time = Instant::now();
        let matcher = RoleMatcher::new(tokens)?;
        info!("Starting filtered leads run for {}", path.display());

        let (total_uploaded, sanitized) = self.load_and_sanitize(path, ext)?;
        let sanitize_counts = sanitized.counts;

        info!("Step 4: Filtering by role...");
        let matched = matcher.filter(sanitized.records);

        info!("Step 5: Writing output...");
        let output_file_name = self
            .writer
            .write(&self.config.filtered_leads_prefix, &matched)
            .context("Writing output")?;

        let matched_count = matched.len();
        let result = FilteredLeadsResult {
            output_file_name,
            total_uploaded,
            non_matching_removed: total_uploaded.saturating_sub(matched_count),
            matched_count,
            preview_rows: self.preview_rows(&matched),
            sanitize_counts,
        };

        info!("{}", result.summary_line());
        debug!(
            "Before filtering: {} duplicates, {} invalid removed",
            sanitize_counts.duplicates_removed(),
            sanitize_counts.invalid_removed()
        );
        debug!("Run finished in {}ms", start_time.elapsed().as_millis());
        Ok(result)
    }

    /// Shared front half of both paths. Returns the uploaded row count and
    /// the sanitized records.
    fn load_and_sanitize(&self, path: &Path, ext: &str) -> Result<(usize, Sanitized)> {
        let kind = FileKind::from_extension(ext)?;

        info!("Step 1: Loading {:?} input...", kind);
        let table = self.loader.load(path, kind)?;
        let total_uploaded = table.total_rows;

        info!("Step 2: Mapping columns...");
        let mapping = map_columns(&table.headers())?;
        for (field, source) in mapping.iter() {
            debug!("  {} <- '{}'", field, source);
        }
        let records = to_canonical_records(table.frame, &mapping)?;

        if records.len() != total_uploaded {
            return Err(LeadError::Internal(format!(
                "mapped {} records from {} rows",
                records.len(),
                total_uploaded
            )));
        }

        info!("Step 3: Sanitizing records...");
        let sanitized = self.sanitizer.sanitize(records);

        Ok((total_uploaded, sanitized))
    }

    fn preview_rows(&self, records: &[CanonicalRecord]) -> Vec<CanonicalRecord> {
        records
            .iter()
            .take(self.config.preview_limit)
            .cloned()
            .collect()
    }
}

/// Builder for [`LeadPipeline`].
#[derive(Debug, Default)]
pub struct LeadPipelineBuilder {
    config: Option<PipelineConfig>,
}

impl LeadPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline, validating the configuration.
    pub fn build(self) -> Result<LeadPipeline> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| LeadError::InvalidConfig(e.to_string()))?;

        Ok(LeadPipeline {
            loader: Loader::from_config(&config),
            sanitizer: RecordSanitizer,
            writer: LeadWriter::new(config.output_dir.clone()),
            config,
        })
    }
}
