//! Contact List Cleaning Library
//!
//! Turns an uploaded contact list (csv, txt, xls or xlsx) into a clean,
//! deduplicated CSV of leads with a fixed five-column schema:
//! `Name, Email, Phone, Company, Title`.
//!
//! # Overview
//!
//! A run goes through these stages:
//!
//! - **Loading**: first five columns, all values as text, missing cells empty,
//!   large files read in bounded chunks ([`loader`])
//! - **Column Mapping**: keyword heuristics pick the source column for each
//!   canonical field ([`mapper`])
//! - **Sanitizing**: trim emails, drop duplicate emails (first wins), drop
//!   invalid emails, sort by name ([`cleaner`])
//! - **Role Filtering** (optional): keep records whose title matches one of
//!   the selected role tokens ([`filter`])
//! - **Writing**: timestamped CSV output plus a bounded preview ([`reporting`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lead_processing::{LeadPipeline, PipelineConfig, RoleTokens};
//!
//! let pipeline = LeadPipeline::builder()
//!     .config(PipelineConfig::builder().output_dir("outputs").build()?)
//!     .build()?;
//!
//! // Deduplicate and validate
//! let result = pipeline.run_valid_leads("uploads/contacts.csv", "csv")?;
//! println!("{}", result.summary_line());
//!
//! // Keep only decision makers
//! let roles = RoleTokens::parse_free_text("CEO\nFounder\nVice President");
//! let result = pipeline.run_filtered_leads("uploads/contacts.xlsx", "xlsx", &roles)?;
//! for row in &result.preview_rows {
//!     println!("{} <{}> {}", row.name, row.email, row.title);
//! }
//!
//! // Re-preview a file written earlier
//! let rows = pipeline.preview(&result.output_file_name, 10)?;
//! ```
//!
//! # Errors
//!
//! Every failure is a [`LeadError`]. Hosts show
//! [`LeadError::user_message`] and keep serving; a failed run never leaves an
//! output file behind.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod mapper;
pub mod pipeline;
pub mod reporting;
pub mod types;

// Re-exports for convenient access
pub use cleaner::{RecordSanitizer, Sanitized, is_valid_email};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{LeadError, Result as LeadResult, ResultExt};
pub use filter::{COMMON_ROLE_TOKENS, RoleMatcher, RoleTokens};
pub use loader::{FileKind, Loader, RawTable};
pub use mapper::map_columns;
pub use pipeline::{LeadPipeline, LeadPipelineBuilder};
pub use reporting::{LeadWriter, preview_file};
pub use types::{
    CanonicalField, CanonicalRecord, ColumnMapping, FilteredLeadsResult, SanitizeCounts,
    ValidLeadsResult,
};
