//! Pipeline module.
//!
//! This module provides the orchestrator that drives a run from uploaded file
//! to written output.

mod builder;

pub use builder::{LeadPipeline, LeadPipelineBuilder};
