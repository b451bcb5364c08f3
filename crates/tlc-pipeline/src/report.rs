//! Run reports: what a pipeline run or aggregate refresh actually did.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tlc_aggregate::AggregateRebuild;
use tlc_store::FileLoadReport;

/// Per-file schema findings surfaced by ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSchemaReport {
    pub source: String,
    /// Canonical columns the file did not provide (loaded as NULL).
    pub missing_columns: Vec<String>,
    /// Raw columns the rename table does not know (dropped).
    pub dropped_columns: Vec<String>,
}

/// Full account of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub database: String,
    pub database_created: bool,
    pub full_reload: bool,
    pub vendors_seeded: u64,
    pub payments_seeded: u64,
    /// `None` when the zone stage was skipped.
    pub zones_loaded: Option<usize>,
    pub files: Vec<FileLoadReport>,
    pub schema: Vec<FileSchemaReport>,
    /// Configured inputs that were absent and skipped.
    pub skipped_files: Vec<String>,
    pub aggregates: Vec<AggregateRebuild>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn rows_loaded(&self) -> u64 {
        self.files.iter().map(|file| file.rows_loaded).sum()
    }

    pub fn rows_dropped(&self) -> u64 {
        self.files.iter().map(|file| file.rows_dropped).sum()
    }

    pub fn rows_read(&self) -> usize {
        self.files.iter().map(|file| file.rows_in).sum()
    }
}

/// Account of an aggregates-only refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshReport {
    pub database: String,
    pub aggregates: Vec<AggregateRebuild>,
    pub elapsed_ms: u64,
}

/// Write a report as pretty-printed JSON.
///
/// # Errors
/// Fails on serialization or filesystem errors.
pub fn write_report_json<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    std::fs::write(path, json).with_context(|| format!("write report: {}", path.display()))?;
    Ok(())
}
