//! Schema normalization: map raw extract headers onto the canonical column
//! set before coercion.
//!
//! Extract vintages disagree on headers (`VendorID` vs `vendorid`,
//! coordinate columns vs zone ids) and occasionally carry columns the
//! warehouse has no use for. Normalization resolves every header through the
//! versioned rename table; unknown columns are dropped, duplicate resolutions
//! keep the first occurrence, and absent canonical columns are reported as
//! drift so they can load as NULL.

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use tlc_model::schema::{COLUMN_TABLE, normalize_header, resolve_column};

use crate::error::Result;

/// A frame whose columns all carry canonical names, plus what normalization
/// had to do to get there.
#[derive(Debug)]
pub struct NormalizedFrame {
    pub frame: DataFrame,
    /// Canonical columns the input did not provide (back-filled as NULL).
    pub missing_columns: Vec<&'static str>,
    /// Raw input columns the rename table does not know; dropped.
    pub dropped_columns: Vec<String>,
}

/// Normalize an input frame's schema against the canonical column table.
///
/// Never fails on subsets or supersets: unknown columns drop, absent ones are
/// reported. No column is renamed twice; when two raw headers resolve to the
/// same canonical column, the first occurrence wins.
///
/// # Errors
/// Only frame-level errors (column extraction, frame reassembly) propagate.
pub fn normalize_schema(frame: &DataFrame) -> Result<NormalizedFrame> {
    let mut taken: Vec<&'static str> = Vec::new();
    let mut keep = Vec::new();
    let mut dropped_columns = Vec::new();

    for raw_name in frame.get_column_names() {
        let normalized = normalize_header(raw_name);
        match resolve_column(&normalized) {
            Some(canonical) if !taken.contains(&canonical.name) => {
                let mut column = frame.column(raw_name)?.clone();
                column.rename(canonical.name.into());
                taken.push(canonical.name);
                keep.push(column);
            }
            Some(canonical) => {
                debug!(
                    raw = %raw_name,
                    canonical = canonical.name,
                    "duplicate resolution, keeping first occurrence"
                );
                dropped_columns.push(raw_name.to_string());
            }
            None => {
                debug!(raw = %raw_name, "dropping unknown column");
                dropped_columns.push(raw_name.to_string());
            }
        }
    }

    let missing_columns: Vec<&'static str> = COLUMN_TABLE
        .iter()
        .map(|col| col.name)
        .filter(|name| !taken.contains(name))
        .collect();
    if !missing_columns.is_empty() {
        warn!(
            missing = missing_columns.len(),
            columns = ?missing_columns,
            "input lacks canonical columns; loading them as NULL"
        );
    }

    Ok(NormalizedFrame {
        frame: DataFrame::new(keep)?,
        missing_columns,
        dropped_columns,
    })
}
