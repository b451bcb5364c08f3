//! Trip-extract file reading. Format is chosen by extension: `.csv` (headered,
//! schema inferred) or `.parquet`. One file is read fully into a frame; the
//! pipeline is batch-oriented, file at a time.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::{CsvReadOptions, DataFrame, ParquetReader, SerReader};
use tracing::info;

use tlc_model::trip::CoercedTrip;

use crate::coerce::coerce_trips;
use crate::error::{IngestError, Result};
use crate::normalize::normalize_schema;

/// Everything ingestion learned about one input file: the coerced rows plus
/// the counters the run report wants.
#[derive(Debug)]
pub struct IngestedFile {
    pub path: PathBuf,
    pub rows_read: usize,
    pub trips: Vec<CoercedTrip>,
    pub missing_columns: Vec<&'static str>,
    pub dropped_columns: Vec<String>,
}

/// Read one trip extract into a raw frame, dispatching on extension.
///
/// # Errors
/// Fails on unreadable files, malformed content, or an extension that is
/// neither `csv` nor `parquet`.
pub fn read_trip_frame(path: &Path) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => {
            let df = CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(path.to_path_buf()))?
                .finish()?;
            Ok(df)
        }
        Some("parquet") => {
            let file = File::open(path)?;
            Ok(ParquetReader::new(file).finish()?)
        }
        _ => Err(IngestError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Read, normalize and coerce one trip extract.
///
/// # Errors
/// Propagates read and frame errors. Schema subsets/supersets and value-level
/// problems never fail here; they surface as counters and `None` fields.
pub fn ingest_trip_file(path: &Path) -> Result<IngestedFile> {
    let frame = read_trip_frame(path)?;
    let rows_read = frame.height();
    let normalized = normalize_schema(&frame)?;

    // A file with no recognized columns still contributes its rows: each one
    // later drops at the required-field check, and is counted there.
    let trips = if normalized.frame.width() == 0 {
        vec![CoercedTrip::default(); rows_read]
    } else {
        coerce_trips(&normalized.frame)?
    };

    info!(
        path = %path.display(),
        rows = rows_read,
        recognized_columns = normalized.frame.width(),
        missing_columns = normalized.missing_columns.len(),
        "ingested trip extract"
    );

    Ok(IngestedFile {
        path: path.to_path_buf(),
        rows_read,
        trips,
        missing_columns: normalized.missing_columns,
        dropped_columns: normalized.dropped_columns,
    })
}
