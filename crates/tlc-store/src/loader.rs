//! Chunked transactional bulk loading of coerced trips.
//!
//! A file's rows are partitioned into fixed-size chunks; each chunk loads in
//! its own transaction, split into bounded multi-row INSERTs. A failed chunk
//! rolls back and aborts the run, while chunks committed before it stay
//! committed. There is no retry. Progress is reported per chunk at two
//! scopes: the current file and the whole run, the latter carried by the
//! loader across files.
//!
//! The INSERT binds one array per column (`UNNEST($1::timestamp[], ...)`)
//! rather than a row-by-row VALUES grid; a 50k-row VALUES batch across 24
//! columns would blow through the protocol's bind-parameter limit.

use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use tlc_model::trip::{CoercedTrip, TripRecord};

use crate::error::{Result, StoreError};
use crate::store::Store;

pub const DEFAULT_CHUNK_SIZE: usize = 200_000;
pub const DEFAULT_INSERT_BATCH_SIZE: usize = 50_000;

/// Target columns and their array cast types, in insert order. Must stay in
/// step with the canonical column table; a unit test enforces it.
const TRIP_COLUMNS: &[(&str, &str)] = &[
    ("pickup_time", "timestamp"),
    ("dropoff_time", "timestamp"),
    ("distance", "float8"),
    ("fare", "float8"),
    ("tip_amount", "float8"),
    ("total_amount", "float8"),
    ("passenger_count", "int4"),
    ("pickup_zone_id", "int4"),
    ("dropoff_zone_id", "int4"),
    ("vendor_id", "varchar"),
    ("payment_id", "int4"),
    ("pickup_long", "float8"),
    ("pickup_lat", "float8"),
    ("dropoff_long", "float8"),
    ("dropoff_lat", "float8"),
    ("ratecodeid", "int4"),
    ("store_and_fwd_flag", "varchar"),
    ("extra", "float8"),
    ("mta_tax", "float8"),
    ("tolls_amount", "float8"),
    ("improvement_surcharge", "float8"),
    ("congestion_surcharge", "float8"),
    ("airport_fee", "float8"),
    ("cbd_congestion_fee", "float8"),
];

/// Build the UNNEST bulk-insert statement for the trips table.
pub fn insert_trips_sql() -> String {
    let names: Vec<&str> = TRIP_COLUMNS.iter().map(|(name, _)| *name).collect();
    let casts: Vec<String> = TRIP_COLUMNS
        .iter()
        .enumerate()
        .map(|(idx, (_, cast))| format!("${}::{}[]", idx + 1, cast))
        .collect();
    format!(
        "INSERT INTO trips ({}) SELECT * FROM UNNEST({})",
        names.join(", "),
        casts.join(", ")
    )
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Rows per transaction.
    pub chunk_size: usize,
    /// Rows per INSERT statement within a chunk.
    pub insert_batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            insert_batch_size: DEFAULT_INSERT_BATCH_SIZE,
        }
    }
}

/// What loading one file did, for the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLoadReport {
    pub source: String,
    /// Coerced rows offered to the loader.
    pub rows_in: usize,
    pub rows_loaded: u64,
    /// Rows missing a required field, excluded before insert.
    pub rows_dropped: u64,
    pub chunks: usize,
    pub elapsed_ms: u64,
}

/// Cumulative load progress across every file in a run. The loader lives for
/// the whole run, so the counter carries over from one file to the next and
/// every chunk log shows the run-wide total, not just the file's.
#[derive(Debug)]
pub struct RunProgress {
    started: Instant,
    rows_loaded: u64,
}

impl RunProgress {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            rows_loaded: 0,
        }
    }

    /// Add one committed chunk's rows and return the new run-wide total.
    pub fn record(&mut self, rows: u64) -> u64 {
        self.rows_loaded += rows;
        self.rows_loaded
    }

    pub fn rows_loaded(&self) -> u64 {
        self.rows_loaded
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a file's rows into transaction-sized chunks, preserving order.
pub fn partition_chunks(trips: Vec<CoercedTrip>, chunk_size: usize) -> Vec<Vec<CoercedTrip>> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(trips.len().div_ceil(chunk_size));
    let mut rows = trips.into_iter();
    loop {
        let chunk: Vec<CoercedTrip> = rows.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }
    chunks
}

/// Apply the required-field check to one chunk: storable records out, the
/// rest counted as dropped. Dropping a row is always whole-row.
pub fn storable_records(chunk: Vec<CoercedTrip>) -> (Vec<TripRecord>, u64) {
    let mut records = Vec::with_capacity(chunk.len());
    let mut dropped = 0u64;
    for trip in chunk {
        match trip.into_record() {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }
    (records, dropped)
}

pub struct ChunkedBulkLoader<'a> {
    store: &'a Store,
    config: LoaderConfig,
    insert_sql: String,
    progress: RunProgress,
}

impl<'a> ChunkedBulkLoader<'a> {
    pub fn new(store: &'a Store, config: LoaderConfig) -> Self {
        Self {
            store,
            config,
            insert_sql: insert_trips_sql(),
            progress: RunProgress::new(),
        }
    }

    /// Rows committed so far across every file this loader has seen.
    pub fn rows_loaded(&self) -> u64 {
        self.progress.rows_loaded()
    }

    /// Load one file's coerced rows. Each committed chunk reports both the
    /// file's running total and the run-wide total across all files loaded
    /// through this loader.
    ///
    /// # Errors
    /// Any insert or commit failure aborts the current chunk (rolled back)
    /// and the load; earlier chunks stay committed.
    pub async fn load_file(
        &mut self,
        source: &str,
        trips: Vec<CoercedTrip>,
    ) -> Result<FileLoadReport> {
        let started = Instant::now();
        let mut report = FileLoadReport {
            source: source.to_string(),
            rows_in: trips.len(),
            rows_loaded: 0,
            rows_dropped: 0,
            chunks: 0,
            elapsed_ms: 0,
        };

        for (index, chunk) in partition_chunks(trips, self.config.chunk_size)
            .into_iter()
            .enumerate()
        {
            let chunk_number = index + 1;
            let chunk_rows = chunk.len();
            let chunk_started = Instant::now();

            let (records, dropped) = storable_records(chunk);
            report.rows_dropped += dropped;
            if records.is_empty() {
                warn!(
                    source,
                    chunk = chunk_number,
                    rows = chunk_rows,
                    "chunk has no storable rows, skipping"
                );
                continue;
            }

            let mut tx = self
                .store
                .pool()
                .begin()
                .await
                .map_err(|err| StoreError::Insertion { chunk: chunk_number, source: err })?;
            let mut inserted = 0u64;
            for batch in records.chunks(self.config.insert_batch_size.max(1)) {
                inserted += insert_batch(&mut tx, &self.insert_sql, batch)
                    .await
                    .map_err(|err| StoreError::Insertion { chunk: chunk_number, source: err })?;
            }
            tx.commit()
                .await
                .map_err(|err| StoreError::Insertion { chunk: chunk_number, source: err })?;

            report.rows_loaded += inserted;
            report.chunks += 1;
            let run_cumulative = self.progress.record(inserted);
            info!(
                source,
                chunk = chunk_number,
                rows = chunk_rows,
                loaded = inserted,
                dropped,
                file_cumulative = report.rows_loaded,
                run_cumulative,
                elapsed_ms = chunk_started.elapsed().as_millis() as u64,
                run_elapsed_ms = self.progress.elapsed_ms(),
                "chunk committed"
            );
        }

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            source,
            rows_in = report.rows_in,
            loaded = report.rows_loaded,
            dropped = report.rows_dropped,
            chunks = report.chunks,
            elapsed_ms = report.elapsed_ms,
            run_cumulative = self.progress.rows_loaded(),
            run_elapsed_ms = self.progress.elapsed_ms(),
            "file load complete"
        );
        Ok(report)
    }
}

/// One bounded multi-row INSERT inside the chunk's transaction. Binds are in
/// `TRIP_COLUMNS` order, one array per column.
async fn insert_batch(
    tx: &mut Transaction<'_, Postgres>,
    sql: &str,
    batch: &[TripRecord],
) -> sqlx::Result<u64> {
    let len = batch.len();
    let mut pickup_time: Vec<NaiveDateTime> = Vec::with_capacity(len);
    let mut dropoff_time: Vec<NaiveDateTime> = Vec::with_capacity(len);
    let mut distance: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut fare: Vec<f64> = Vec::with_capacity(len);
    let mut tip_amount: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut total_amount: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut passenger_count: Vec<Option<i32>> = Vec::with_capacity(len);
    let mut pickup_zone_id: Vec<Option<i32>> = Vec::with_capacity(len);
    let mut dropoff_zone_id: Vec<Option<i32>> = Vec::with_capacity(len);
    let mut vendor_id: Vec<Option<&str>> = Vec::with_capacity(len);
    let mut payment_id: Vec<Option<i32>> = Vec::with_capacity(len);
    let mut pickup_long: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut pickup_lat: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut dropoff_long: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut dropoff_lat: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut ratecodeid: Vec<Option<i32>> = Vec::with_capacity(len);
    let mut store_and_fwd_flag: Vec<Option<&str>> = Vec::with_capacity(len);
    let mut extra: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut mta_tax: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut tolls_amount: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut improvement_surcharge: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut congestion_surcharge: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut airport_fee: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut cbd_congestion_fee: Vec<Option<f64>> = Vec::with_capacity(len);

    for record in batch {
        pickup_time.push(record.pickup_time);
        dropoff_time.push(record.dropoff_time);
        distance.push(record.distance);
        fare.push(record.fare);
        tip_amount.push(record.tip_amount);
        total_amount.push(record.total_amount);
        passenger_count.push(record.passenger_count);
        pickup_zone_id.push(record.pickup_zone_id);
        dropoff_zone_id.push(record.dropoff_zone_id);
        vendor_id.push(record.vendor_id.map(|vendor| vendor.as_str()));
        payment_id.push(record.payment_id);
        pickup_long.push(record.pickup_long);
        pickup_lat.push(record.pickup_lat);
        dropoff_long.push(record.dropoff_long);
        dropoff_lat.push(record.dropoff_lat);
        ratecodeid.push(record.ratecodeid);
        store_and_fwd_flag.push(record.store_and_fwd_flag.as_deref());
        extra.push(record.extra);
        mta_tax.push(record.mta_tax);
        tolls_amount.push(record.tolls_amount);
        improvement_surcharge.push(record.improvement_surcharge);
        congestion_surcharge.push(record.congestion_surcharge);
        airport_fee.push(record.airport_fee);
        cbd_congestion_fee.push(record.cbd_congestion_fee);
    }

    let result = sqlx::query(sql)
        .bind(pickup_time)
        .bind(dropoff_time)
        .bind(distance)
        .bind(fare)
        .bind(tip_amount)
        .bind(total_amount)
        .bind(passenger_count)
        .bind(pickup_zone_id)
        .bind(dropoff_zone_id)
        .bind(vendor_id)
        .bind(payment_id)
        .bind(pickup_long)
        .bind(pickup_lat)
        .bind(dropoff_long)
        .bind(dropoff_lat)
        .bind(ratecodeid)
        .bind(store_and_fwd_flag)
        .bind(extra)
        .bind(mta_tax)
        .bind(tolls_amount)
        .bind(improvement_surcharge)
        .bind(congestion_surcharge)
        .bind(airport_fee)
        .bind(cbd_congestion_fee)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tlc_model::schema::COLUMN_TABLE;

    fn trip(fare: Option<f64>) -> CoercedTrip {
        let pickup = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        CoercedTrip {
            pickup_time: Some(pickup),
            dropoff_time: Some(pickup + chrono::Duration::minutes(10)),
            fare,
            ..CoercedTrip::default()
        }
    }

    #[test]
    fn insert_columns_track_the_canonical_table() {
        assert_eq!(TRIP_COLUMNS.len(), COLUMN_TABLE.len());
        for ((name, _), canonical) in TRIP_COLUMNS.iter().zip(COLUMN_TABLE) {
            assert_eq!(*name, canonical.name);
        }
    }

    #[test]
    fn insert_sql_binds_one_array_per_column() {
        let sql = insert_trips_sql();
        assert!(sql.starts_with("INSERT INTO trips (pickup_time, dropoff_time,"));
        assert!(sql.contains("SELECT * FROM UNNEST($1::timestamp[], $2::timestamp[],"));
        assert!(sql.contains("$10::varchar[]"));
        assert!(sql.ends_with("$24::float8[])"));
        assert_eq!(sql.matches('$').count(), TRIP_COLUMNS.len());
    }

    #[test]
    fn partitioning_preserves_order_and_sizes() {
        let trips: Vec<CoercedTrip> = (0..5).map(|_| trip(Some(10.0))).collect();
        let chunks = partition_chunks(trips, 2);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);

        let cumulative: Vec<usize> = sizes
            .iter()
            .scan(0, |acc, size| {
                *acc += size;
                Some(*acc)
            })
            .collect();
        assert_eq!(cumulative, vec![2, 4, 5]);
    }

    #[test]
    fn partitioning_handles_exact_multiples_and_empty_input() {
        let trips: Vec<CoercedTrip> = (0..4).map(|_| trip(Some(10.0))).collect();
        let sizes: Vec<usize> = partition_chunks(trips, 2).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2]);
        assert!(partition_chunks(Vec::new(), 2).is_empty());
    }

    #[test]
    fn run_progress_accumulates_across_files() {
        // Chunk size 2 over a 5-row file, then a 2-row file: the run-wide
        // counter keeps climbing where the per-file one starts over.
        let mut progress = RunProgress::new();

        let first_file: Vec<u64> = vec![2, 2, 1];
        let first: Vec<u64> = first_file.iter().map(|rows| progress.record(*rows)).collect();
        assert_eq!(first, vec![2, 4, 5]);

        let second_file: Vec<u64> = vec![2];
        let second: Vec<u64> = second_file.iter().map(|rows| progress.record(*rows)).collect();
        assert_eq!(second, vec![7]);

        assert_eq!(progress.rows_loaded(), 7);
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let trips: Vec<CoercedTrip> = (0..3).map(|_| trip(Some(10.0))).collect();
        assert_eq!(partition_chunks(trips, 0).len(), 3);
    }

    #[test]
    fn rows_missing_required_fields_drop_whole() {
        let chunk = vec![trip(Some(14.5)), trip(None), trip(Some(9.0))];
        let (records, dropped) = storable_records(chunk);
        assert_eq!(records.len(), 2);
        assert_eq!(dropped, 1);
        assert_eq!(records[0].fare, 14.5);
        assert_eq!(records[1].fare, 9.0);
    }

    #[test]
    fn fully_invalid_chunk_drops_everything() {
        let chunk = vec![trip(None), trip(None)];
        let (records, dropped) = storable_records(chunk);
        assert!(records.is_empty());
        assert_eq!(dropped, 2);
    }
}
