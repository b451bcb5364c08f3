//! End-to-end warehouse refresh: bootstrap the database, seed reference data,
//! load trip extracts, then rebuild the aggregate catalog.
//!
//! Stages run in order and each depends on the previous one. Reference rows
//! must exist before trips reference them, trips must be loaded before the
//! aggregates that read them. A stage failure aborts the run; work already
//! committed stays committed.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use tlc_aggregate::{AggregateRebuild, MaterializedAggregateManager};
use tlc_ingest::ingest_trip_file;
use tlc_store::{
    ChunkedBulkLoader, FileLoadReport, Store, StoreConfig, ensure_database, load_zones,
    seed_payments, seed_vendors,
};

use crate::config::RunConfig;
use crate::report::{FileSchemaReport, RefreshReport, RunReport};

/// Run the full pipeline and report what it did.
///
/// # Errors
/// Fails when any stage fails: connection or bootstrap errors, unreadable
/// input files, a chunk that will not insert, or an aggregate that will not
/// rebuild. Chunks committed before the failure stay in the database.
pub async fn run(config: &RunConfig) -> Result<RunReport> {
    if config.input_files.is_empty() {
        bail!("no input files to load");
    }
    let run_start = Instant::now();

    let (store, database_created) = bootstrap(config).await?;
    let reference = prepare_reference_data(&store, config).await?;
    prepare_trips_table(&store, config).await?;
    let loaded = load_trip_files(&store, config).await?;
    let aggregates = finalize(&store).await?;
    store.close().await;

    let report = RunReport {
        database: config.store.database.clone(),
        database_created,
        full_reload: config.full_reload,
        vendors_seeded: reference.vendors_seeded,
        payments_seeded: reference.payments_seeded,
        zones_loaded: reference.zones_loaded,
        files: loaded.files,
        schema: loaded.schema,
        skipped_files: loaded.skipped_files,
        aggregates,
        elapsed_ms: run_start.elapsed().as_millis() as u64,
    };
    info!(
        database = %report.database,
        files = report.files.len(),
        rows_loaded = report.rows_loaded(),
        rows_dropped = report.rows_dropped(),
        aggregates = report.aggregates.len(),
        duration_ms = report.elapsed_ms,
        "pipeline run complete"
    );
    Ok(report)
}

/// Rebuild the aggregate catalog without reloading any trips.
///
/// # Errors
/// Fails when the trips table does not exist yet or an aggregate will not
/// rebuild.
pub async fn refresh_aggregates(config: &StoreConfig) -> Result<RefreshReport> {
    let refresh_start = Instant::now();
    let store = Store::connect(config)
        .await
        .with_context(|| format!("connect to database {}", config.database))?;

    if !store.table_exists("public.trips").await? {
        bail!(
            "trips table not found in database {}; load trip data before refreshing aggregates",
            config.database
        );
    }
    store
        .ensure_trips_indexes()
        .await
        .context("ensure trips indexes")?;
    let manager = MaterializedAggregateManager::new(&store);
    let aggregates = manager
        .rebuild_all()
        .await
        .context("rebuild aggregates")?;
    store.close().await;

    let report = RefreshReport {
        database: config.database.clone(),
        aggregates,
        elapsed_ms: refresh_start.elapsed().as_millis() as u64,
    };
    info!(
        database = %report.database,
        aggregates = report.aggregates.len(),
        duration_ms = report.elapsed_ms,
        "aggregate refresh complete"
    );
    Ok(report)
}

// ============================================================================
// Stage 1: Bootstrap
// ============================================================================

/// Create the database when absent, then open the pool against it.
async fn bootstrap(config: &RunConfig) -> Result<(Store, bool)> {
    let created = ensure_database(&config.store)
        .await
        .with_context(|| format!("ensure database {}", config.store.database))?;
    let store = Store::connect(&config.store)
        .await
        .with_context(|| format!("connect to database {}", config.store.database))?;
    info!(database = %config.store.database, created, "database ready");
    Ok((store, created))
}

// ============================================================================
// Stage 2: Reference data
// ============================================================================

#[derive(Debug)]
struct ReferenceDataResult {
    vendors_seeded: u64,
    payments_seeded: u64,
    zones_loaded: Option<usize>,
}

/// Create and seed the lookup tables trips will reference.
///
/// Vendors and payments are fixed catalogs, inserted idempotently. Zones come
/// from the lookup file and replace the existing set, but only on a full
/// reload: the replacement truncates with CASCADE, which would also empty a
/// trips table we were asked to append to.
async fn prepare_reference_data(store: &Store, config: &RunConfig) -> Result<ReferenceDataResult> {
    store
        .ensure_reference_tables()
        .await
        .context("ensure reference tables")?;
    let vendors_seeded = seed_vendors(store).await.context("seed vendors")?;
    let payments_seeded = seed_payments(store).await.context("seed payments")?;

    let zones_loaded = match (&config.zone_lookup, config.full_reload) {
        (Some(path), true) => {
            if path.is_file() {
                let count = load_zones(store, path)
                    .await
                    .with_context(|| format!("load zone lookup {}", path.display()))?;
                Some(count)
            } else {
                warn!(path = %path.display(), "zone lookup file not found, keeping existing zones");
                None
            }
        }
        (Some(path), false) => {
            info!(path = %path.display(), "append mode, skipping zone reload");
            None
        }
        (None, _) => None,
    };

    info!(
        vendors_seeded,
        payments_seeded,
        zones_loaded = zones_loaded.unwrap_or(0),
        "reference data ready"
    );
    Ok(ReferenceDataResult {
        vendors_seeded,
        payments_seeded,
        zones_loaded,
    })
}

// ============================================================================
// Stage 3: Trips table
// ============================================================================

/// Create the trips table and its indexes. A full reload drops any existing
/// table first so the run starts from an empty one.
async fn prepare_trips_table(store: &Store, config: &RunConfig) -> Result<()> {
    store
        .ensure_trips_table(config.full_reload)
        .await
        .context("ensure trips table")?;
    store
        .ensure_trips_indexes()
        .await
        .context("ensure trips indexes")?;
    info!(full_reload = config.full_reload, "trips table ready");
    Ok(())
}

// ============================================================================
// Stage 4: Load trip files
// ============================================================================

#[derive(Debug)]
struct LoadResult {
    files: Vec<FileLoadReport>,
    schema: Vec<FileSchemaReport>,
    skipped_files: Vec<String>,
}

/// Ingest and load each input file in the order given.
///
/// A missing file is skipped with a warning so one bad path does not abort a
/// multi-month run; a file that reads but will not load is fatal. If every
/// file was skipped the run fails.
async fn load_trip_files(store: &Store, config: &RunConfig) -> Result<LoadResult> {
    // One loader for the whole run; its progress counter makes each chunk
    // log show the cumulative row count across all files, not just the
    // current one.
    let mut loader = ChunkedBulkLoader::new(store, config.loader.clone());
    let mut files = Vec::with_capacity(config.input_files.len());
    let mut schema = Vec::new();
    let mut skipped_files = Vec::new();

    for path in &config.input_files {
        if !path.is_file() {
            warn!(path = %path.display(), "input file not found, skipping");
            skipped_files.push(path.display().to_string());
            continue;
        }
        let source = path.display().to_string();
        let ingested =
            ingest_trip_file(path).with_context(|| format!("ingest {}", path.display()))?;
        if !ingested.missing_columns.is_empty() || !ingested.dropped_columns.is_empty() {
            schema.push(FileSchemaReport {
                source: source.clone(),
                missing_columns: ingested
                    .missing_columns
                    .iter()
                    .map(|name| (*name).to_string())
                    .collect(),
                dropped_columns: ingested.dropped_columns.clone(),
            });
        }
        let report = loader
            .load_file(&source, ingested.trips)
            .await
            .with_context(|| format!("load {}", path.display()))?;
        files.push(report);
    }

    if files.is_empty() {
        bail!("none of the input files could be read");
    }
    Ok(LoadResult {
        files,
        schema,
        skipped_files,
    })
}

// ============================================================================
// Stage 5: Finalize
// ============================================================================

/// Refresh planner statistics, then rebuild every aggregate.
async fn finalize(store: &Store) -> Result<Vec<AggregateRebuild>> {
    store
        .vacuum_analyze_trips()
        .await
        .context("vacuum analyze trips")?;
    let manager = MaterializedAggregateManager::new(store);
    let aggregates = manager
        .rebuild_all()
        .await
        .context("rebuild aggregates")?;
    Ok(aggregates)
}
