use anyhow::{Context, Result};
use tracing::info;

use tlc_pipeline::{RefreshReport, RunConfig, RunReport, write_report_json};
use tlc_store::{LoaderConfig, StoreConfig};

use crate::cli::RunArgs;

/// Load the given extracts and rebuild the aggregates.
pub async fn run_load(args: &RunArgs) -> Result<RunReport> {
    let store = StoreConfig::from_env().context("read database configuration")?;
    let mut config = RunConfig::new(store, args.files.clone());
    config.full_reload = !args.append;
    config.zone_lookup = args.zones.clone();
    config.loader = LoaderConfig {
        chunk_size: args.chunk_size,
        insert_batch_size: args.insert_batch_size,
    };

    let report = tlc_pipeline::run(&config).await?;
    if let Some(path) = &args.report_json {
        write_report_json(path, &report)?;
        info!(path = %path.display(), "run report written");
    }
    Ok(report)
}

/// Rebuild the aggregates against whatever trips are already loaded.
pub async fn run_refresh() -> Result<RefreshReport> {
    let store = StoreConfig::from_env().context("read database configuration")?;
    tlc_pipeline::refresh_aggregates(&store).await
}
