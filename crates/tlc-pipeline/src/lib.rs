pub mod config;
pub mod orchestrator;
pub mod report;

pub use config::RunConfig;
pub use orchestrator::{refresh_aggregates, run};
pub use report::{FileSchemaReport, RefreshReport, RunReport, write_report_json};

// Report building blocks from downstream crates, re-exported for callers
// that only hold a report.
pub use tlc_aggregate::AggregateRebuild;
pub use tlc_store::FileLoadReport;

#[cfg(test)]
mod tests {
    use super::*;
    use tlc_store::{DEFAULT_CHUNK_SIZE, DEFAULT_INSERT_BATCH_SIZE, StoreConfig};

    #[test]
    fn run_config_defaults_to_full_reload() {
        let store = StoreConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "nyc_taxi".to_string(),
            max_connections: 5,
        };
        let config = RunConfig::new(store, vec!["a.parquet".into(), "b.parquet".into()]);
        assert!(config.full_reload);
        assert!(config.zone_lookup.is_none());
        assert_eq!(config.input_files.len(), 2);
        assert_eq!(config.loader.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.loader.insert_batch_size, DEFAULT_INSERT_BATCH_SIZE);
    }
}
