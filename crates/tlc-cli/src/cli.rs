//! CLI argument definitions for the warehouse loader.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use tlc_store::{DEFAULT_CHUNK_SIZE, DEFAULT_INSERT_BATCH_SIZE};

#[derive(Parser)]
#[command(
    name = "tlc-warehouse",
    version,
    about = "NYC TLC trip warehouse - load trip records into PostgreSQL",
    long_about = "Load NYC TLC trip-record extracts into a PostgreSQL warehouse.\n\n\
                  Reads CSV or Parquet extracts, maps vendor column names onto the\n\
                  canonical trip schema, bulk-loads in chunked transactions, and\n\
                  rebuilds the materialized aggregates the query layer reads.\n\
                  Connection settings come from PGHOST/PGPORT/PGUSER/PGPASSWORD\n\
                  and TLC_DB_NAME (a .env file is honored)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load trip extracts and rebuild the aggregates.
    Run(RunArgs),

    /// Rebuild the materialized aggregates without reloading any data.
    Refresh,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Trip extract files (.csv or .parquet), loaded in the order given.
    #[arg(value_name = "FILE", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Append to the existing trips table instead of dropping and reloading it.
    #[arg(long = "append")]
    pub append: bool,

    /// Taxi zone lookup CSV; replaces the zones table on a full reload.
    #[arg(long = "zones", value_name = "PATH")]
    pub zones: Option<PathBuf>,

    /// Rows per load transaction.
    #[arg(long = "chunk-size", value_name = "ROWS", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Rows per INSERT statement within a transaction.
    #[arg(
        long = "insert-batch-size",
        value_name = "ROWS",
        default_value_t = DEFAULT_INSERT_BATCH_SIZE
    )]
    pub insert_batch_size: usize,

    /// Write the run report as JSON to this path.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
