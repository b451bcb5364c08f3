use std::path::PathBuf;

use tlc_store::{LoaderConfig, StoreConfig};

/// Everything one pipeline run needs, assembled by the caller and passed
/// down whole; stages never reach into globals.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub store: StoreConfig,
    /// Trip extracts, loaded in listed order.
    pub input_files: Vec<PathBuf>,
    /// Zone lookup file; absent or unset skips the zone stage.
    pub zone_lookup: Option<PathBuf>,
    /// Drop and recreate the base table before loading (the default run
    /// shape). When off, new rows append and the zone stage is skipped.
    pub full_reload: bool,
    pub loader: LoaderConfig,
}

impl RunConfig {
    pub fn new(store: StoreConfig, input_files: Vec<PathBuf>) -> Self {
        Self {
            store,
            input_files,
            zone_lookup: None,
            full_reload: true,
            loader: LoaderConfig::default(),
        }
    }
}
