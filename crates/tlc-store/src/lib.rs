pub mod config;
pub mod error;
pub mod loader;
pub mod schema;
pub mod seed;
pub mod store;

pub use config::{ADMIN_DATABASE, StoreConfig};
pub use error::{Result, StoreError};
pub use loader::{
    ChunkedBulkLoader, DEFAULT_CHUNK_SIZE, DEFAULT_INSERT_BATCH_SIZE, FileLoadReport, LoaderConfig,
    RunProgress, insert_trips_sql, partition_chunks, storable_records,
};
pub use seed::{load_zones, read_zone_lookup, replace_zones, seed_payments, seed_vendors};
pub use store::{Store, ensure_database};
