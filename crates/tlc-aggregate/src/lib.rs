pub mod catalog;
pub mod error;
pub mod manager;

pub use catalog::{AGGREGATES, AggregateDef, CATALOG_VERSION, aggregate};
pub use error::{RefreshError, RefreshStep, Result};
pub use manager::{AggregateRebuild, MaterializedAggregateManager};
