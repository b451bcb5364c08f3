//! CLI library components for the warehouse loader.

pub mod logging;
