use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown vendor code: {0}")]
    UnknownVendor(String),
}
