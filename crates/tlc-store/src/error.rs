use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store configuration: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("chunk {chunk} failed to load: {source}")]
    Insertion {
        chunk: usize,
        #[source]
        source: sqlx::Error,
    },
    #[error("zone lookup read: {0}")]
    ZoneLookup(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
