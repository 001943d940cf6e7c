use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Fallback error: {0}")]
    Fallback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
