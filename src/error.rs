use thiserror::Error;

#[derive(Error, Debug)]
pub enum BilledError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Unknown report: {0}")]
    NotFound(String),

    #[error("Invalid credentials for {0}")]
    InvalidCredentials(String),

    #[error("No data store configured")]
    MissingStore,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BilledError>;
