use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Version catalog error: {0}")]
    Catalog(String),

    #[error("Metadata lookup failed: {0}")]
    Metadata(String),

    #[error("Failed to write {} report(s): {}", .0.len(), .0.join("; "))]
    ReportWrite(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VersionsError>;
