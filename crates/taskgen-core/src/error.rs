use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskgenError {
    #[error("{0}")]
    Validation(String),

    #[error("spec not found: {0}")]
    SpecNotFound(String),

    #[error("failed to save spec: {0}")]
    Storage(String),

    #[error("unknown export format '{0}': expected markdown or text")]
    InvalidExportFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskgenError>;
