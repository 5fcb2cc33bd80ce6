use thiserror::Error;

pub type CrmResult<T> = Result<T, CrmError>;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {field}")]
    Validation { field: &'static str },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CrmError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CrmError::NotFound { kind, id: id.into() }
    }

    /// Short machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            CrmError::Config(_) => "config_error",
            CrmError::Validation { .. } => "validation_failed",
            CrmError::NotFound { .. } => "not_found",
            CrmError::Export(_) => "export_failed",
            CrmError::Serialization(_) => "serialization_error",
            CrmError::Io(_) => "io_error",
            CrmError::Internal(_) => "internal_error",
        }
    }
}
