use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Model input error: {0}")]
    ModelInput(String),

    #[error("Insufficient data: projection needs at least {required} records, store has {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ClusterError {
    pub fn model_input(msg: impl Into<String>) -> Self {
        Self::ModelInput(msg.into())
    }

    /// Short machine-readable kind, used by the HTTP layer
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ModelInput(_) => "model_input",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::InvalidDimension { .. } => "invalid_dimension",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Projection(_) => "projection",
            Self::IoError(_) => "io",
            Self::SerializationError(_) => "json",
        }
    }
}
