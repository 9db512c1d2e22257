use thiserror::Error;

/// Result type for sample and AST operations
pub type Result<T> = std::result::Result<T, AstError>;

/// Errors raised while loading a sample or flattening its AST
#[derive(Error, Debug)]
pub enum AstError {
    /// Sample locator is missing or ambiguous (neither or both of path/url)
    #[error("Input error: {0}")]
    Input(String),

    /// Source bytes could not be decoded into text
    #[error("Decode error: {0}")]
    Decode(String),

    /// AST node carries a category outside the fixed set
    #[error("Unknown category '{category}' at node {order_index}")]
    UnknownCategory { category: String, order_index: usize },

    /// Node span does not fit inside the source text
    #[error(
        "Node {order_index} span out of range: position={position}, characters_count={characters_count}, source length={source_len}"
    )]
    Range {
        order_index: usize,
        position: usize,
        characters_count: usize,
        source_len: usize,
    },

    /// Remote sample could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar JSON is malformed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AstError {
    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Short machine-readable kind, used by the HTTP layer
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Decode(_) => "decode",
            Self::UnknownCategory { .. } => "unknown_category",
            Self::Range { .. } => "range",
            Self::Fetch(_) => "fetch",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}

impl From<reqwest::Error> for AstError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}
