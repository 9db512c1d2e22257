use codenn_ast::AstError;
use codenn_cluster::ClusterError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Ast(#[from] AstError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Layout error: {0}")]
    Layout(String),
}

impl SceneError {
    /// Short machine-readable kind, used by the HTTP layer
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ast(err) => err.kind(),
            Self::Cluster(err) => err.kind(),
            Self::InvalidConfig(_) => "invalid_config",
            Self::Layout(_) => "layout",
        }
    }
}
