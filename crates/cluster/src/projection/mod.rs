//! Dimensionality reduction from the embedding matrix to 2-D.

mod pca;
mod tsne;

pub use pca::Pca;
pub use tsne::Tsne;

use crate::error::Result;
use ndarray::Array2;

/// Maps an `n × d` matrix to `n × 2` coordinates, row order preserved
pub trait Projector {
    fn project(&self, data: &Array2<f64>) -> Result<Array2<f64>>;
}
