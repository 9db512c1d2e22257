use super::Projector;
use crate::error::{ClusterError, Result};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array2, Axis};

/// Principal component analysis onto the top two variance directions.
///
/// Deterministic for a given matrix. Each axis is oriented so its
/// largest-magnitude loading is positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pca;

impl Pca {
    /// Principal directions as a `d × k` matrix (k ≤ 2), strongest first
    fn components(centered: &Array2<f64>) -> Array2<f64> {
        let (n, d) = centered.dim();
        let cov = centered.t().dot(centered) / (n - 1) as f64;
        let eigen = SymmetricEigen::new(DMatrix::from_fn(d, d, |i, j| cov[[i, j]]));

        let mut order: Vec<usize> = (0..d).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[b]
                .partial_cmp(&eigen.eigenvalues[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let k = d.min(2);
        let mut components = Array2::<f64>::zeros((d, k));
        for (col, &idx) in order.iter().take(k).enumerate() {
            let pivot = (0..d)
                .map(|row| eigen.eigenvectors[(row, idx)])
                .fold(0.0_f64, |acc, v| if v.abs() > acc.abs() { v } else { acc });
            let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
            for row in 0..d {
                components[[row, col]] = sign * eigen.eigenvectors[(row, idx)];
            }
        }
        components
    }
}

impl Projector for Pca {
    fn project(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        let (n, d) = data.dim();
        if n < 2 {
            return Err(ClusterError::InsufficientData {
                required: 2,
                actual: n,
            });
        }
        if d == 0 {
            return Err(ClusterError::Projection(
                "embeddings have no dimensions".to_string(),
            ));
        }

        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| ClusterError::Projection("empty embedding matrix".to_string()))?;
        let centered = data - &mean;
        let projected = centered.dot(&Self::components(&centered));

        let mut coords = Array2::<f64>::zeros((n, 2));
        coords
            .slice_mut(ndarray::s![.., ..projected.ncols()])
            .assign(&projected);
        Ok(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn dist(m: &Array2<f64>, a: usize, b: usize) -> f64 {
        (m[[a, 0]] - m[[b, 0]]).hypot(m[[a, 1]] - m[[b, 1]])
    }

    #[test]
    fn one_hot_points_stay_equidistant() {
        let data = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let coords = Pca.project(&data).unwrap();
        let d01 = dist(&coords, 0, 1);
        let d02 = dist(&coords, 0, 2);
        let d12 = dist(&coords, 1, 2);
        assert!((d01 - d02).abs() < 1e-9);
        assert!((d01 - d12).abs() < 1e-9);
        assert!((d01 - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn first_axis_follows_the_dominant_variance() {
        let data = array![[0.0, 0.0], [10.0, 0.1], [20.0, -0.1], [30.0, 0.0]];
        let coords = Pca.project(&data).unwrap();
        // points keep their order along the first axis (sign normalised)
        assert!(coords[[0, 0]] < coords[[1, 0]]);
        assert!(coords[[1, 0]] < coords[[2, 0]]);
        assert!(coords[[2, 0]] < coords[[3, 0]]);
        assert!(coords.column(1).iter().all(|v| v.abs() < 1.0));
    }

    #[test]
    fn repeated_projection_is_identical() {
        let data = array![[0.2, 0.5, 0.3], [0.7, 0.1, 0.2], [0.1, 0.1, 0.8], [0.4, 0.4, 0.2]];
        assert_eq!(Pca.project(&data).unwrap(), Pca.project(&data).unwrap());
    }

    #[test]
    fn single_feature_pads_second_axis() {
        let data = array![[1.0], [3.0]];
        let coords = Pca.project(&data).unwrap();
        assert_eq!(coords.shape(), &[2, 2]);
        assert!((coords[[0, 0]] + 1.0).abs() < 1e-9);
        assert!((coords[[1, 0]] - 1.0).abs() < 1e-9);
        assert_eq!(coords[[0, 1]], 0.0);
    }

    #[test]
    fn needs_two_rows() {
        let data = array![[1.0, 2.0]];
        assert!(matches!(
            Pca.project(&data),
            Err(ClusterError::InsufficientData { actual: 1, .. })
        ));
    }
}
