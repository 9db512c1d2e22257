use super::Projector;
use crate::config::ProjectionConfig;
use crate::error::{ClusterError, Result};
use crate::rng::SplitMix64;
use ndarray::Array2;

const OUTPUT_DIM: usize = 2;
const EXAGGERATION_ITERATIONS: usize = 250;
const INITIAL_MOMENTUM: f64 = 0.5;
const FINAL_MOMENTUM: f64 = 0.8;
const MIN_PROBABILITY: f64 = 1e-12;
const BINARY_SEARCH_STEPS: usize = 100;
const ENTROPY_TOLERANCE: f64 = 1e-5;

/// Exact t-SNE (O(n²) per iteration).
///
/// Seeded: the same matrix, configuration and seed always give the same
/// layout. Perplexity above `(n - 1) / 3` is clamped for small stores.
#[derive(Debug, Clone)]
pub struct Tsne {
    perplexity: f64,
    iterations: usize,
    learning_rate: Option<f64>,
    early_exaggeration: f64,
    seed: u64,
}

impl Tsne {
    #[must_use]
    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self {
            perplexity: config.tsne_perplexity,
            iterations: config.tsne_iterations,
            learning_rate: config.tsne_learning_rate,
            early_exaggeration: config.tsne_early_exaggeration,
            seed: config.tsne_seed,
        }
    }

    fn effective_perplexity(&self, n: usize) -> f64 {
        let ceiling = ((n - 1) as f64 / 3.0).max(1.0);
        if self.perplexity > ceiling {
            log::warn!(
                "Clamping t-SNE perplexity {} to {ceiling:.2} for {n} records",
                self.perplexity
            );
            ceiling
        } else {
            self.perplexity
        }
    }

    fn learning_rate(&self, n: usize) -> f64 {
        self.learning_rate
            .unwrap_or_else(|| (n as f64 / self.early_exaggeration / 4.0).max(50.0))
    }

    /// Conditional affinities `p(j|i)`, each row tuned by binary search on
    /// the Gaussian precision until its entropy matches `ln(perplexity)`.
    fn conditional_affinities(distances: &[f64], n: usize, perplexity: f64) -> Vec<f64> {
        let target_entropy = perplexity.ln();
        let mut p = vec![0.0; n * n];

        for i in 0..n {
            let mut beta = 1.0_f64;
            let mut beta_min = f64::NEG_INFINITY;
            let mut beta_max = f64::INFINITY;

            for _ in 0..BINARY_SEARCH_STEPS {
                let mut sum = 0.0;
                for j in 0..n {
                    let v = if i == j {
                        0.0
                    } else {
                        (-beta * distances[i * n + j]).exp()
                    };
                    p[i * n + j] = v;
                    sum += v;
                }

                let mut entropy = 0.0;
                if sum > 0.0 {
                    for j in 0..n {
                        let pij = p[i * n + j] / sum;
                        p[i * n + j] = pij;
                        if pij > MIN_PROBABILITY {
                            entropy -= pij * pij.ln();
                        }
                    }
                }

                let diff = entropy - target_entropy;
                if diff.abs() < ENTROPY_TOLERANCE {
                    break;
                }
                if diff > 0.0 {
                    beta_min = beta;
                    beta = if beta_max.is_infinite() {
                        beta * 2.0
                    } else {
                        (beta + beta_max) / 2.0
                    };
                } else {
                    beta_max = beta;
                    beta = if beta_min.is_infinite() {
                        beta / 2.0
                    } else {
                        (beta + beta_min) / 2.0
                    };
                }
            }
        }
        p
    }

    fn joint_affinities(conditional: &[f64], n: usize) -> Vec<f64> {
        let mut p = vec![0.0; n * n];
        let scale = 2.0 * n as f64;
        for i in 0..n {
            for j in 0..n {
                p[i * n + j] =
                    ((conditional[i * n + j] + conditional[j * n + i]) / scale).max(MIN_PROBABILITY);
            }
        }
        p
    }
}

fn squared_distances(data: &Array2<f64>) -> Vec<f64> {
    let n = data.nrows();
    let mut distances = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d: f64 = data
                .row(i)
                .iter()
                .zip(data.row(j).iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            distances[i * n + j] = d;
            distances[j * n + i] = d;
        }
    }
    distances
}

impl Projector for Tsne {
    fn project(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        let n = data.nrows();
        if n < 2 {
            return Err(ClusterError::InsufficientData {
                required: 2,
                actual: n,
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ClusterError::Projection(
                "embedding matrix contains non-finite values".to_string(),
            ));
        }

        let perplexity = self.effective_perplexity(n);
        let learning_rate = self.learning_rate(n);
        let distances = squared_distances(data);
        let p = Self::joint_affinities(
            &Self::conditional_affinities(&distances, n, perplexity),
            n,
        );

        let mut rng = SplitMix64::new(self.seed);
        let mut y: Vec<f64> = (0..n * OUTPUT_DIM)
            .map(|_| rng.next_gaussian() * 1e-4)
            .collect();
        let mut velocity = vec![0.0; n * OUTPUT_DIM];
        let mut num = vec![0.0; n * n];
        let mut gradient = vec![0.0; n * OUTPUT_DIM];

        for iter in 0..self.iterations {
            let exaggeration = if iter < EXAGGERATION_ITERATIONS {
                self.early_exaggeration
            } else {
                1.0
            };
            let momentum = if iter < EXAGGERATION_ITERATIONS {
                INITIAL_MOMENTUM
            } else {
                FINAL_MOMENTUM
            };

            // Student-t affinities in the embedding
            let mut sum_num = 0.0;
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        num[i * n + j] = 0.0;
                        continue;
                    }
                    let dx = y[i * OUTPUT_DIM] - y[j * OUTPUT_DIM];
                    let dy = y[i * OUTPUT_DIM + 1] - y[j * OUTPUT_DIM + 1];
                    let v = 1.0 / (1.0 + dx * dx + dy * dy);
                    num[i * n + j] = v;
                    sum_num += v;
                }
            }
            let sum_num = sum_num.max(MIN_PROBABILITY);

            gradient.iter_mut().for_each(|g| *g = 0.0);
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let q = (num[i * n + j] / sum_num).max(MIN_PROBABILITY);
                    let mult = 4.0 * (exaggeration * p[i * n + j] - q) * num[i * n + j];
                    for k in 0..OUTPUT_DIM {
                        gradient[i * OUTPUT_DIM + k] +=
                            mult * (y[i * OUTPUT_DIM + k] - y[j * OUTPUT_DIM + k]);
                    }
                }
            }

            for (idx, value) in y.iter_mut().enumerate() {
                velocity[idx] = momentum * velocity[idx] - learning_rate * gradient[idx];
                *value += velocity[idx];
            }
        }

        if y.iter().any(|v| !v.is_finite()) {
            return Err(ClusterError::Projection(
                "t-SNE diverged to non-finite coordinates".to_string(),
            ));
        }

        Array2::from_shape_vec((n, OUTPUT_DIM), y)
            .map_err(|e| ClusterError::Projection(e.to_string()))
    }
}
