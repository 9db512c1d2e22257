use clap::ValueEnum;
use codenn_cluster::Algorithm;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum AlgorithmFlag {
    Pca,
    #[value(alias = "t-sne")]
    Tsne,
}

impl AlgorithmFlag {
    pub const fn as_domain(self) -> Algorithm {
        match self {
            AlgorithmFlag::Pca => Algorithm::Pca,
            AlgorithmFlag::Tsne => Algorithm::Tsne,
        }
    }
}
