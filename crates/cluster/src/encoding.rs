use crate::error::{ClusterError, Result};
use codenn_ast::{AstNode, Category, Preorder, SourceSample, SourceText};

/// Token used for padding positions
pub const PAD_TOKEN: u8 = 0;

/// Token of a category in the model's input vocabulary (1-based, 0 is padding)
#[must_use]
pub const fn category_token(category: Category) -> u8 {
    category.index() as u8 + 1
}

fn token_category(token: u8) -> Option<Category> {
    match token {
        PAD_TOKEN => None,
        t => Category::ALL.get(usize::from(t) - 1).copied(),
    }
}

/// Fixed-shape encoding of a sample: the pre-order category sequence and
/// node depths, padded or truncated to the model's sequence length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInput {
    tokens: Vec<u8>,
    depths: Vec<u16>,
    length: usize,
    node_count: usize,
}

impl ModelInput {
    pub fn encode(sample: &SourceSample, sequence_length: usize) -> Result<Self> {
        Self::from_nodes(sample.text(), sample.nodes(), sequence_length)
    }

    /// Encode a node forest over its source text.
    ///
    /// Fails with a model input error when the source is empty, the forest
    /// has no nodes, or a node span does not fit in the text.
    pub fn from_nodes(text: &SourceText, nodes: &[AstNode], sequence_length: usize) -> Result<Self> {
        if sequence_length == 0 {
            return Err(ClusterError::model_input("sequence length must be > 0"));
        }
        if text.is_empty() {
            return Err(ClusterError::model_input("source text is empty"));
        }
        if nodes.is_empty() {
            return Err(ClusterError::model_input("AST has no nodes"));
        }

        let mut tokens = vec![PAD_TOKEN; sequence_length];
        let mut depths = vec![0u16; sequence_length];
        let mut node_count = 0;

        for visit in Preorder::new(nodes) {
            let node = visit.node;
            text.span(node.order_index, node.position, node.characters_count)
                .map_err(|err| ClusterError::model_input(format!("malformed AST: {err}")))?;
            if node_count < sequence_length {
                tokens[node_count] = category_token(node.category);
                depths[node_count] = u16::try_from(visit.depth).unwrap_or(u16::MAX);
            }
            node_count += 1;
        }

        if node_count > sequence_length {
            log::debug!("Truncated {node_count} nodes to sequence length {sequence_length}");
        }

        Ok(Self {
            tokens,
            depths,
            length: node_count.min(sequence_length),
            node_count,
        })
    }

    /// Padded token sequence
    #[must_use]
    pub fn tokens(&self) -> &[u8] {
        &self.tokens
    }

    /// Padded depth sequence
    #[must_use]
    pub fn depths(&self) -> &[u16] {
        &self.depths
    }

    /// Number of real (non-padding) positions
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[must_use]
    pub fn sequence_length(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.node_count > self.length
    }

    /// Categories of the real positions, in sequence order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.tokens[..self.length]
            .iter()
            .filter_map(|&t| token_category(t))
    }
}
