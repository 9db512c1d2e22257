use crate::category::Category;
use crate::error::{AstError, Result};
use serde::{Deserialize, Serialize};

/// Node as it appears in the JSON sidecar, before category validation.
///
/// Older sidecars name the category `container` and the order index
/// `master_index`; both spellings are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawNode {
    #[serde(alias = "container")]
    pub category: String,
    #[serde(alias = "master_index")]
    pub order_index: usize,
    pub position: usize,
    pub characters_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
}

/// A typed AST node.
///
/// `position` is 1-based and counted in characters; the node covers
/// `characters_count` characters starting there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AstNode {
    pub category: Category,
    pub order_index: usize,
    pub position: usize,
    pub characters_count: usize,
    /// `None` when the sidecar omitted the field, kept apart from an empty
    /// list so documents serialize back unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AstNode>>,
}

impl AstNode {
    /// Create a node without children
    #[must_use]
    pub const fn leaf(
        category: Category,
        order_index: usize,
        position: usize,
        characters_count: usize,
    ) -> Self {
        Self {
            category,
            order_index,
            position,
            characters_count,
            children: None,
        }
    }

    /// Builder: attach children
    #[must_use]
    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Children in input order (empty when absent)
    #[must_use]
    pub fn children(&self) -> &[AstNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }
}

impl TryFrom<RawNode> for AstNode {
    type Error = AstError;

    /// Converts without recursion, so chains of any depth are accepted
    fn try_from(raw: RawNode) -> Result<Self> {
        let mut root = PendingNode::open(raw)?;
        let mut stack: Vec<PendingNode> = Vec::new();

        loop {
            let top = stack.last_mut().unwrap_or(&mut root);
            if let Some(child) = top.next_child() {
                stack.push(PendingNode::open(child)?);
                continue;
            }
            match stack.pop() {
                Some(done) => stack.last_mut().unwrap_or(&mut root).built.push(done.close()),
                None => return Ok(root.close()),
            }
        }
    }
}

/// A node whose category is validated and whose children are still being
/// converted
struct PendingNode {
    node: AstNode,
    pending: Option<std::vec::IntoIter<RawNode>>,
    built: Vec<AstNode>,
}

impl PendingNode {
    fn open(mut raw: RawNode) -> Result<Self> {
        let category =
            raw.category
                .parse::<Category>()
                .map_err(|err| AstError::UnknownCategory {
                    category: err.0,
                    order_index: raw.order_index,
                })?;
        let pending = raw.children.take().map(Vec::into_iter);
        let built = Vec::with_capacity(pending.as_ref().map_or(0, ExactSizeIterator::len));

        Ok(Self {
            node: AstNode::leaf(category, raw.order_index, raw.position, raw.characters_count),
            pending,
            built,
        })
    }

    fn next_child(&mut self) -> Option<RawNode> {
        self.pending.as_mut()?.next()
    }

    fn close(mut self) -> AstNode {
        if self.pending.is_some() {
            self.node.children = Some(self.built);
        }
        self.node
    }
}

// Deep chains would overflow the call stack with the derived recursive drop.
impl Drop for RawNode {
    fn drop(&mut self) {
        let mut pending = self.children.take().unwrap_or_default();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.take().unwrap_or_default());
        }
    }
}

impl Drop for AstNode {
    fn drop(&mut self) {
        let mut pending = self.children.take().unwrap_or_default();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.take().unwrap_or_default());
        }
    }
}

/// One step of a pre-order walk
#[derive(Debug, Clone, Copy)]
pub struct NodeVisit<'a> {
    pub node: &'a AstNode,
    /// Root nodes have depth 0
    pub depth: usize,
    pub parent: Option<&'a AstNode>,
}

/// Pre-order iterator over a forest of nodes.
///
/// Uses an explicit stack, so depth is bounded by heap rather than the call
/// stack. Parents are yielded before their children; siblings keep input
/// order.
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    stack: Vec<NodeVisit<'a>>,
}

impl<'a> Preorder<'a> {
    #[must_use]
    pub fn new(roots: &'a [AstNode]) -> Self {
        let stack = roots
            .iter()
            .rev()
            .map(|node| NodeVisit {
                node,
                depth: 0,
                parent: None,
            })
            .collect();
        Self { stack }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        for child in visit.node.children().iter().rev() {
            self.stack.push(NodeVisit {
                node: child,
                depth: visit.depth + 1,
                parent: Some(visit.node),
            });
        }
        Some(visit)
    }
}
