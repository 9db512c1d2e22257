use crate::category::Category;
use crate::error::Result;
use crate::node::{AstNode, Preorder};
use crate::source::{display_text, SourceText};
use serde::Serialize;
use std::collections::BTreeMap;

/// Location of a node in the source text (1-based character position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeSpan {
    pub position: usize,
    pub characters_count: usize,
}

impl NodeSpan {
    /// Zero-based char range `[start, end)`
    #[must_use]
    pub const fn char_range(self) -> (usize, usize) {
        let start = self.position.saturating_sub(1);
        (start, start + self.characters_count)
    }
}

/// Points of a single category, as parallel sequences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTrace {
    /// Order index of each node
    pub x: Vec<usize>,
    /// Category label of each node (constant within a trace)
    pub y: Vec<Category>,
    /// Source substring with newlines replaced by the display marker
    pub text: Vec<String>,
    pub spans: Vec<NodeSpan>,
    pub depths: Vec<usize>,
    /// Order index of the parent node, `None` for roots
    pub parents: Vec<Option<usize>>,
}

impl CategoryTrace {
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Identity of one flattened point: its category bucket and index within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PointRef {
    pub category: Category,
    pub index: usize,
}

/// Category → trace mapping produced by a single pre-order walk.
///
/// Every category has a bucket, possibly empty. `emission` records the global
/// walk order so views can be cross-linked by point identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTraces {
    traces: BTreeMap<Category, CategoryTrace>,
    emission: Vec<PointRef>,
}

impl Default for CategoryTraces {
    fn default() -> Self {
        Self {
            traces: Category::ALL
                .iter()
                .map(|&category| (category, CategoryTrace::default()))
                .collect(),
            emission: Vec::new(),
        }
    }
}

impl CategoryTraces {
    /// Trace for a category
    #[must_use]
    pub fn get(&self, category: Category) -> &CategoryTrace {
        // Default fills every category, so the bucket always exists.
        &self.traces[&category]
    }

    /// Traces in canonical category order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryTrace)> + '_ {
        self.traces.iter().map(|(category, trace)| (*category, trace))
    }

    /// Points in the order the walk emitted them
    #[must_use]
    pub fn emission(&self) -> &[PointRef] {
        &self.emission
    }

    /// Total number of points across all categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.emission.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emission.is_empty()
    }

    /// Display text of a point
    #[must_use]
    pub fn text_of(&self, point: PointRef) -> Option<&str> {
        self.traces
            .get(&point.category)
            .and_then(|trace| trace.text.get(point.index))
            .map(String::as_str)
    }

    /// Span of a point
    #[must_use]
    pub fn span_of(&self, point: PointRef) -> Option<NodeSpan> {
        self.traces
            .get(&point.category)
            .and_then(|trace| trace.spans.get(point.index))
            .copied()
    }

    fn push(
        &mut self,
        node: &AstNode,
        text: String,
        depth: usize,
        parent: Option<usize>,
    ) {
        let trace = self.traces.entry(node.category).or_default();
        let index = trace.len();
        trace.x.push(node.order_index);
        trace.y.push(node.category);
        trace.text.push(text);
        trace.spans.push(NodeSpan {
            position: node.position,
            characters_count: node.characters_count,
        });
        trace.depths.push(depth);
        trace.parents.push(parent);
        self.emission.push(PointRef {
            category: node.category,
            index,
        });
    }
}

/// Walks a node forest and buckets every node by category.
///
/// The walk is pre-order with an explicit stack: a node is emitted before
/// its descendants and siblings keep their input order. A span that does not
/// fit in the source text aborts the walk with a range error.
#[derive(Debug, Clone, Copy)]
pub struct Flattener<'a> {
    source: &'a SourceText,
}

impl<'a> Flattener<'a> {
    #[must_use]
    pub const fn new(source: &'a SourceText) -> Self {
        Self { source }
    }

    pub fn flatten(&self, roots: &[AstNode]) -> Result<CategoryTraces> {
        let mut traces = CategoryTraces::default();
        for visit in Preorder::new(roots) {
            let node = visit.node;
            let raw = self
                .source
                .span(node.order_index, node.position, node.characters_count)?;
            traces.push(
                node,
                display_text(raw),
                visit.depth,
                visit.parent.map(|p| p.order_index),
            );
        }
        log::debug!("Flattened {} nodes", traces.len());
        Ok(traces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AstError;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_function_node() {
        let source = SourceText::from("func end");
        let nodes = vec![AstNode::leaf(Category::Function, 0, 1, 4)];
        let traces = Flattener::new(&source).flatten(&nodes).unwrap();

        let function = traces.get(Category::Function);
        assert_eq!(function.x, vec![0]);
        assert_eq!(function.y, vec![Category::Function]);
        assert_eq!(function.text, vec!["func".to_string()]);

        for category in Category::ALL {
            if category != Category::Function {
                assert!(traces.get(category).is_empty());
            }
        }
    }

    #[test]
    fn newlines_become_break_markers() {
        let source = SourceText::from("local t = {\n  a = 1\n}");
        let nodes = vec![AstNode::leaf(Category::Variable, 0, 1, 21)];
        let traces = Flattener::new(&source).flatten(&nodes).unwrap();
        assert_eq!(
            traces.get(Category::Variable).text,
            vec!["local t = {<br>  a = 1<br>}".to_string()]
        );
    }

    #[test]
    fn children_follow_parent_and_record_depth() {
        let source = SourceText::from("function f() local x = 1 end");
        let nodes = vec![AstNode::leaf(Category::Function, 0, 1, 28).with_children(vec![
            AstNode::leaf(Category::Variable, 1, 14, 11),
            AstNode::leaf(Category::Other, 2, 26, 3),
        ])];
        let traces = Flattener::new(&source).flatten(&nodes).unwrap();

        let order: Vec<Category> = traces.emission().iter().map(|p| p.category).collect();
        assert_eq!(
            order,
            vec![Category::Function, Category::Variable, Category::Other]
        );
        let variable = traces.get(Category::Variable);
        assert_eq!(variable.text, vec!["local x = 1".to_string()]);
        assert_eq!(variable.depths, vec![1]);
        assert_eq!(variable.parents, vec![Some(0)]);
        assert_eq!(traces.get(Category::Function).parents, vec![None]);
    }

    #[test]
    fn out_of_range_child_fails_the_walk() {
        let source = SourceText::from("abc");
        let nodes = vec![AstNode::leaf(Category::Other, 0, 1, 3)
            .with_children(vec![AstNode::leaf(Category::Other, 1, 2, 5)])];
        let err = Flattener::new(&source).flatten(&nodes).unwrap_err();
        assert!(matches!(err, AstError::Range { order_index: 1, .. }));
    }

    #[test]
    fn lookup_by_point_ref() {
        let source = SourceText::from("-- note\nx = 1");
        let nodes = vec![
            AstNode::leaf(Category::Comment, 0, 1, 7),
            AstNode::leaf(Category::Variable, 1, 9, 5),
        ];
        let traces = Flattener::new(&source).flatten(&nodes).unwrap();
        let second = traces.emission()[1];
        assert_eq!(traces.text_of(second), Some("x = 1"));
        assert_eq!(
            traces.span_of(second),
            Some(NodeSpan {
                position: 9,
                characters_count: 5
            })
        );
        assert_eq!(NodeSpan { position: 9, characters_count: 5 }.char_range(), (8, 13));
    }
}
