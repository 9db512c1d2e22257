use crate::config::SceneConfig;
use crate::error::{Result, SceneError};
use crate::scene::{Axis, Coord, Layout, Line, Marker, Scene, Trace};
use codenn_ast::{AstNode, Category};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;
use petgraph::Direction;
use std::collections::BTreeMap;

pub const TREE_TITLE: &str = "Input AST structure";

/// A node placed in the tree layout
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub category: Category,
    pub order_index: usize,
    pub depth: usize,
    /// Position across the tree: consecutive integers for leaves, the mean
    /// of the children for inner nodes
    pub slot: f64,
}

/// AST forest as a directed parent → child graph with layout slots
#[derive(Debug, Clone)]
pub struct TreeLayout {
    graph: DiGraph<TreeNode, ()>,
    roots: Vec<NodeIndex>,
}

impl TreeLayout {
    pub fn build(roots: &[AstNode]) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut root_indices = Vec::with_capacity(roots.len());
        let mut next_slot = 0usize;

        let mut stack: Vec<(&AstNode, usize, Option<NodeIndex>)> =
            roots.iter().rev().map(|node| (node, 0, None)).collect();
        while let Some((node, depth, parent)) = stack.pop() {
            let slot = if node.is_leaf() {
                next_slot += 1;
                (next_slot - 1) as f64
            } else {
                f64::NAN
            };
            let idx = graph.add_node(TreeNode {
                category: node.category,
                order_index: node.order_index,
                depth,
                slot,
            });
            match parent {
                Some(parent) => {
                    graph.add_edge(parent, idx, ());
                }
                None => root_indices.push(idx),
            }
            for child in node.children().iter().rev() {
                stack.push((child, depth + 1, Some(idx)));
            }
        }

        let mut layout = Self {
            graph,
            roots: root_indices,
        };
        layout.place_inner_nodes()?;
        log::debug!(
            "Tree layout: {} nodes, {} edges, {} leaves",
            layout.graph.node_count(),
            layout.graph.edge_count(),
            next_slot
        );
        Ok(layout)
    }

    /// Children are always finished before their parent in post-order
    fn place_inner_nodes(&mut self) -> Result<()> {
        for &root in &self.roots {
            let mut dfs = DfsPostOrder::new(&self.graph, root);
            while let Some(idx) = dfs.next(&self.graph) {
                if !self.graph[idx].slot.is_nan() {
                    continue;
                }
                let slots: Vec<f64> = self
                    .graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .map(|child| self.graph[child].slot)
                    .collect();
                if slots.is_empty() || slots.iter().any(|s| s.is_nan()) {
                    return Err(SceneError::Layout(format!(
                        "node {} has no placed children",
                        self.graph[idx].order_index
                    )));
                }
                self.graph[idx].slot = slots.iter().sum::<f64>() / slots.len() as f64;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Nodes in pre-order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &TreeNode)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> Option<&TreeNode> {
        self.graph.node_weight(idx)
    }

    /// Parent → child pairs
    pub fn edges(&self) -> impl Iterator<Item = (&TreeNode, &TreeNode)> {
        self.graph.raw_edges().iter().map(move |edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
            )
        })
    }
}

fn place(node: &TreeNode, horizontal: bool) -> (f64, f64) {
    let depth = node.depth as f64;
    if horizontal {
        (depth, node.slot)
    } else {
        (node.slot, depth)
    }
}

/// Tree view: one marker per node colored by category, one line segment per
/// parent → child edge
pub fn render_tree(roots: &[AstNode], config: &SceneConfig) -> Result<Scene> {
    let layout = TreeLayout::build(roots)?;
    let horizontal = config.horizontal_tree;

    let mut edges = Trace::lines("edges");
    for (parent, child) in layout.edges() {
        let (x0, y0) = place(parent, horizontal);
        let (x1, y1) = place(child, horizontal);
        edges.push(x0, y0);
        edges.push(x1, y1);
        edges.push(Coord::Gap, Coord::Gap);
    }
    edges.line = Some(Line {
        width: 1.0,
        color: config.palette.comment,
    });
    edges.hoverinfo = Some("none".to_string());
    edges.showlegend = Some(false);

    let mut by_category: BTreeMap<Category, Trace> = BTreeMap::new();
    for (_, node) in layout.nodes() {
        let trace = by_category.entry(node.category).or_insert_with(|| {
            let mut trace = Trace::markers(node.category.as_str());
            trace.marker = Some(Marker {
                size: Some(config.marker_size),
                ..Marker::colored(config.palette.color(node.category))
            });
            trace.hovertext = Some(Vec::new());
            trace.hoverinfo = Some("text".to_string());
            trace
        });
        let (x, y) = place(node, horizontal);
        trace.push(x, y);
        if let Some(hover) = trace.hovertext.as_mut() {
            hover.push(format!("{} #{}", node.category, node.order_index));
        }
    }

    let mut traces = vec![edges];
    traces.extend(by_category.into_values());

    let (xaxis, yaxis) = if horizontal {
        (Axis::titled("Depth"), Axis::hidden())
    } else {
        (Axis::hidden(), Axis::titled("Depth").reversed())
    };

    Ok(Scene {
        title: TREE_TITLE.to_string(),
        layout: Layout {
            xaxis,
            yaxis,
            showlegend: config.show_legend,
            ..Layout::default()
        },
        traces,
    })
}
