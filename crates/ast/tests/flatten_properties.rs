use codenn_ast::{AstNode, Category, CategoryTraces, Flattener, SourceText, LINE_BREAK_MARKER};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Shape {
    category: usize,
    a: usize,
    b: usize,
    children: Vec<Shape>,
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = (0usize..6, any::<u16>(), any::<u16>()).prop_map(|(category, a, b)| Shape {
        category,
        a: a as usize,
        b: b as usize,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            (0usize..6, any::<u16>(), any::<u16>()),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|((category, a, b), children)| Shape {
                category,
                a: a as usize,
                b: b as usize,
                children,
            })
    })
}

/// Builds a node whose span fits in `len` chars; order indices follow
/// pre-order
fn build(shape: &Shape, len: usize, next: &mut usize) -> AstNode {
    let start = shape.a % len;
    let count = shape.b % (len - start + 1);
    let order_index = *next;
    *next += 1;
    let children = shape
        .children
        .iter()
        .map(|child| build(child, len, next))
        .collect();
    AstNode::leaf(Category::ALL[shape.category], order_index, start + 1, count)
        .with_children(children)
}

fn forest(shapes: &[Shape], len: usize) -> Vec<AstNode> {
    let mut next = 0;
    shapes.iter().map(|s| build(s, len, &mut next)).collect()
}

fn all_nodes(roots: &[AstNode]) -> Vec<&AstNode> {
    codenn_ast::Preorder::new(roots).map(|v| v.node).collect()
}

fn emission_positions(traces: &CategoryTraces) -> HashMap<usize, usize> {
    traces
        .emission()
        .iter()
        .enumerate()
        .map(|(pos, point)| (traces.get(point.category).x[point.index], pos))
        .collect()
}

proptest! {
    #[test]
    fn flattening_is_deterministic(
        text in "[a-z \n]{1,120}",
        shapes in prop::collection::vec(shape(), 0..4),
    ) {
        let source = SourceText::new(text);
        let roots = forest(&shapes, source.char_len());
        let flattener = Flattener::new(&source);
        prop_assert_eq!(flattener.flatten(&roots).unwrap(), flattener.flatten(&roots).unwrap());
    }

    #[test]
    fn every_node_lands_once_in_its_own_category(
        text in "[a-z \n]{1,120}",
        shapes in prop::collection::vec(shape(), 0..4),
    ) {
        let source = SourceText::new(text);
        let roots = forest(&shapes, source.char_len());
        let traces = Flattener::new(&source).flatten(&roots).unwrap();

        for node in all_nodes(&roots) {
            for category in Category::ALL {
                let hits = traces
                    .get(category)
                    .x
                    .iter()
                    .filter(|&&x| x == node.order_index)
                    .count();
                let expected = usize::from(category == node.category);
                prop_assert_eq!(hits, expected);
            }
        }
        prop_assert_eq!(traces.len(), all_nodes(&roots).len());
    }

    #[test]
    fn parents_are_emitted_before_descendants(
        text in "[a-z \n]{1,120}",
        shapes in prop::collection::vec(shape(), 1..4),
    ) {
        let source = SourceText::new(text);
        let roots = forest(&shapes, source.char_len());
        let traces = Flattener::new(&source).flatten(&roots).unwrap();
        let positions = emission_positions(&traces);

        for node in all_nodes(&roots) {
            let own = positions[&node.order_index];
            for descendant in all_nodes(node.children()) {
                prop_assert!(own < positions[&descendant.order_index]);
            }
        }
    }

    #[test]
    fn display_text_reslices_to_the_source(
        text in "[a-z \n]{1,120}",
        shapes in prop::collection::vec(shape(), 0..4),
    ) {
        let source = SourceText::new(text);
        let roots = forest(&shapes, source.char_len());
        let traces = Flattener::new(&source).flatten(&roots).unwrap();

        for (_, trace) in traces.iter() {
            for (text, span) in trace.text.iter().zip(&trace.spans) {
                let (start, end) = span.char_range();
                let original = source.char_slice(start, end).unwrap();
                prop_assert_eq!(text.replace(LINE_BREAK_MARKER, "\n"), original);
            }
        }
    }
}

#[test]
fn worked_scenario_from_sidecar() {
    let sample = codenn_ast::SourceSample::from_strings(
        r#"{"path":"x","nodes":[{"category":"function","order_index":0,"position":1,"characters_count":4}]}"#,
        "func end",
    )
    .unwrap();
    let traces = sample.flatten().unwrap();
    let function = traces.get(Category::Function);
    assert_eq!(function.x, vec![0]);
    assert_eq!(function.y, vec![Category::Function]);
    assert_eq!(function.text, vec!["func".to_string()]);
}

#[test]
fn unknown_category_is_an_error() {
    let err = codenn_ast::SourceSample::from_strings(
        r#"{"path":"x","nodes":[{"category":"unknown","order_index":0,"position":1,"characters_count":4}]}"#,
        "func end",
    )
    .unwrap_err();
    assert!(matches!(err, codenn_ast::AstError::UnknownCategory { .. }));
}

#[test]
fn deep_chain_sidecar_flattens() {
    let depth = 500;
    let mut json = String::from(r#"{"path":"x","nodes":["#);
    for i in 0..=depth {
        json.push_str(&format!(
            r#"{{"category":"other","order_index":{i},"position":1,"characters_count":1,"children":["#
        ));
    }
    json.push_str(&"]}".repeat(depth + 1));
    json.push_str("]}");

    let sample = codenn_ast::SourceSample::from_strings(&json, "x").unwrap();
    let traces = sample.flatten().unwrap();
    let other = traces.get(Category::Other);
    assert_eq!(other.x, (0..=depth).collect::<Vec<_>>());
    assert!(other.text.iter().all(|text| text == "x"));
    assert_eq!(traces.len(), depth + 1);
}
