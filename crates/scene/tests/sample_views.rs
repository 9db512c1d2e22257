use codenn_ast::SourceSample;
use codenn_scene::{Coord, SampleViews, SceneConfig, SCATTER_TITLE, TREE_TITLE};
use pretty_assertions::assert_eq;

const SIDECAR: &str = r#"{"path":"x","nodes":[
    {"category":"function","order_index":0,"position":1,"characters_count":4}
]}"#;

fn nested_sample() -> SourceSample {
    SourceSample::from_strings(
        r#"{"url":"https://example.com/m.lua","nodes":[
            {"container":"require","master_index":0,"position":1,"characters_count":21},
            {"category":"function","order_index":1,"position":23,"characters_count":26,"children":[
                {"category":"variable","order_index":2,"position":38,"characters_count":7}
            ]},
            {"category":"comment","order_index":3,"position":50,"characters_count":6}
        ]}"#,
        "local m = require 'm'\nfunction f()\n  local y\nend\n-- end",
    )
    .unwrap()
}

#[test]
fn worked_scenario_reaches_every_view() {
    let sample = SourceSample::from_strings(SIDECAR, "func end").unwrap();
    let views = SampleViews::render(&sample, &SceneConfig::default()).unwrap();

    assert_eq!(views.sample, "x");
    assert_eq!(views.scatter.title, SCATTER_TITLE);
    let function = views.scatter.trace("function").unwrap();
    assert_eq!(function.x, vec![Coord::Number(0.0)]);
    assert_eq!(function.y, vec![Coord::Label("function".to_string())]);

    assert_eq!(views.tree.title, TREE_TITLE);
    assert_eq!(views.tree.trace("function").unwrap().len(), 1);

    let keys: Vec<_> = views.source.units().map(|u| u.key.as_str()).collect();
    assert_eq!(keys, vec!["L0S0", "L0S1"]);
    assert_eq!(views.source.unit("L0S0").unwrap().text, "func");
}

#[test]
fn rendering_is_deterministic() {
    let sample = nested_sample();
    let config = SceneConfig::default();
    let first = SampleViews::render(&sample, &config).unwrap();
    let second = SampleViews::render(&sample, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn nested_sample_views_agree() {
    let config = SceneConfig {
        comment_row: true,
        ..SceneConfig::default()
    };
    let views = SampleViews::render(&nested_sample(), &config).unwrap();

    assert_eq!(views.scatter.traces.len(), 6);
    assert_eq!(views.source.lines.len(), 5);

    // the variable nested in the function wins its characters
    let line2: Vec<_> = views.source.lines[2]
        .units
        .iter()
        .map(|u| (u.text.as_str(), u.category.map(|c| c.as_str())))
        .collect();
    assert_eq!(
        line2,
        vec![("  ", Some("function")), ("local y", Some("variable"))]
    );

    let seesoft_keys: usize = views
        .seesoft
        .traces
        .iter()
        .map(|t| t.text.as_ref().map_or(0, Vec::len))
        .sum();
    assert_eq!(seesoft_keys, views.source.units().count());

    let json = serde_json::to_value(&views).unwrap();
    assert_eq!(json["sample"], "https://example.com/m.lua");
    assert_eq!(json["scatter"]["layout"]["xaxis"]["title"], "Order in source code");
}
