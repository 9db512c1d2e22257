//! Renderer-agnostic scene objects.
//!
//! Field names follow the plotly figure schema so a scene serialised to JSON
//! can be handed to a plotting front end unchanged.

use crate::palette::Rgb;
use codenn_ast::Category;
use serde::Serialize;

/// One coordinate value. `Gap` serialises as `null` and breaks a line trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Coord {
    Number(f64),
    Label(String),
    Gap,
}

impl From<f64> for Coord {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<usize> for Coord {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Coord {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

impl From<Category> for Coord {
    fn from(value: Category) -> Self {
        Self::Label(value.as_str().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Markers,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    #[serde(rename = "h")]
    Horizontal,
    #[serde(rename = "v")]
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub width: f64,
    pub color: Rgb,
}

/// A single color for the whole trace, or one per point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Uniform(Rgb),
    PerPoint(Vec<Rgb>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

impl Marker {
    #[must_use]
    pub fn colored(color: Rgb) -> Self {
        Self {
            color: Some(MarkerColor::Uniform(color)),
            ..Self::default()
        }
    }
}

/// One named series of a scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TraceMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    pub x: Vec<Coord>,
    pub y: Vec<Coord>,
    /// Bar start offsets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<Vec<f64>>,
    /// Per-point keys, used for cross-view highlighting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    /// Per-point payload delivered with click events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customdata: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

impl Trace {
    fn new(name: impl Into<String>, kind: TraceKind, mode: Option<TraceMode>) -> Self {
        Self {
            name: name.into(),
            kind,
            mode,
            orientation: None,
            x: Vec::new(),
            y: Vec::new(),
            base: None,
            text: None,
            hovertext: None,
            hoverinfo: None,
            customdata: None,
            marker: None,
            line: None,
            opacity: None,
            showlegend: None,
        }
    }

    #[must_use]
    pub fn markers(name: impl Into<String>) -> Self {
        Self::new(name, TraceKind::Scatter, Some(TraceMode::Markers))
    }

    #[must_use]
    pub fn lines(name: impl Into<String>) -> Self {
        Self::new(name, TraceKind::Scatter, Some(TraceMode::Lines))
    }

    #[must_use]
    pub fn bar(name: impl Into<String>) -> Self {
        Self::new(name, TraceKind::Bar, None)
    }

    pub fn push(&mut self, x: impl Into<Coord>, y: impl Into<Coord>) {
        self.x.push(x.into());
        self.y.push(y.into());
    }

    /// Number of points, gaps included
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangemode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<String>,
    /// Explicit category order (top to bottom for a y axis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl Axis {
    #[must_use]
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: Some(false),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.autorange = Some("reversed".to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub b: u32,
    pub t: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            l: 40,
            r: 40,
            b: 40,
            t: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub template: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub margin: Margin,
    pub showlegend: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            template: "plotly_white".to_string(),
            xaxis: Axis::default(),
            yaxis: Axis::default(),
            margin: Margin::default(),
            showlegend: false,
        }
    }
}

/// A complete view ready for a rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub title: String,
    pub layout: Layout,
    pub traces: Vec<Trace>,
}

impl Scene {
    /// Placeholder with no data and hidden axes
    #[must_use]
    pub fn empty(title: &str) -> Self {
        Self {
            title: title.to_string(),
            layout: Layout {
                xaxis: Axis::hidden(),
                yaxis: Axis::hidden(),
                ..Layout::default()
            },
            traces: Vec::new(),
        }
    }

    #[must_use]
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn trace_serialises_in_plotly_shape() {
        let mut trace = Trace::lines("edges");
        trace.push(0usize, 1.5);
        trace.push(Coord::Gap, Coord::Gap);
        trace.push(Category::Function, "x");
        trace.line = Some(Line {
            width: 1.0,
            color: Rgb(1, 2, 3),
        });

        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "edges",
                "type": "scatter",
                "mode": "lines",
                "x": [0.0, null, "function"],
                "y": [1.5, null, "x"],
                "line": {"width": 1.0, "color": "rgb(1,2,3)"}
            })
        );
    }

    #[test]
    fn empty_scene_hides_axes() {
        let value = serde_json::to_value(Scene::empty("Cluster diagram")).unwrap();
        assert_eq!(value["title"], "Cluster diagram");
        assert_eq!(value["layout"]["xaxis"]["visible"], false);
        assert_eq!(value["traces"], json!([]));
    }
}
