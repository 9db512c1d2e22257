use crate::config::SceneConfig;
use crate::error::Result;
use crate::palette::Rgb;
use crate::units::text_units;
use codenn_ast::{Category, SourceSample};
use serde::Serialize;
use std::fmt::Write as _;

/// One colored run of source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceUnit {
    pub key: String,
    /// DOM id: view id followed by the unit key
    pub element_id: String,
    pub text: String,
    pub category: Option<Category>,
    pub background: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLine {
    pub number: usize,
    pub units: Vec<SourceUnit>,
}

/// Source text as colored units, grouped by line (empty lines kept)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceView {
    pub view_id: String,
    pub lines: Vec<SourceLine>,
}

impl SourceView {
    pub fn build(sample: &SourceSample, config: &SceneConfig) -> Result<Self> {
        let units = text_units(sample.text(), sample.nodes(), config.paint_comments)?;
        let line_count = sample.text().lines().count();
        let mut lines: Vec<SourceLine> = (0..line_count)
            .map(|number| SourceLine {
                number,
                units: Vec::new(),
            })
            .collect();

        for unit in units {
            let element_id = format!("{}{}", config.view_id, unit.key);
            lines[unit.line].units.push(SourceUnit {
                element_id,
                background: config.palette.fill(unit.category),
                key: unit.key,
                text: unit.text,
                category: unit.category,
            });
        }

        Ok(Self {
            view_id: config.view_id.clone(),
            lines,
        })
    }

    /// Every unit in reading order
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.lines.iter().flat_map(|line| line.units.iter())
    }

    /// Find a unit by its key
    #[must_use]
    pub fn unit(&self, key: &str) -> Option<&SourceUnit> {
        self.units().find(|unit| unit.key == key)
    }

    /// `<pre>` block with one `<span>` per unit
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!("<pre id=\"{}\">", escape_html(&self.view_id));
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                html.push('\n');
            }
            for unit in &line.units {
                let _ = write!(
                    html,
                    "<span id=\"{}\" style=\"background-color: {}\">{}</span>",
                    escape_html(&unit.element_id),
                    unit.background,
                    escape_html(&unit.text)
                );
            }
        }
        html.push_str("</pre>");
        html
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
