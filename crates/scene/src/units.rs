use crate::error::Result;
use codenn_ast::{AstNode, Category, Preorder, SourceText};
use serde::Serialize;

/// A run of characters on one line that share a category.
///
/// `key` (`L{line}S{segment}`) is the join key between the seesoft map and
/// the source view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextUnit {
    pub key: String,
    /// 0-based line number
    pub line: usize,
    /// 0-based run index within the line
    pub segment: usize,
    /// First column, in characters
    pub column: usize,
    pub text: String,
    pub category: Option<Category>,
}

impl TextUnit {
    /// Width in characters
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

#[must_use]
pub fn unit_key(line: usize, segment: usize) -> String {
    format!("L{line}S{segment}")
}

/// Category of every character. Nodes paint in pre-order, so a nested node
/// overwrites its ancestors.
pub fn paint(text: &SourceText, roots: &[AstNode], paint_comments: bool) -> Result<Vec<Option<Category>>> {
    let mut painted = vec![None; text.char_len()];
    for visit in Preorder::new(roots) {
        let node = visit.node;
        text.span(node.order_index, node.position, node.characters_count)?;
        if node.category.is_comment() && !paint_comments {
            continue;
        }
        let start = node.position - 1;
        painted[start..start + node.characters_count].fill(Some(node.category));
    }
    Ok(painted)
}

/// Split every line into category runs. Empty lines yield no units.
pub fn text_units(text: &SourceText, roots: &[AstNode], paint_comments: bool) -> Result<Vec<TextUnit>> {
    let painted = paint(text, roots, paint_comments)?;
    let mut units = Vec::new();

    for (line_no, (offset, line)) in text.lines().enumerate() {
        let mut segment = 0;
        let mut current: Option<TextUnit> = None;
        for (column, ch) in line.chars().enumerate() {
            let category = painted[offset + column];
            match current.as_mut() {
                Some(unit) if unit.category == category => unit.text.push(ch),
                _ => {
                    if let Some(done) = current.take() {
                        units.push(done);
                        segment += 1;
                    }
                    current = Some(TextUnit {
                        key: unit_key(line_no, segment),
                        line: line_no,
                        segment,
                        column,
                        text: ch.to_string(),
                        category,
                    });
                }
            }
        }
        units.extend(current);
    }

    Ok(units)
}
