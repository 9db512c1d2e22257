use crate::error::{AstError, Result};

/// Marker substituted for `\n` in display text
pub const LINE_BREAK_MARKER: &str = "<br>";

/// Decode raw source bytes into text.
///
/// Valid UTF-8 (ASCII included) is taken as is. Anything else is read as
/// ISO-8859-1 when `latin1_fallback` is set, otherwise it is a decode error.
pub fn decode_source(bytes: &[u8], latin1_fallback: bool) -> Result<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(err) if latin1_fallback => {
            log::warn!(
                "Source is not valid UTF-8 ({err}); decoding {} bytes as ISO-8859-1",
                bytes.len()
            );
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        Err(err) => Err(AstError::decode(format!(
            "source is not valid UTF-8 and the ISO-8859-1 fallback is disabled: {err}"
        ))),
    }
}

/// Replace newlines with the display line-break marker
#[must_use]
pub fn display_text(raw: &str) -> String {
    raw.replace('\n', LINE_BREAK_MARKER)
}

/// Decoded source text with character-indexed slicing.
///
/// Node spans count characters, not bytes, so the byte offset of every
/// character boundary is kept alongside the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    /// Byte offset of each char, plus a final entry for `text.len()`
    boundaries: Vec<usize>,
}

impl SourceText {
    #[must_use]
    pub fn new(text: String) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Characters `[start, end)` by char index; `None` when out of bounds
    #[must_use]
    pub fn char_slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end || end > self.char_len() {
            return None;
        }
        Some(&self.text[self.boundaries[start]..self.boundaries[end]])
    }

    /// Slice covered by a node span (1-based `position`, `characters_count`
    /// characters long).
    pub fn span(&self, order_index: usize, position: usize, characters_count: usize) -> Result<&str> {
        let out_of_range = || AstError::Range {
            order_index,
            position,
            characters_count,
            source_len: self.char_len(),
        };
        let start = position.checked_sub(1).ok_or_else(out_of_range)?;
        let end = start
            .checked_add(characters_count)
            .ok_or_else(out_of_range)?;
        self.char_slice(start, end).ok_or_else(out_of_range)
    }

    /// Lines split on `\n`, each as (first char index, line text without the
    /// newline)
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        let mut offset = 0;
        self.text.split('\n').map(move |line| {
            let start = offset;
            offset += line.chars().count() + 1;
            (start, line)
        })
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text.to_string())
    }
}
