// SPDX-License-Identifier: MIT OR Apache-2.0

//! Styled text units.
//!
//! A compiled message is a sequence of [`Chunk`]s.  Each chunk carries its own list
//! of [`Style`] directives; every directive that needs a parameter (a color) carries
//! it inline, so there is no separate parameter list to keep in step.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// A styling directive.
///
/// Directives are applied in list order.  A later directive of the same kind
/// overrides an earlier one, and [`Style::Reset`] discards everything before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Bold,
    Italic,
    TextColor(Color),
    BackgroundColor(Color),
    /// The line is rendered without the `|  ` continuation marker.
    SpecialSubLine,
    Reset,
}

/// One styled, position-ordered unit of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Chunk {
    pub content: String,
    pub styling: Vec<Style>,
    /// Continuation content rendered below the primary line.
    pub sub_line: bool,
    /// Starts a new visual line among a run of subline chunks.
    pub breaks_line: bool,
}

impl Chunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn styled(mut self, style: Style) -> Self {
        self.styling.push(style);
        self
    }

    pub fn sub_line(mut self, sub_line: bool) -> Self {
        self.sub_line = sub_line;
        self
    }

    pub fn breaks_line(mut self, breaks_line: bool) -> Self {
        self.breaks_line = breaks_line;
        self
    }

    /// Whether the chunk opts out of the continuation marker.
    pub fn is_special(&self) -> bool {
        self.styling.contains(&Style::SpecialSubLine)
    }

    /// The last text color directive, which is the one that wins when rendered.
    pub fn text_color(&self) -> Option<Color> {
        self.styling.iter().rev().find_map(|style| match style {
            Style::TextColor(c) => Some(*c),
            _ => None,
        })
    }
}

/// Groups a run of subline chunks into visual lines.
///
/// A new line starts at every chunk with `breaks_line`; the first chunk always
/// starts a line, whatever its flag says.
pub fn group_lines(chunks: &[Chunk]) -> Vec<&[Chunk]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, chunk) in chunks.iter().enumerate() {
        if i > start && chunk.breaks_line {
            lines.push(&chunks[start..i]);
            start = i;
        }
    }
    if start < chunks.len() {
        lines.push(&chunks[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_text_color_wins() {
        let red = Color::new(255, 0, 0);
        let blue = Color::new(0, 0, 255);
        let chunk = Chunk::new("x")
            .styled(Style::TextColor(red))
            .styled(Style::Bold)
            .styled(Style::TextColor(blue));
        assert_eq!(chunk.text_color(), Some(blue));
    }

    #[test]
    fn grouping_follows_breaks() {
        let chunks = vec![
            Chunk::new("a").sub_line(true),
            Chunk::new("b").sub_line(true),
            Chunk::new("c").sub_line(true).breaks_line(true),
            Chunk::new("d").sub_line(true).breaks_line(true),
            Chunk::new("e").sub_line(true),
        ];
        let lines = group_lines(&chunks);
        let text: Vec<String> = lines
            .iter()
            .map(|line| line.iter().map(|c| c.content.as_str()).collect())
            .collect();
        assert_eq!(text, vec!["ab", "c", "de"]);
    }

    #[test]
    fn grouping_empty_run() {
        assert!(group_lines(&[]).is_empty());
    }
}
