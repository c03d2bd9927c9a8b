// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTML rendering for file logs: the same layout as the plain text, as styled spans.

use crate::message::{CONTINUATION_MARKER, LogMessage, Run, separator};
use crate::style::TextStyle;
use unicode_width::UnicodeWidthStr;

pub(crate) const HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Log</title>
    <style>
        body {
            background-color: #1e1e1e;
            color: #d4d4d4;
            font-family: 'JetBrains Mono', 'Fira Code', 'Consolas', monospace;
            font-size: 14px;
            padding: 20px;
        }
        div {
            white-space: pre-wrap;
            word-wrap: break-word;
        }
    </style>
</head>
<body>
"#;

pub(crate) const FOOTER: &str = "</body>\n</html>\n";

/// Escapes HTML special characters.
pub(crate) fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

fn span(text: &str, style: &TextStyle) -> String {
    if text.is_empty() {
        return String::new();
    }
    let css = style.css();
    if css.is_empty() {
        format!("<span>{}</span>", escape(text))
    } else {
        format!("<span style=\"{css}\">{}</span>", escape(text))
    }
}

fn div<'a>(runs: impl IntoIterator<Item = &'a Run>) -> String {
    let mut line = String::from("<div>");
    for (text, style) in runs {
        line.push_str(&span(text, style));
    }
    line.push_str("</div>\n");
    line
}

/// One `<div>` per line of the plain layout.
pub(crate) fn render(message: &LogMessage) -> String {
    let styling = message.styling();
    let mut out = div(message.header_runs().iter().chain(message.primary_runs().iter()));

    let mut widest = 0;
    for group in message.sub_line_groups() {
        let mut runs = Vec::with_capacity(group.runs.len() + 1);
        if !group.special {
            runs.push((CONTINUATION_MARKER.to_string(), styling.sub_line));
        }
        runs.extend(group.runs);
        widest = widest.max(runs.iter().map(|(text, _)| text.width()).sum());
        out.push_str(&div(&runs));
    }
    if !message.sub_lines.is_empty() {
        out.push_str(&div(&[(separator(widest), TextStyle::fg(styling.accent))]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::defaults::Defaults;
    use crate::level::Level;
    use crate::style::Presentation;
    use std::sync::Arc;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn lines_become_divs() {
        let message = LogMessage::new(
            Level::Warn,
            vec![
                Chunk::new("<b>"),
                Chunk::new("detail").sub_line(true).breaks_line(true),
            ],
            Arc::from(Vec::new()),
            Presentation::default(),
            Arc::new(Defaults::default()),
        );
        let html = render(&message);
        assert_eq!(html.matches("<div>").count(), 3);
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains(&format!("color:{}", Defaults::default().level_main_colors.warn)));
        assert!(html.contains("|  "));
    }
}
