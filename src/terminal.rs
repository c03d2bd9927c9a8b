// SPDX-License-Identifier: MIT OR Apache-2.0

//! Colored terminal output.

use crate::color::Color;
use crate::level::Level;
use crate::message::{CONTINUATION_MARKER, LogMessage, Run, separator};
use crate::sink::Sink;
use crate::style::TextStyle;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Used when the terminal size cannot be queried, e.g. when output is piped.
pub const FALLBACK_WIDTH: usize = 80;

/**
Renders messages to stdout (info and debug) or stderr (warnings and worse).

Sublines are wrapped and padded to the terminal width, so a subline never produces a
visual line wider than the terminal.

```
use tintlog::TerminalRenderer;
let renderer = TerminalRenderer::new().with_width(100).with_debug(true);
# let _ = renderer;
```
*/
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    width: Option<usize>,
    debug: bool,
    prefix_cache: Mutex<PrefixCache>,
}

/// Painted prefixes by content.
///
/// Only valid for the prefix background it was built with.
#[derive(Debug, Default)]
struct PrefixCache {
    background: Option<Option<Color>>,
    painted: HashMap<String, String>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug/Default: derived; the default queries the terminal width on every message
// - Clone: NOT implemented, the cache belongs to one renderer
// - PartialEq/Eq/Hash: NOT implemented, sinks are compared by identity

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a fixed width instead of asking the terminal.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Shows debug-level messages.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn width(&self) -> usize {
        self.width.unwrap_or_else(|| {
            crossterm::terminal::size()
                .ok()
                .map(|(columns, _)| usize::from(columns))
                .filter(|&columns| columns > 0)
                .unwrap_or(FALLBACK_WIDTH)
        })
    }

    pub fn accepts(&self, level: Level) -> bool {
        level != Level::Debug || self.debug
    }

    /// The painted lines for `message` at `width` columns, without trailing newlines.
    pub fn render_lines(&self, message: &LogMessage, width: usize) -> Vec<String> {
        let styling = message.styling();
        let header = styling.header;

        let mut primary = header.paint(&message.time());
        {
            let mut cache = self
                .prefix_cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if cache.background != Some(styling.prefix_background) {
                cache.painted.clear();
                cache.background = Some(styling.prefix_background);
            }
            for prefix in message.prefixes.iter() {
                primary.push_str(&header.paint(" ["));
                let painted = cache
                    .painted
                    .entry(prefix.content.clone())
                    .or_insert_with(|| paint_runs(&prefix.runs(&message.defaults, styling.prefix_background)));
                primary.push_str(painted);
                primary.push_str(&header.paint("]"));
            }
        }
        primary.push_str(&header.paint(&message.level_tag()));
        primary.push_str(&paint_runs(&message.primary_runs()));

        let mut lines = vec![primary];
        let groups = message.sub_line_groups();
        for group in &groups {
            //the marker needs room left for at least one wide character
            let marked = !group.special && width >= CONTINUATION_MARKER.len() + 2;
            let available = if marked {
                width - CONTINUATION_MARKER.len()
            } else {
                width.max(1)
            };
            let padding = if group.special {
                group.runs.first().map_or(styling.sub_line, |(_, style)| *style)
            } else {
                styling.sub_line
            };
            for visual in wrap(&group.runs, available) {
                let used: usize = visual.iter().map(|(text, _)| text.width()).sum();
                let mut line = String::new();
                if marked {
                    line.push_str(&styling.sub_line.paint(CONTINUATION_MARKER));
                }
                line.push_str(&paint_runs(&visual));
                line.push_str(&padding.paint(&" ".repeat(available.saturating_sub(used))));
                lines.push(line);
            }
        }
        if !groups.is_empty() {
            lines.push(TextStyle::fg(styling.accent).paint(&separator(width)));
        }
        lines
    }
}

fn paint_runs(runs: &[Run]) -> String {
    runs.iter().map(|(text, style)| style.paint(text)).collect()
}

/// Splits runs into visual lines of at most `width` terminal columns.
///
/// Wide characters count two columns.  A character wider than `width` still gets a
/// line of its own.
fn wrap(runs: &[Run], width: usize) -> Vec<Vec<Run>> {
    let width = width.max(1);
    let mut lines: Vec<Vec<Run>> = vec![Vec::new()];
    let mut used = 0;
    for (text, style) in runs {
        let mut current = String::new();
        for c in text.chars() {
            let columns = c.width().unwrap_or(0);
            if used > 0 && used + columns > width {
                if !current.is_empty() {
                    if let Some(line) = lines.last_mut() {
                        line.push((std::mem::take(&mut current), *style));
                    }
                }
                lines.push(Vec::new());
                used = 0;
            }
            current.push(c);
            used += columns;
        }
        if !current.is_empty() {
            if let Some(line) = lines.last_mut() {
                line.push((current, *style));
            }
        }
    }
    lines
}

impl Sink for TerminalRenderer {
    fn render(&self, message: &LogMessage) {
        if !self.accepts(message.level) {
            return;
        }
        let mut text = self.render_lines(message, self.width()).join("\n");
        text.push('\n');
        //one write under one lock so concurrent messages never interleave
        let _ = match message.level {
            Level::Info | Level::Debug => std::io::stdout().lock().write_all(text.as_bytes()),
            Level::Warn | Level::Error | Level::Fatal => {
                std::io::stderr().lock().write_all(text.as_bytes())
            }
        };
    }

    fn prepare_to_die(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}
