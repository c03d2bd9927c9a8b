// SPDX-License-Identifier: MIT OR Apache-2.0

//! The compiled message handed to sinks.
//!
//! A [`LogMessage`] is built once per logging call and then read by every registered
//! sink.  It carries everything a sink needs so that sinks never look back at the
//! logger:
//!
//! - the chunks, already split into the primary line and sublines, with the level
//!   styling prepended to the primary chunks
//! - a snapshot of the presentation switches and defaults table in effect
//! - the prefixes, timestamp and level
//!
//! # Layout
//!
//! Every sink draws the same layout:
//!
//! ```text
//! [12:30:05] [api] ERROR: request failed
//! |  at handler (server.rs:10)
//! # Caused by:
//! |  Error: connection reset
//! #--------------------------
//! ```
//!
//! The helpers here ([`LogMessage::header_runs`], [`LogMessage::sub_line_groups`])
//! produce that layout as styled runs, and sinks only decide how runs are encoded
//! (ANSI escapes, HTML spans or plain text).

use crate::chunk::{Chunk, group_lines};
use crate::defaults::Defaults;
use crate::level::Level;
use crate::prefix::Prefix;
use crate::style::{LevelStyling, Presentation, TextStyle};
use chrono::{DateTime, Local};
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

/// Drawn before subline groups that are not special.
pub const CONTINUATION_MARKER: &str = "|  ";

/// A piece of text and how it looks.
pub type Run = (String, TextStyle);

/// One logical subline: a group of chunks started by a `breaks_line` chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct SubLine {
    /// Drawn without [`CONTINUATION_MARKER`].
    pub special: bool,
    pub runs: Vec<Run>,
}

impl SubLine {
    pub fn text(&self) -> String {
        self.runs.iter().map(|(text, _)| text.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct LogMessage {
    pub level: Level,
    pub timestamp: DateTime<Local>,
    pub prefixes: Arc<[Prefix]>,
    /// Never empty.
    pub primary: Vec<Chunk>,
    pub sub_lines: Vec<Chunk>,
    pub presentation: Presentation,
    pub defaults: Arc<Defaults>,
}

impl LogMessage {
    /// Splits `chunks` and applies the level styling to the primary ones.
    pub fn new(
        level: Level,
        chunks: Vec<Chunk>,
        prefixes: Arc<[Prefix]>,
        presentation: Presentation,
        defaults: Arc<Defaults>,
    ) -> Self {
        let styling = LevelStyling::resolve(level, &presentation, &defaults);
        let (mut primary, sub_lines): (Vec<Chunk>, Vec<Chunk>) =
            chunks.into_iter().partition(|chunk| !chunk.sub_line);
        if primary.is_empty() {
            primary.push(Chunk::new(""));
        }
        for chunk in &mut primary {
            let own = std::mem::take(&mut chunk.styling);
            chunk.styling = styling.primary_directives.iter().copied().chain(own).collect();
        }
        Self {
            level,
            timestamp: Local::now(),
            prefixes,
            primary,
            sub_lines,
            presentation,
            defaults,
        }
    }

    pub fn styling(&self) -> LevelStyling {
        LevelStyling::resolve(self.level, &self.presentation, &self.defaults)
    }

    /// `[HH:MM:SS]`, the bracketed prefixes and ` LEVEL:`.
    pub fn header_runs(&self) -> Vec<Run> {
        let styling = self.styling();
        let header = styling.header;
        let mut runs = vec![(self.time(), header)];
        for p in self.prefixes.iter() {
            runs.push((" [".to_string(), header));
            runs.extend(p.runs(&self.defaults, styling.prefix_background));
            runs.push(("]".to_string(), header));
        }
        runs.push((self.level_tag(), header));
        runs
    }

    /// `[HH:MM:SS]` in local time.
    pub fn time(&self) -> String {
        self.timestamp.format("[%H:%M:%S]").to_string()
    }

    /// ` LEVEL:`
    pub fn level_tag(&self) -> String {
        format!(" {}:", self.level.name())
    }

    /// The separating space and the primary chunks.
    pub fn primary_runs(&self) -> Vec<Run> {
        let mut runs = Vec::with_capacity(self.primary.len() + 1);
        if let Some(first) = self.primary.first() {
            runs.push((
                " ".to_string(),
                TextStyle::from_directives(TextStyle::default(), &first.styling),
            ));
        }
        runs.extend(self.primary.iter().map(|chunk| {
            (
                chunk.content.clone(),
                TextStyle::from_directives(TextStyle::default(), &chunk.styling),
            )
        }));
        runs
    }

    pub fn sub_line_groups(&self) -> Vec<SubLine> {
        let base = self.styling().sub_line;
        group_lines(&self.sub_lines)
            .into_iter()
            .map(|group| SubLine {
                special: group.first().is_some_and(Chunk::is_special),
                runs: group
                    .iter()
                    .map(|chunk| {
                        (
                            chunk.content.clone(),
                            TextStyle::from_directives(base, &chunk.styling),
                        )
                    })
                    .collect(),
            })
            .collect()
    }

    /// The uncolored rendering used by plain-text logs, one `\n`-terminated line each.
    ///
    /// The closing separator is as wide as the widest subline.
    pub fn plain_text(&self) -> String {
        let mut out: String = self
            .header_runs()
            .into_iter()
            .chain(self.primary_runs())
            .map(|(text, _)| text)
            .collect();
        out.push('\n');

        let mut widest = 0;
        for group in self.sub_line_groups() {
            let line = if group.special {
                group.text()
            } else {
                format!("{CONTINUATION_MARKER}{}", group.text())
            };
            widest = widest.max(line.width());
            out.push_str(&line);
            out.push('\n');
        }
        if !self.sub_lines.is_empty() {
            out.push_str(&separator(widest));
            out.push('\n');
        }
        out
    }
}

/// `#---…`, `width` columns wide (at least the `#`).
pub fn separator(width: usize) -> String {
    let mut line = String::from("#");
    line.push_str(&"-".repeat(width.saturating_sub(1)));
    line
}
