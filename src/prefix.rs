// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bracketed tags printed before the level, e.g. `[api]`.
//!
//! A prefix color can be a single color, one color per character, or a function of
//! the prefix text.  All three resolve to a per-character color list once, at render
//! time.
//!
//! In configuration a prefix is either a plain string or a table:
//!
//! ```
//! use tintlog::Prefix;
//! let prefixes: Vec<Prefix> = serde_json::from_str(
//!     r##"["api", {"content": "db", "color": ["#ff0000", "#00ff00"]}]"##,
//! ).unwrap();
//! assert_eq!(prefixes[0].content, "api");
//! assert!(prefixes[1].color.is_some());
//! ```

use crate::color::Color;
use crate::defaults::Defaults;
use crate::style::TextStyle;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// What a [`ColorSpec`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedColor {
    Static(Color),
    PerCharacter(Vec<Color>),
}

impl ResolvedColor {
    /// One color per character of a `len`-character text.
    ///
    /// Short per-character lists are padded by repeating their final color; an
    /// empty list yields `fallback` throughout.
    pub fn per_character(&self, len: usize, fallback: Color) -> Vec<Color> {
        match self {
            ResolvedColor::Static(c) => vec![*c; len],
            ResolvedColor::PerCharacter(colors) => {
                let last = colors.last().copied().unwrap_or(fallback);
                colors
                    .iter()
                    .copied()
                    .chain(std::iter::repeat(last))
                    .take(len)
                    .collect()
            }
        }
    }
}

/// A color computed from the prefix text.
#[derive(Clone)]
pub struct ColorFn(Arc<dyn Fn(&str) -> ResolvedColor + Send + Sync>);

impl Debug for ColorFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ColorFn(..)")
    }
}

/// How a prefix is colored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Static(Color),
    PerCharacter(Vec<Color>),
    /// Not representable in configuration.
    #[serde(skip)]
    Computed(ColorFn),
}

impl ColorSpec {
    pub fn computed(f: impl Fn(&str) -> ResolvedColor + Send + Sync + 'static) -> Self {
        ColorSpec::Computed(ColorFn(Arc::new(f)))
    }

    pub fn resolve(&self, content: &str) -> ResolvedColor {
        match self {
            ColorSpec::Static(c) => ResolvedColor::Static(*c),
            ColorSpec::PerCharacter(colors) => ResolvedColor::PerCharacter(colors.clone()),
            ColorSpec::Computed(f) => (f.0)(content),
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(value: Color) -> Self {
        ColorSpec::Static(value)
    }
}

impl From<Vec<Color>> for ColorSpec {
    fn from(value: Vec<Color>) -> Self {
        ColorSpec::PerCharacter(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrefixRepr {
    Plain(String),
    Full {
        content: String,
        #[serde(default)]
        color: Option<ColorSpec>,
        #[serde(default)]
        background: Option<ColorSpec>,
    },
}

/// A tag shown in brackets before the level.
///
/// Without a color the defaults table's `prefix_main_color` is used; without a
/// background the level's prefix background (if any) shows through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PrefixRepr")]
pub struct Prefix {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorSpec>,
}

impl From<PrefixRepr> for Prefix {
    fn from(value: PrefixRepr) -> Self {
        match value {
            PrefixRepr::Plain(content) => Prefix::new(content),
            PrefixRepr::Full {
                content,
                color,
                background,
            } => Prefix {
                content,
                color,
                background,
            },
        }
    }
}

impl Prefix {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            color: None,
            background: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_background(mut self, background: impl Into<ColorSpec>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// The prefix text split into runs of identically styled characters.
    pub fn runs(&self, defaults: &Defaults, default_background: Option<Color>) -> Vec<(String, TextStyle)> {
        let len = self.content.chars().count();
        let fg = match &self.color {
            Some(spec) => spec
                .resolve(&self.content)
                .per_character(len, defaults.prefix_main_color),
            None => vec![defaults.prefix_main_color; len],
        };
        let bg: Vec<Option<Color>> = match &self.background {
            Some(spec) => spec
                .resolve(&self.content)
                .per_character(len, defaults.prefix_accent_color)
                .into_iter()
                .map(Some)
                .collect(),
            None => vec![default_background; len],
        };

        let mut runs: Vec<(String, TextStyle)> = Vec::new();
        for ((c, fg), bg) in self.content.chars().zip(fg).zip(bg) {
            let style = TextStyle {
                fg: Some(fg),
                bg,
                ..TextStyle::default()
            };
            match runs.last_mut() {
                Some((text, last)) if *last == style => text.push(c),
                _ => runs.push((c.to_string(), style)),
            }
        }
        runs
    }
}

impl From<&str> for Prefix {
    fn from(value: &str) -> Self {
        Prefix::new(value)
    }
}

impl From<String> for Prefix {
    fn from(value: String) -> Self {
        Prefix::new(value)
    }
}
