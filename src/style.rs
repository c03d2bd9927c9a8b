// SPDX-License-Identifier: MIT OR Apache-2.0

//! Level-dependent styling and concrete text styles.
//!
//! [`LevelStyling::resolve`] is a pure function of the level, the logger's
//! presentation switches and the defaults table.  Sinks turn directive lists into a
//! [`TextStyle`] and then into ANSI escapes ([`TextStyle::paint`]) or inline CSS
//! ([`TextStyle::css`]).

use crate::chunk::Style;
use crate::color::Color;
use crate::defaults::Defaults;
use crate::level::Level;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Presentation switches a logger applies to every message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    /// Paint the header on the level color instead of in it.
    pub colored_background: bool,
    /// Paint the whole primary line in the level colors.
    pub all_line_colored: bool,
}

/// A concrete style: what a run of text looks like once every directive applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    /// No continuation marker; only meaningful on the first chunk of a subline group.
    pub special: bool,
}

impl TextStyle {
    pub fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Self::default()
        }
    }

    /// Applies `directives` in order on top of `base`.
    ///
    /// ```
    /// use tintlog::{Color, Style, TextStyle};
    /// let red = Color::new(255, 0, 0);
    /// let style = TextStyle::from_directives(TextStyle::default(), &[Style::Bold, Style::Reset, Style::TextColor(red)]);
    /// assert_eq!(style, TextStyle::fg(red));
    /// ```
    pub fn from_directives(base: TextStyle, directives: &[Style]) -> Self {
        directives.iter().fold(base, |mut style, directive| {
            match directive {
                Style::Bold => style.bold = true,
                Style::Italic => style.italic = true,
                Style::TextColor(c) => style.fg = Some(*c),
                Style::BackgroundColor(c) => style.bg = Some(*c),
                Style::SpecialSubLine => style.special = true,
                Style::Reset => style = TextStyle::default(),
            }
            style
        })
    }

    /// `text` wrapped in ANSI escapes.
    ///
    /// Escapes are left out when `colored` decides the output should not be
    /// colorized (`NO_COLOR`, not a terminal, ...).
    pub fn paint(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let mut painted = text.normal();
        if let Some(c) = self.fg {
            painted = painted.truecolor(c.r, c.g, c.b);
        }
        if let Some(c) = self.bg {
            painted = painted.on_truecolor(c.r, c.g, c.b);
        }
        if self.bold {
            painted = painted.bold();
        }
        if self.italic {
            painted = painted.italic();
        }
        painted.to_string()
    }

    /// Inline CSS declarations, e.g. `color:#ff0000;font-weight:bold`.
    pub fn css(&self) -> String {
        let mut declarations = Vec::new();
        if let Some(c) = self.fg {
            declarations.push(format!("color:{c}"));
        }
        if let Some(c) = self.bg {
            declarations.push(format!("background-color:{c}"));
        }
        if self.bold {
            declarations.push("font-weight:bold".to_string());
        }
        if self.italic {
            declarations.push("font-style:italic".to_string());
        }
        declarations.join(";")
    }
}

/// Everything a sink needs to know about how a level is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStyling {
    pub level: Level,
    /// Whether the header sits on a colored background.  Always true for fatal.
    pub color_background: bool,
    pub main: Color,
    pub accent: Color,
    /// Timestamp, brackets and level tag.
    pub header: TextStyle,
    /// Base style of subline text and continuation markers.
    pub sub_line: TextStyle,
    /// Background applied to prefixes that do not set their own.
    pub prefix_background: Option<Color>,
    /// Prepended to the styling of every primary chunk.
    pub primary_directives: Vec<Style>,
}

impl LevelStyling {
    pub fn resolve(level: Level, presentation: &Presentation, defaults: &Defaults) -> Self {
        let main = defaults.level_main_colors.get(level);
        let accent = defaults.level_accent_colors.get(level);
        let color_background = presentation.colored_background || level == Level::Fatal;

        let header = if color_background {
            TextStyle {
                fg: Some(accent),
                bg: Some(main),
                ..TextStyle::default()
            }
        } else {
            TextStyle::fg(main)
        };

        let mut primary_directives = Vec::new();
        if presentation.all_line_colored {
            let (fg, bg) = if presentation.colored_background {
                (accent, main)
            } else {
                (main, accent)
            };
            primary_directives.push(Style::BackgroundColor(bg));
            primary_directives.push(Style::TextColor(fg));
        }
        if level == Level::Fatal {
            primary_directives.push(Style::TextColor(accent));
            primary_directives.push(Style::BackgroundColor(main));
        }

        Self {
            level,
            color_background,
            main,
            accent,
            header,
            sub_line: if level == Level::Fatal {
                header
            } else {
                TextStyle::default()
            },
            prefix_background: color_background.then_some(main),
            primary_directives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_header_uses_main_color() {
        let defaults = Defaults::default();
        let styling = LevelStyling::resolve(Level::Warn, &Presentation::default(), &defaults);
        assert!(!styling.color_background);
        assert_eq!(styling.header, TextStyle::fg(defaults.level_main_colors.warn));
        assert!(styling.primary_directives.is_empty());
        assert_eq!(styling.prefix_background, None);
    }

    #[test]
    fn fatal_is_always_background_colored() {
        let defaults = Defaults::default();
        let styling = LevelStyling::resolve(Level::Fatal, &Presentation::default(), &defaults);
        assert!(styling.color_background);
        assert_eq!(styling.header.bg, Some(defaults.level_main_colors.fatal));
        assert_eq!(styling.header.fg, Some(defaults.level_accent_colors.fatal));
        assert_eq!(
            styling.primary_directives,
            [
                Style::TextColor(defaults.level_accent_colors.fatal),
                Style::BackgroundColor(defaults.level_main_colors.fatal),
            ]
        );
    }

    #[test]
    fn whole_line_coloring_swaps_with_background() {
        let defaults = Defaults::default();
        let main = defaults.level_main_colors.info;
        let accent = defaults.level_accent_colors.info;
        let line_only = Presentation {
            colored_background: false,
            all_line_colored: true,
        };
        assert_eq!(
            LevelStyling::resolve(Level::Info, &line_only, &defaults).primary_directives,
            [Style::BackgroundColor(accent), Style::TextColor(main)]
        );
        let both = Presentation {
            colored_background: true,
            all_line_colored: true,
        };
        assert_eq!(
            LevelStyling::resolve(Level::Info, &both, &defaults).primary_directives,
            [Style::BackgroundColor(main), Style::TextColor(accent)]
        );
    }

    #[test]
    fn css_declarations() {
        let style = TextStyle {
            fg: Some(Color::new(255, 0, 0)),
            bg: None,
            bold: true,
            italic: true,
            special: false,
        };
        assert_eq!(style.css(), "color:#ff0000;font-weight:bold;font-style:italic");
        assert_eq!(TextStyle::default().css(), "");
    }
}
