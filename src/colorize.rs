// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic coloring of primitive-looking words.
//!
//! Text is split into words and delimiter runs; each word is matched against a
//! fixed list of rules (null, booleans, quoted strings, numbers, ...).  This is a
//! guess, not a parser: `"errors"` gets the error color because it contains
//! `error`, and that is fine.

use crate::color::Color;
use crate::defaults::Defaults;
use crate::level::Level;

/// Words containing this are colored as circular references.
pub const CIRCULAR_MARKER: &str = "Circular";

const DELIMITERS: [char; 10] = [' ', ',', ':', '<', '>', '*', '(', ')', '[', ']'];

/// A run of text and the color the heuristics picked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub color: Option<Color>,
}

fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

fn is_quoted(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => first == last && matches!(first, '"' | '\'' | '`'),
        _ => false,
    }
}

fn classify(word: &str, defaults: &Defaults) -> Option<Color> {
    let primitives = &defaults.primitive_colors;
    match word {
        "null" => return Some(primitives.null),
        "undefined" => return Some(primitives.undefined),
        "true" | "false" => return Some(primitives.boolean),
        _ => {}
    }
    if is_quoted(word) {
        return Some(primitives.string);
    }
    if word.parse::<f64>().is_ok_and(f64::is_finite) {
        return Some(primitives.number);
    }
    if word.contains(CIRCULAR_MARKER) {
        return Some(primitives.circular);
    }
    let lower = word.to_lowercase();
    [
        ("info", Level::Info),
        ("warn", Level::Warn),
        ("error", Level::Error),
        ("debug", Level::Debug),
    ]
    .into_iter()
    .find(|(keyword, _)| lower.contains(keyword))
    .map(|(_, level)| defaults.level_main_colors.get(level))
}

/// Splits `text` into alternating word and delimiter tokens, coloring the words.
///
/// Concatenating the token texts gives back `text` unchanged.
///
/// ```
/// use tintlog::{colorize::colorize, Defaults};
/// let defaults = Defaults::default();
/// let tokens = colorize("took 12 ms, ok: true", &defaults);
/// let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, ["took", " ", "12", " ", "ms", ", ", "ok", ": ", "true"]);
/// assert_eq!(tokens[2].color, Some(defaults.primitive_colors.number));
/// assert_eq!(tokens[8].color, Some(defaults.primitive_colors.boolean));
/// ```
pub fn colorize(text: &str, defaults: &Defaults) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_delimiters = false;
    for c in text.chars() {
        let delimiter = is_delimiter(c);
        if delimiter != in_delimiters && !current.is_empty() {
            let text = std::mem::take(&mut current);
            let color = if in_delimiters {
                None
            } else {
                classify(&text, defaults)
            };
            tokens.push(Token { text, color });
        }
        in_delimiters = delimiter;
        current.push(c);
    }
    if !current.is_empty() {
        let color = if in_delimiters {
            None
        } else {
            classify(&current, defaults)
        };
        tokens.push(Token {
            text: current,
            color,
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_of(word: &str) -> Option<Color> {
        let defaults = Defaults::default();
        let tokens = colorize(word, &defaults);
        assert_eq!(tokens.len(), 1, "{word} should be a single token");
        tokens[0].color
    }

    #[test]
    fn primitives() {
        let p = Defaults::default().primitive_colors;
        assert_eq!(color_of("null"), Some(p.null));
        assert_eq!(color_of("undefined"), Some(p.undefined));
        assert_eq!(color_of("false"), Some(p.boolean));
        assert_eq!(color_of("\"quoted\""), Some(p.string));
        assert_eq!(color_of("'single'"), Some(p.string));
        assert_eq!(color_of("`tick`"), Some(p.string));
        assert_eq!(color_of("-3.5e2"), Some(p.number));
        assert_eq!(color_of("plain"), None);
    }

    #[test]
    fn rule_order() {
        let d = Defaults::default();
        // quoted beats the keyword rule
        assert_eq!(color_of("'error'"), Some(d.primitive_colors.string));
        // non-finite numbers are not numbers
        assert_eq!(color_of("NaN"), None);
        assert_eq!(color_of("inf"), None);
        assert_eq!(color_of("infosec"), Some(d.level_main_colors.get(Level::Info)));
    }

    #[test]
    fn keywords_match_substrings() {
        let d = Defaults::default();
        assert_eq!(color_of("ERRORS"), Some(d.level_main_colors.get(Level::Error)));
        assert_eq!(color_of("Warning"), Some(d.level_main_colors.get(Level::Warn)));
        assert_eq!(color_of("debugger"), Some(d.level_main_colors.get(Level::Debug)));
    }

    #[test]
    fn circular_marker() {
        let defaults = Defaults::default();
        let tokens = colorize("[Circular *1]", &defaults);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["[", "Circular", " *", "1", "]"]);
        assert_eq!(tokens[1].color, Some(defaults.primitive_colors.circular));
    }

    #[test]
    fn lone_quote_is_not_a_string() {
        assert_eq!(color_of("\""), None);
    }

    #[test]
    fn round_trips_text() {
        let defaults = Defaults::default();
        let text = "  <a>(b), c: [d]  ";
        let joined: String = colorize(text, &defaults)
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(joined, text);
    }
}
