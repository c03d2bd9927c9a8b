// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-based removal of sensitive text.

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};

/// Replaces every match of a set of case-insensitive patterns with a placeholder.
///
/// Patterns run in the order they were given; each one sees the text as left by
/// the ones before it.
///
/// ```
/// use tintlog::Redactor;
/// let redactor = Redactor::new(["password=\\S+", "token \\w+"], "[REDACTED]").unwrap();
/// assert_eq!(
///     redactor.redact("login PASSWORD=hunter2 with Token abc123"),
///     "login [REDACTED] with [REDACTED]"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Redactor {
    patterns: Vec<Regex>,
    placeholder: String,
}

impl Redactor {
    pub fn new<I, S>(patterns: I, placeholder: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| Error::InvalidRedactionPattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            placeholder: placeholder.into(),
        })
    }

    /// A redactor with no patterns.
    pub fn disabled() -> Self {
        Self {
            patterns: Vec::new(),
            placeholder: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn redact(&self, text: &str) -> String {
        let mut modified = text.to_string();
        for pattern in &self.patterns {
            // Match positions refer to the text as it was before this pass; `shift`
            // tracks how far replacements so far have moved everything after them.
            let matches: Vec<(usize, usize)> = pattern
                .find_iter(&modified)
                .filter(|m| !m.is_empty())
                .map(|m| (m.start(), m.end()))
                .collect();
            let mut shift: isize = 0;
            for (start, end) in matches {
                let start = start.saturating_add_signed(shift);
                let end = end.saturating_add_signed(shift);
                modified.replace_range(start..end, &self.placeholder);
                shift += self.placeholder.len() as isize - (end - start) as isize;
            }
        }
        modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_patterns_is_identity() {
        let redactor = Redactor::new(Vec::<String>::new(), "[REDACTED]").unwrap();
        assert_eq!(redactor.redact("secret"), "secret");
        assert!(redactor.is_empty());
    }

    #[test]
    fn several_matches_in_one_pass_stay_aligned() {
        let redactor = Redactor::new(["ab"], "[REDACTED]").unwrap();
        assert_eq!(
            redactor.redact("xabyABzab"),
            "x[REDACTED]y[REDACTED]z[REDACTED]"
        );
        let shrink = Redactor::new(["secret"], "*").unwrap();
        assert_eq!(shrink.redact("secret-secret-secret"), "*-*-*");
    }

    #[test]
    fn later_patterns_see_earlier_replacements() {
        let redactor = Redactor::new(["one", "\\[x\\]"], "[x]").unwrap();
        assert_eq!(redactor.redact("one two"), "[x] two");
    }

    #[test]
    fn idempotent() {
        let redactor = Redactor::new(["api[_-]?key=\\w+", "\\d{4}-\\d{4}"], "[REDACTED]").unwrap();
        let text = "apikey=XYZ card 1234-5678 api_key=abc and API-KEY=q";
        let once = redactor.redact(text);
        assert_eq!(redactor.redact(&once), once);
        assert!(!once.contains("1234"));
    }

    #[test]
    fn invalid_pattern_is_a_configuration_error() {
        let error = Redactor::new(["(unclosed"], "[REDACTED]").unwrap_err();
        assert!(matches!(error, Error::InvalidRedactionPattern { .. }));
    }
}
