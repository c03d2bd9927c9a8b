// SPDX-License-Identifier: MIT OR Apache-2.0

//! The presentation defaults table.
//!
//! Every color the pipeline uses comes from a [`Defaults`] value owned by the logger.
//! The table is plain data: it can be built in code, tweaked field by field, or
//! deserialized from configuration, where every field is optional.
//!
//! ```
//! use tintlog::{Defaults, Level};
//!
//! let mut defaults = Defaults::default();
//! defaults.redaction_text = "***".to_string();
//! assert_eq!(defaults.level_main_colors.get(Level::Info).to_string(), "#cc80ff");
//! ```

use crate::chunk::Style;
use crate::color::{Color, hex};
use crate::level::Level;
use serde::{Deserialize, Serialize};

/// One color per severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelColors {
    pub info: Color,
    pub warn: Color,
    pub error: Color,
    pub fatal: Color,
    pub debug: Color,
}

impl LevelColors {
    pub fn get(&self, level: Level) -> Color {
        match level {
            Level::Info => self.info,
            Level::Warn => self.warn,
            Level::Error => self.error,
            Level::Fatal => self.fatal,
            Level::Debug => self.debug,
        }
    }
}

/// Colors the colorizer assigns to primitive-looking tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimitiveColors {
    pub string: Color,
    pub number: Color,
    pub boolean: Color,
    pub null: Color,
    pub undefined: Color,
    pub circular: Color,
}

impl Default for PrimitiveColors {
    fn default() -> Self {
        Self {
            string: hex(0xff5555),
            number: hex(0x55ff55),
            boolean: hex(0x5555ff),
            null: hex(0x555555),
            undefined: hex(0x005500),
            circular: hex(0xff5555),
        }
    }
}

/// The injectable presentation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Text color, or background color when the background is colored.
    pub level_main_colors: LevelColors,
    /// Text color used on top of a colored background.
    pub level_accent_colors: LevelColors,
    /// Color of prefixes given as plain strings.
    pub prefix_main_color: Color,
    pub prefix_accent_color: Color,
    /// What redacted matches are replaced with.
    pub redaction_text: String,
    pub caused_by_text_color: Option<Color>,
    pub caused_by_background_color: Option<Color>,
    /// Appended to the first chunk of every template argument.
    pub variable_styling: Vec<Style>,
    pub primitive_colors: PrimitiveColors,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            level_main_colors: LevelColors {
                info: hex(0xcc80ff),
                warn: hex(0xff8a1c),
                error: hex(0xff4a4a),
                fatal: hex(0xffffff),
                debug: hex(0x555555),
            },
            level_accent_colors: LevelColors {
                info: hex(0xffffff),
                warn: hex(0xffffff),
                error: hex(0xffffff),
                fatal: hex(0xff0000),
                debug: hex(0xffffff),
            },
            prefix_main_color: hex(0x777777),
            prefix_accent_color: hex(0x000000),
            redaction_text: "[REDACTED]".to_string(),
            caused_by_text_color: Some(hex(0xffffff)),
            caused_by_background_color: Some(hex(0xff0000)),
            variable_styling: vec![Style::Bold, Style::TextColor(hex(0x55ff55))],
            primitive_colors: PrimitiveColors::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_tables_fill_in_from_the_standard_palette() {
        let defaults: Defaults = serde_json::from_str(
            r##"{ "redaction_text": "<hidden>", "primitive_colors": { "number": "#010203" } }"##,
        )
        .unwrap();
        assert_eq!(defaults.redaction_text, "<hidden>");
        assert_eq!(defaults.primitive_colors.number, hex(0x010203));
        assert_eq!(defaults.primitive_colors.string, hex(0xff5555));
        assert_eq!(defaults.level_main_colors.get(Level::Warn), hex(0xff8a1c));
    }

    #[test]
    fn fatal_accent_is_red() {
        let defaults = Defaults::default();
        assert_eq!(defaults.level_accent_colors.get(Level::Fatal), hex(0xff0000));
        assert_eq!(defaults.level_main_colors.get(Level::Fatal), Color::WHITE);
    }
}
