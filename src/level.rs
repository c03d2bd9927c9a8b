// SPDX-License-Identifier: MIT OR Apache-2.0
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Severity of a log message.
///
/// The declaration order is the order of the palette tables in
/// [`Defaults`](crate::Defaults); it is not a verbosity ranking (`Debug` sorts last).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Normal operation
    #[default]
    #[serde(alias = "log")]
    Info,
    /// Suspicious condition
    #[serde(alias = "alert")]
    Warn,
    /// Runtime error
    #[serde(alias = "severe")]
    Error,
    /// Unrecoverable; the logger shuts the process down after rendering it
    Fatal,
    /// Diagnostics, hidden by sinks unless they opt in
    Debug,
}

impl Level {
    pub const LOG: Level = Level::Info;
    pub const ALERT: Level = Level::Warn;
    pub const SEVERE: Level = Level::Error;

    pub const ALL: [Level; 5] = [
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Debug,
    ];

    /// The tag printed after the prefixes, e.g. `INFO`.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Debug => "DEBUG",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
