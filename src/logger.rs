//SPDX-License-Identifier: MIT OR Apache-2.0

//! The logging front-end.
//!
//! A [`Logger`] compiles each call into a [`LogMessage`] and hands it to every
//! registered [`Sink`], in registration order, on the calling thread.

use crate::chunk::Chunk;
use crate::compile::Compiler;
use crate::defaults::Defaults;
use crate::error::Result;
use crate::level::Level;
use crate::lifecycle::{FATAL_EXIT_CODE, Lifecycle};
use crate::message::LogMessage;
use crate::prefix::Prefix;
use crate::redact::Redactor;
use crate::sink::Sink;
use crate::style::Presentation;
use crate::terminal::TerminalRenderer;
use crate::value::Message;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/**
Construction parameters for a [`Logger`].

Every field has a default, so partial configuration files work:

```
use tintlog::{Level, LoggerOptions};
let options: LoggerOptions = toml::from_str(r##"
    default_level = "warn"
    prefixes = ["api", { content = "v2", color = "#00ff00" }]
    redacted_content = ["password=\\S+"]
"##).unwrap();
assert_eq!(options.default_level, Level::Warn);
assert_eq!(options.prefixes.len(), 2);
assert!(options.terminal);
```
*/
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    /// Level used by [`Logger::log`].
    pub default_level: Level,
    pub prefixes: Vec<Prefix>,
    /// Case-insensitive regular expressions whose matches are redacted.
    pub redacted_content: Vec<String>,
    pub colored_background: bool,
    pub all_line_colored: bool,
    /// Fatal messages are logged like errors and the process keeps running.
    pub disable_fatal_crash: bool,
    /// Register a [`TerminalRenderer`] on construction.
    pub terminal: bool,
    /// The terminal renderer shows debug messages.
    pub debug: bool,
    pub defaults: Defaults,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            default_level: Level::default(),
            prefixes: Vec::new(),
            redacted_content: Vec::new(),
            colored_background: false,
            all_line_colored: false,
            disable_fatal_crash: false,
            terminal: true,
            debug: false,
            defaults: Defaults::default(),
        }
    }
}

impl LoggerOptions {
    pub fn default_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<Prefix>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn redact(mut self, pattern: impl Into<String>) -> Self {
        self.redacted_content.push(pattern.into());
        self
    }

    pub fn colored_background(mut self, enable: bool) -> Self {
        self.colored_background = enable;
        self
    }

    pub fn all_line_colored(mut self, enable: bool) -> Self {
        self.all_line_colored = enable;
        self
    }

    pub fn disable_fatal_crash(mut self, disable: bool) -> Self {
        self.disable_fatal_crash = disable;
        self
    }

    pub fn terminal(mut self, enable: bool) -> Self {
        self.terminal = enable;
        self
    }

    pub fn debug(mut self, enable: bool) -> Self {
        self.debug = enable;
        self
    }

    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }
}

/**
A logger.

```
use tintlog::{ErrorValue, InMemorySink, Logger, LoggerOptions, Message};
use std::sync::Arc;

let logger = Logger::new(LoggerOptions::default().terminal(false).redact("token=\\w+")).unwrap();
let sink = Arc::new(InMemorySink::new());
logger.register_sink(sink.clone());

logger.info(Message::new("connected with %s").arg("token=abc123"));
logger.error(ErrorValue::new("request failed").with_cause(ErrorValue::new("timeout")));

let logs = sink.drain_logs();
assert!(logs.contains("INFO: connected with [REDACTED]"));
assert!(logs.contains("ERROR: Error: request failed"));
assert!(logs.contains("# Caused by:"));
```
*/
#[derive(Debug)]
pub struct Logger {
    default_level: Level,
    prefixes: Arc<[Prefix]>,
    redactor: Redactor,
    defaults: Arc<Defaults>,
    colored_background: AtomicBool,
    all_line_colored: AtomicBool,
    disable_fatal_crash: bool,
    exited: AtomicBool,
    lifecycle: Option<Lifecycle>,
    sinks: RwLock<Vec<Arc<dyn Sink>>>,
}

/*
Boilerplate notes.

# Logger

Clone is out: a clone would share sinks but not the exited state, which is confusing.  Share with Arc.
PartialEq/Eq/Hash make no sense for something that is mostly behavior.
Default: LoggerOptions has one, but construction can fail on a bad redaction pattern, so Logger does not.
Send/Sync: required, loggers are used from every thread.
*/

impl Logger {
    /// Builds a logger.  Fails when a redaction pattern does not compile.
    pub fn new(options: LoggerOptions) -> Result<Self> {
        let redactor = Redactor::new(&options.redacted_content, &options.defaults.redaction_text)?;
        let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();
        if options.terminal {
            sinks.push(Arc::new(TerminalRenderer::new().with_debug(options.debug)));
        }
        Ok(Self {
            default_level: options.default_level,
            prefixes: options.prefixes.into(),
            redactor,
            defaults: Arc::new(options.defaults),
            colored_background: AtomicBool::new(options.colored_background),
            all_line_colored: AtomicBool::new(options.all_line_colored),
            disable_fatal_crash: options.disable_fatal_crash,
            exited: AtomicBool::new(false),
            lifecycle: None,
            sinks: RwLock::new(sinks),
        })
    }

    /// A logger that stops when `lifecycle` exits, and shuts `lifecycle` down on a
    /// fatal log.
    pub fn with_lifecycle(options: LoggerOptions, lifecycle: &Lifecycle) -> Result<Self> {
        let mut logger = Self::new(options)?;
        logger.lifecycle = Some(lifecycle.clone());
        Ok(logger)
    }

    pub fn register_sink(&self, sink: Arc<dyn Sink>) {
        self.sinks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sink);
    }

    /// Removes `sink`, compared by identity.
    pub fn unregister_sink(&self, sink: &Arc<dyn Sink>) {
        let target = Arc::as_ptr(sink) as *const ();
        self.sinks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|s| Arc::as_ptr(s) as *const () != target);
    }

    /// A snapshot of the registered sinks.
    pub fn sinks(&self) -> Vec<Arc<dyn Sink>> {
        self.sinks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_colored_background(&self, enable: bool) {
        self.colored_background.store(enable, Ordering::Relaxed);
    }

    pub fn set_all_line_colored(&self, enable: bool) {
        self.all_line_colored.store(enable, Ordering::Relaxed);
    }

    pub fn presentation(&self) -> Presentation {
        Presentation {
            colored_background: self.colored_background.load(Ordering::Relaxed),
            all_line_colored: self.all_line_colored.load(Ordering::Relaxed),
        }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Whether this logger has stopped: after a fatal log, or once its lifecycle
    /// exited.
    pub fn is_exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
            || self.lifecycle.as_ref().is_some_and(Lifecycle::is_exited)
    }

    /// The chunks a message compiles to, before level styling.
    pub fn compile(&self, message: &Message) -> Vec<Chunk> {
        Compiler::new(&self.defaults, &self.redactor).compile(message.input(), false, message.args())
    }

    pub fn log_at(&self, level: Level, message: impl Into<Message>) {
        if self.is_exited() {
            return;
        }
        let message = message.into();
        let compiled = LogMessage::new(
            level,
            self.compile(&message),
            self.prefixes.clone(),
            self.presentation(),
            self.defaults.clone(),
        );
        let sinks = self.sinks();
        for sink in &sinks {
            sink.render(&compiled);
        }
        if level == Level::Fatal && !self.disable_fatal_crash {
            self.die(&sinks);
        }
    }

    fn die(&self, sinks: &[Arc<dyn Sink>]) {
        self.exited.store(true, Ordering::Release);
        if let Some(lifecycle) = &self.lifecycle {
            lifecycle.mark_exited();
        }
        for sink in sinks {
            sink.prepare_to_die();
        }
        match &self.lifecycle {
            Some(lifecycle) => {
                futures::executor::block_on(lifecycle.run_cleanup_tasks());
                lifecycle.exit(FATAL_EXIT_CODE);
            }
            None => std::process::exit(FATAL_EXIT_CODE),
        }
    }

    /// Logs at the configured default level.
    pub fn log(&self, message: impl Into<Message>) {
        self.log_at(self.default_level, message);
    }

    pub fn info(&self, message: impl Into<Message>) {
        self.log_at(Level::Info, message);
    }

    pub fn warn(&self, message: impl Into<Message>) {
        self.log_at(Level::Warn, message);
    }

    /// Same as [`Logger::warn`].
    pub fn alert(&self, message: impl Into<Message>) {
        self.log_at(Level::ALERT, message);
    }

    pub fn error(&self, message: impl Into<Message>) {
        self.log_at(Level::Error, message);
    }

    /// Same as [`Logger::error`].
    pub fn severe(&self, message: impl Into<Message>) {
        self.log_at(Level::SEVERE, message);
    }

    pub fn debug(&self, message: impl Into<Message>) {
        self.log_at(Level::Debug, message);
    }

    /// Logs, then shuts down: sinks are flushed, cleanup tasks run and the process
    /// exits with [`FATAL_EXIT_CODE`].  Unless `disable_fatal_crash` is set.
    pub fn fatal(&self, message: impl Into<Message>) {
        self.log_at(Level::Fatal, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySink;

    fn quiet(options: LoggerOptions) -> (Logger, Arc<InMemorySink>) {
        let logger = Logger::new(options.terminal(false)).unwrap();
        let sink = Arc::new(InMemorySink::new());
        logger.register_sink(sink.clone());
        (logger, sink)
    }

    #[test]
    fn default_level_and_aliases() {
        let (logger, sink) = quiet(LoggerOptions::default().default_level(Level::Warn));
        logger.log("a");
        logger.alert("b");
        logger.severe("c");
        let logs = sink.drain_logs();
        assert!(logs.contains("WARN: a"));
        assert!(logs.contains("WARN: b"));
        assert!(logs.contains("ERROR: c"));
    }

    #[test]
    fn bad_pattern_fails_construction() {
        assert!(Logger::new(LoggerOptions::default().redact("(")).is_err());
    }

    #[test]
    fn unregistering_by_identity() {
        let (logger, sink) = quiet(LoggerOptions::default());
        let other: Arc<dyn Sink> = Arc::new(InMemorySink::new());
        logger.register_sink(other.clone());
        assert_eq!(logger.sinks().len(), 2);
        logger.unregister_sink(&other);
        assert_eq!(logger.sinks().len(), 1);
        logger.info("still here");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn disabled_fatal_crash_keeps_logging() {
        let (logger, sink) = quiet(LoggerOptions::default().disable_fatal_crash(true));
        logger.fatal("bad");
        logger.info("after");
        assert!(!logger.is_exited());
        let logs = sink.drain_logs();
        assert!(logs.contains("FATAL: bad"));
        assert!(logs.contains("INFO: after"));
    }

    #[test]
    fn setters_change_presentation() {
        let (logger, _) = quiet(LoggerOptions::default());
        assert_eq!(logger.presentation(), Presentation::default());
        logger.set_colored_background(true);
        logger.set_all_line_colored(true);
        assert!(logger.presentation().colored_background);
        assert!(logger.presentation().all_line_colored);
    }

    #[test]
    fn primary_line_never_empty() {
        let (logger, _) = quiet(LoggerOptions::default());
        let chunks = logger.compile(&Message::new(crate::ErrorValue::new("x")));
        assert!(!chunks.is_empty());
    }
}
