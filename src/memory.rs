// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! This module provides a sink that keeps rendered messages in memory instead of
//! writing them anywhere.  It is useful for:
//!
//! - Unit testing code that logs through a [`Logger`](crate::Logger)
//! - Hosts that want to capture output and forward it somewhere of their own
//!
//! Messages are stored in the same plain-text layout the file sink writes, without
//! color escapes, so assertions can match on text.

use crate::message::LogMessage;
use crate::sink::Sink;
use std::sync::{Mutex, PoisonError};

/// A sink that stores the plain-text rendering of every message.
///
/// # Example
///
/// ```rust
/// use tintlog::{InMemorySink, Logger, LoggerOptions, Message};
/// use std::sync::Arc;
///
/// let logger = Logger::new(LoggerOptions::default()).unwrap();
/// let sink = Arc::new(InMemorySink::new());
/// logger.register_sink(sink.clone());
///
/// logger.warn(Message::new("disk at %d%%").arg(91));
/// logger.info("ready");
///
/// let logs = sink.drain_logs();
/// assert!(logs.contains("WARN: disk at 91%"));
/// assert!(logs.contains("INFO: ready"));
/// assert_eq!(sink.drain_logs(), "");
/// ```
#[derive(Debug)]
pub struct InMemorySink {
    logs: Mutex<Vec<String>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: derived, required by Sink
// - Default: the empty buffer
// - Clone: NOT implemented, a copy would silently stop receiving messages
// - PartialEq/Eq/Hash: NOT implemented, sinks are compared by identity
// - Send/Sync: automatic through Mutex

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Returns every stored message, oldest first, and clears the buffer.
    ///
    /// Each message ends with a newline, so the result is the text a plain log file
    /// would contain.
    pub fn drain_logs(&self) -> String {
        let mut logs = self.logs.lock().unwrap_or_else(PoisonError::into_inner);
        let result = logs.concat();
        logs.clear();
        result
    }

    /// Number of messages currently stored.
    pub fn len(&self) -> usize {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for InMemorySink {
    fn render(&self, message: &LogMessage) {
        let text = message.plain_text();
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text);
    }

    fn prepare_to_die(&self) {
        //nothing is buffered outside the vec
    }
}
