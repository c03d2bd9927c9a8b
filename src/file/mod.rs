// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent logs on disk, as plain text or HTML.
//!
//! A [`FileRenderer`] writes every message it accepts to `latest.log` in its folder,
//! and optionally to per-level streams in `debug/`, `error/` and `fatal/`.  Files
//! are renamed after their modification time when the renderer closes, and again
//! at startup for anything a crashed run left behind.  With compression on, startup
//! zips every earlier session's files.
//!
//! Writing happens on a dedicated worker thread.  Each rendered message becomes
//! exactly one job on the worker's queue, so a slow disk never blocks the thread
//! that logs.
//!
//! ```
//! use tintlog::{FileRenderer, FileStorageSettings, Logger, LoggerOptions};
//! use std::sync::Arc;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let settings = FileStorageSettings::new(dir.path()).with_error_log(true);
//! let files = Arc::new(FileRenderer::new(settings).unwrap());
//!
//! let logger = Logger::new(LoggerOptions::default().terminal(false)).unwrap();
//! logger.register_sink(files.clone());
//! logger.error("disk full");
//! files.flush();
//!
//! let error_log = std::fs::read_to_string(dir.path().join("error/latest.log")).unwrap();
//! assert!(error_log.contains("ERROR: disk full"));
//!
//! files.close();
//! assert!(!dir.path().join("error/latest.log").exists());
//! ```

mod html;
mod layout;
mod writer;

use crate::error::{Error, IoContext, Result};
use crate::lifecycle::Lifecycle;
use crate::message::LogMessage;
use crate::sink::Sink;
use layout::Category;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use wasm_safe_mutex::mpsc;
use writer::{Job, Output};

/// Configuration of a [`FileRenderer`].
///
/// Everything but the folder is optional when deserializing:
///
/// ```
/// use tintlog::FileStorageSettings;
/// let settings: FileStorageSettings = toml::from_str(r#"
///     log_folder_path = "logs"
///     enable_error_log = true
/// "#).unwrap();
/// assert!(settings.enable_latest_log);
/// assert!(!settings.generate_html_log);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageSettings {
    pub log_folder_path: PathBuf,
    pub enable_latest_log: bool,
    pub enable_debug_log: bool,
    pub enable_error_log: bool,
    pub enable_fatal_log: bool,
    pub generate_html_log: bool,
    /// At startup, zip the files earlier sessions left behind.
    pub compress_log_files_after_new_execution: bool,
    /// Debug messages also go to `latest`.
    pub debug: bool,
}

impl Default for FileStorageSettings {
    fn default() -> Self {
        Self {
            log_folder_path: PathBuf::new(),
            enable_latest_log: true,
            enable_debug_log: false,
            enable_error_log: false,
            enable_fatal_log: false,
            generate_html_log: false,
            compress_log_files_after_new_execution: false,
            debug: false,
        }
    }
}

impl FileStorageSettings {
    pub fn new(log_folder_path: impl Into<PathBuf>) -> Self {
        Self {
            log_folder_path: log_folder_path.into(),
            ..Self::default()
        }
    }

    pub fn with_latest_log(mut self, enable: bool) -> Self {
        self.enable_latest_log = enable;
        self
    }

    pub fn with_debug_log(mut self, enable: bool) -> Self {
        self.enable_debug_log = enable;
        self
    }

    pub fn with_error_log(mut self, enable: bool) -> Self {
        self.enable_error_log = enable;
        self
    }

    pub fn with_fatal_log(mut self, enable: bool) -> Self {
        self.enable_fatal_log = enable;
        self
    }

    pub fn with_html(mut self, enable: bool) -> Self {
        self.generate_html_log = enable;
        self
    }

    pub fn with_compression(mut self, enable: bool) -> Self {
        self.compress_log_files_after_new_execution = enable;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn categories(&self) -> Vec<Category> {
        [
            (Category::Latest, self.enable_latest_log),
            (Category::Debug, self.enable_debug_log),
            (Category::Error, self.enable_error_log),
            (Category::Fatal, self.enable_fatal_log),
        ]
        .into_iter()
        .filter_map(|(category, enabled)| enabled.then_some(category))
        .collect()
    }

    fn extension(&self) -> &'static str {
        if self.generate_html_log { "html" } else { "log" }
    }
}

/// Writes messages to log files through a worker thread.
pub struct FileRenderer {
    settings: FileStorageSettings,
    categories: Vec<Category>,
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    enqueued: AtomicU64,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: manual, the channel and thread handle say nothing useful
// - Clone: NOT implemented, the renderer owns its worker thread
// - PartialEq/Eq/Hash/Default: NOT implemented, a renderer needs a folder
// - Drop: closes, so buffered lines reach the disk

impl Debug for FileRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRenderer")
            .field("settings", &self.settings)
            .field("enqueued", &self.enqueued.load(Ordering::Relaxed))
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl FileRenderer {
    /// Validates the folder, rotates last session's files and starts the worker.
    pub fn new(settings: FileStorageSettings) -> Result<Self> {
        let root = layout::prepare_root(&settings.log_folder_path)?;
        let extension = settings.extension();
        let categories = settings.categories();

        let mut previous = Vec::new();
        for category in &categories {
            let dir = category.dir(&root);
            std::fs::create_dir_all(&dir).at(&dir)?;
            layout::rotate(&dir, extension)?;
            if settings.compress_log_files_after_new_execution {
                previous.extend(layout::previous_logs(&dir, extension)?);
            }
        }
        if !previous.is_empty() {
            layout::archive(&root, &previous)?;
        }

        let mut outputs = Vec::with_capacity(categories.len());
        for category in &categories {
            let path = category.latest(&root, extension);
            let mut file = File::create(&path).at(&path)?;
            if settings.generate_html_log {
                file.write_all(html::HEADER.as_bytes()).at(&path)?;
            }
            outputs.push(Output::new(*category, path, file));
        }

        let (sender, handle) = writer::spawn(
            format!("tintlog-file-{}", root.display()),
            outputs,
            settings.debug,
            settings.generate_html_log,
        )
        .map_err(Error::WorkerSpawn)?;

        Ok(Self {
            settings,
            categories,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(handle)),
            enqueued: AtomicU64::new(0),
        })
    }

    /// Like [`FileRenderer::new`], and closes the renderer when `lifecycle` runs its
    /// cleanup tasks.
    pub fn with_lifecycle(settings: FileStorageSettings, lifecycle: &Lifecycle) -> Result<Arc<Self>> {
        let renderer = Arc::new(Self::new(settings)?);
        let weak = Arc::downgrade(&renderer);
        let id = format!("file-renderer:{}", renderer.folder().display());
        lifecycle.register_cleanup_task(id, move || async move {
            if let Some(renderer) = weak.upgrade() {
                renderer.close();
            }
        });
        Ok(renderer)
    }

    pub fn folder(&self) -> &Path {
        &self.settings.log_folder_path
    }

    pub fn settings(&self) -> &FileStorageSettings {
        &self.settings
    }

    /// How many messages were queued for writing.  One per message, however many
    /// files it lands in.
    pub fn enqueued_writes(&self) -> u64 {
        self.enqueued.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn accepts(&self, message: &LogMessage) -> bool {
        self.categories
            .iter()
            .any(|category| category.accepts(message.level, self.settings.debug))
    }

    /// Blocks until everything queued so far is on disk.
    pub fn flush(&self) {
        let (ack, done) = mpsc::channel();
        let sent = {
            let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
            match sender.as_ref() {
                Some(sender) => sender.send_sync(Job::Flush(ack)).is_ok(),
                None => false,
            }
        };
        if sent {
            writer::wait_for(&done);
        }
    }

    /// Drains the queue, finishes and closes the files, stops the worker, and renames
    /// each `latest` file after its modification time.
    ///
    /// Safe to call more than once; only the first call rotates.  Messages rendered
    /// afterwards are dropped.
    pub fn close(&self) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sender) = sender {
            let _ = sender.send_sync(Job::Close);
        }
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                eprintln!("tintlog: file writer for {} panicked", self.folder().display());
            }
            self.rotate_latest();
        }
    }

    //close cannot fail, so problems go to stderr like the worker's
    fn rotate_latest(&self) {
        let extension = self.settings.extension();
        for category in &self.categories {
            if let Err(error) = layout::rotate(&category.dir(self.folder()), extension) {
                eprintln!("tintlog: {error}");
            }
        }
    }
}

impl Sink for FileRenderer {
    fn render(&self, message: &LogMessage) {
        if !self.accepts(message) {
            return;
        }
        let text = if self.settings.generate_html_log {
            html::render(message)
        } else {
            message.plain_text()
        };
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = sender.as_ref() {
            if sender.send_sync(Job::Write(message.level, text)).is_ok() {
                self.enqueued.fetch_add(1, Ordering::AcqRel);
            }
        }
    }

    fn prepare_to_die(&self) {
        self.flush();
    }
}

impl Drop for FileRenderer {
    fn drop(&mut self) {
        self.close();
    }
}
