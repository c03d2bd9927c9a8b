// SPDX-License-Identifier: MIT OR Apache-2.0

//! The worker thread that owns a file renderer's open files.
//!
//! Jobs arrive over a FIFO channel and are written strictly in order.  The thread
//! flushes its buffers whenever the queue goes idle, and exits after a
//! [`Job::Close`] or once every sender is gone.

use super::html;
use super::layout::Category;
use crate::level::Level;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use wasm_safe_mutex::mpsc;

/// How long the queue may sit idle before buffered output is flushed.
const IDLE_FLUSH: Duration = Duration::from_millis(250);

pub(crate) enum Job {
    /// One rendered message, routed by level.
    Write(Level, String),
    /// Flush and acknowledge.
    Flush(mpsc::Sender<()>),
    Close,
}

/// An open `latest` file.
pub(crate) struct Output {
    category: Category,
    path: PathBuf,
    writer: BufWriter<File>,
    failed: bool,
}

impl Output {
    pub(crate) fn new(category: Category, path: PathBuf, file: File) -> Self {
        Self {
            category,
            path,
            writer: BufWriter::new(file),
            failed: false,
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        if let Err(e) = self.writer.write_all(bytes) {
            self.report(e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            self.report(e);
        }
    }

    //reported once per stream; the worker cannot log through itself
    fn report(&mut self, error: std::io::Error) {
        if !self.failed {
            self.failed = true;
            eprintln!("tintlog: failed to write {}: {error}", self.path.display());
        }
    }
}

struct Worker {
    outputs: Vec<Output>,
    debug: bool,
    html: bool,
    dirty: bool,
}

impl Worker {
    fn write(&mut self, level: Level, text: &str) {
        for output in &mut self.outputs {
            if output.category.accepts(level, self.debug) {
                output.write(text.as_bytes());
                self.dirty = true;
            }
        }
    }

    fn flush(&mut self) {
        if self.dirty {
            for output in &mut self.outputs {
                output.flush();
            }
            self.dirty = false;
        }
    }

    fn finish(mut self) {
        if self.html {
            for output in &mut self.outputs {
                output.write(html::FOOTER.as_bytes());
            }
            self.dirty = true;
        }
        self.flush();
    }

    fn run(mut self, receiver: mpsc::Receiver<Job>) {
        loop {
            match receiver.recv_sync_timeout(Instant::now() + IDLE_FLUSH) {
                Ok(Job::Write(level, text)) => self.write(level, &text),
                Ok(Job::Flush(ack)) => {
                    self.flush();
                    let _ = ack.send_sync(());
                }
                Ok(Job::Close) => break,
                Err(mpsc::RecvTimeoutError::Timeout) => self.flush(),
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        self.finish();
    }
}

/// Starts the worker; the returned sender is its only way in.
pub(crate) fn spawn(
    name: String,
    outputs: Vec<Output>,
    debug: bool,
    html: bool,
) -> std::io::Result<(mpsc::Sender<Job>, JoinHandle<()>)> {
    let (sender, receiver) = mpsc::channel();
    let worker = Worker {
        outputs,
        debug,
        html,
        dirty: false,
    };
    let handle = std::thread::Builder::new()
        .name(name)
        .spawn(move || worker.run(receiver))?;
    Ok((sender, handle))
}

/// Blocks until `ack` answers or its worker is gone.
pub(crate) fn wait_for(ack: &mpsc::Receiver<()>) {
    loop {
        match ack.recv_sync_timeout(Instant::now() + IDLE_FLUSH) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => return,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
    }
}
