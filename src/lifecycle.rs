// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coordinated shutdown.
//!
//! A [`Lifecycle`] is a handle shared by loggers and sinks that need to do work
//! before the process exits: file renderers register a task that drains their
//! queue, and loggers attached with [`Logger::with_lifecycle`](crate::Logger::with_lifecycle)
//! stop logging once the lifecycle has exited.
//!
//! Nothing here is global.  The host builds one `Lifecycle`, passes it to whatever
//! needs it, and reports its own termination through [`Lifecycle::notify_exit`].
//!
//! ```
//! # futures::executor::block_on(async {
//! use tintlog::Lifecycle;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let lifecycle = Lifecycle::new();
//! let closed = Arc::new(AtomicUsize::new(0));
//! let counter = closed.clone();
//! lifecycle.register_cleanup_task("db", move || async move {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//! lifecycle.run_cleanup_tasks().await;
//! lifecycle.run_cleanup_tasks().await;
//! assert_eq!(closed.load(Ordering::SeqCst), 1);
//! # });
//! ```

use crate::color::Color;
use crate::logger::{Logger, LoggerOptions};
use crate::prefix::Prefix;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Exit code used after a fatal log.
pub const FATAL_EXIT_CODE: i32 = 1;

const SYSTEM_PREFIX_COLOR: Color = Color::new(0xff, 0xaa, 0x00);

type CleanupTask = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;
type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// Why the host is going away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Normal termination with an exit code.
    Code(i32),
    /// Interrupted by a signal, e.g. `SIGINT`.  Exits with code 0.
    Signal(String),
    /// An unhandled failure.  Exits with [`FATAL_EXIT_CODE`].
    Failure(String),
}

impl ExitReason {
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitReason::Code(code) => *code,
            ExitReason::Signal(_) => 0,
            ExitReason::Failure(_) => FATAL_EXIT_CODE,
        }
    }
}

struct Inner {
    exited: AtomicBool,
    tasks: Mutex<HashMap<String, CleanupTask>>,
    running: futures::lock::Mutex<()>,
    exit_handler: Mutex<ExitHandler>,
    system_logger: Option<Logger>,
}

/// A cheap, cloneable handle; clones share state.
#[derive(Clone)]
pub struct Lifecycle {
    inner: Arc<Inner>,
}

impl Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("exited", &self.is_exited())
            .field("tasks", &self.task_ids())
            .finish()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// A lifecycle that reports through a `SYSTEM` logger on the terminal.
    pub fn new() -> Self {
        let options = LoggerOptions::default()
            .debug(true)
            .prefix(Prefix::new("SYSTEM").with_color(SYSTEM_PREFIX_COLOR));
        Self::build(Logger::new(options).ok())
    }

    /// A lifecycle that reports through `logger`, or not at all.
    pub fn with_system_logger(logger: Option<Logger>) -> Self {
        Self::build(logger)
    }

    fn build(system_logger: Option<Logger>) -> Self {
        Self {
            inner: Arc::new(Inner {
                exited: AtomicBool::new(false),
                tasks: Mutex::new(HashMap::new()),
                running: futures::lock::Mutex::new(()),
                exit_handler: Mutex::new(Arc::new(|code| std::process::exit(code))),
                system_logger,
            }),
        }
    }

    /// Replaces what happens once shutdown work is done.  Defaults to
    /// [`std::process::exit`].
    pub fn with_exit_handler(self, handler: impl Fn(i32) + Send + Sync + 'static) -> Self {
        *self
            .inner
            .exit_handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(handler);
        self
    }

    pub fn system_logger(&self) -> Option<&Logger> {
        self.inner.system_logger.as_ref()
    }

    pub fn is_exited(&self) -> bool {
        self.inner.exited.load(Ordering::Acquire)
    }

    /// Marks the lifecycle exited; returns whether it already was.
    pub(crate) fn mark_exited(&self) -> bool {
        self.inner.exited.swap(true, Ordering::AcqRel)
    }

    fn warn(&self, text: String) {
        if let Some(logger) = &self.inner.system_logger {
            logger.warn(text);
        }
    }

    /// Registers a task to run before exit.  Re-registering an id replaces the task.
    pub fn register_cleanup_task<F, Fut>(&self, id: impl Into<String>, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = id.into();
        let boxed: CleanupTask = Box::new(move || task().boxed());
        let replaced = self
            .inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), boxed)
            .is_some();
        if replaced {
            self.warn(format!("Cleanup task with id {id} has been overwritten!"));
        }
    }

    pub fn unregister_cleanup_task(&self, id: &str) {
        let removed = self
            .inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some();
        if !removed {
            self.warn(format!("Cleanup task with id {id} not found!"));
        }
    }

    /// Ids of the registered tasks, sorted.
    pub fn task_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Runs every registered task concurrently and forgets them.
    ///
    /// Overlapping calls wait for the run in progress instead of starting the same
    /// tasks again.
    pub async fn run_cleanup_tasks(&self) {
        let _running = self.inner.running.lock().await;
        let tasks: Vec<CleanupTask> = self
            .inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, task)| task)
            .collect();
        futures::future::join_all(tasks.into_iter().map(|task| task())).await;
    }

    /// The host is terminating.
    ///
    /// The first call logs the reason, marks the lifecycle exited, runs the cleanup
    /// tasks and hands the exit code to the exit handler.  Later calls do nothing.
    pub fn notify_exit(&self, reason: ExitReason) {
        if self.mark_exited() {
            return;
        }
        if let Some(logger) = &self.inner.system_logger {
            match &reason {
                ExitReason::Code(code) => logger.info(format!("Program finished, code: {code}")),
                ExitReason::Signal(_) => logger.warn("Manually Finished!"),
                ExitReason::Failure(error) => logger.error(error.as_str()),
            }
        }
        futures::executor::block_on(self.run_cleanup_tasks());
        self.exit(reason.exit_code());
    }

    pub(crate) fn exit(&self, code: i32) {
        let handler = self
            .inner
            .exit_handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        handler(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

    fn quiet() -> Lifecycle {
        Lifecycle::with_system_logger(None)
    }

    #[test]
    fn register_and_unregister() {
        let lifecycle = quiet();
        lifecycle.register_cleanup_task("a", || async {});
        lifecycle.register_cleanup_task("b", || async {});
        lifecycle.register_cleanup_task("a", || async {});
        assert_eq!(lifecycle.task_ids(), ["a", "b"]);
        lifecycle.unregister_cleanup_task("a");
        lifecycle.unregister_cleanup_task("missing");
        assert_eq!(lifecycle.task_ids(), ["b"]);
    }

    #[test]
    fn notify_exit_runs_once() {
        let code = Arc::new(AtomicI32::new(-1));
        let seen = code.clone();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let lifecycle = quiet().with_exit_handler(move |c| seen.store(c, Ordering::SeqCst));
        lifecycle.register_cleanup_task("flag", move || async move {
            flag.store(true, Ordering::SeqCst);
        });
        lifecycle.notify_exit(ExitReason::Code(3));
        assert!(lifecycle.is_exited());
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(code.load(Ordering::SeqCst), 3);

        code.store(-1, Ordering::SeqCst);
        lifecycle.notify_exit(ExitReason::Failure("again".into()));
        assert_eq!(code.load(Ordering::SeqCst), -1);
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ExitReason::Code(4).exit_code(), 4);
        assert_eq!(ExitReason::Signal("SIGINT".into()).exit_code(), 0);
        assert_eq!(ExitReason::Failure("x".into()).exit_code(), FATAL_EXIT_CODE);
    }
}
