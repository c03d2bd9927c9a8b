// SPDX-License-Identifier: MIT OR Apache-2.0
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use tintlog::{
    ExitReason, FATAL_EXIT_CODE, FileRenderer, FileStorageSettings, InMemorySink, Lifecycle, Logger,
    LoggerOptions, Sink,
};

/// A lifecycle whose exit handler records the code instead of exiting.
fn recording_lifecycle() -> (Lifecycle, Arc<AtomicI32>) {
    let code = Arc::new(AtomicI32::new(-1));
    let seen = code.clone();
    let lifecycle =
        Lifecycle::with_system_logger(None).with_exit_handler(move |c| seen.store(c, Ordering::SeqCst));
    (lifecycle, code)
}

fn attached(lifecycle: &Lifecycle) -> (Logger, Arc<InMemorySink>) {
    let logger = Logger::with_lifecycle(LoggerOptions::default().terminal(false), lifecycle).unwrap();
    let sink = Arc::new(InMemorySink::new());
    logger.register_sink(sink.clone());
    (logger, sink)
}

#[test]
fn fatal_renders_then_shuts_down() {
    let (lifecycle, code) = recording_lifecycle();
    let (logger, sink) = attached(&lifecycle);
    let cleaned = Arc::new(AtomicBool::new(false));
    let flag = cleaned.clone();
    lifecycle.register_cleanup_task("flag", move || async move {
        flag.store(true, Ordering::SeqCst);
    });

    logger.fatal("out of memory");

    assert_eq!(code.load(Ordering::SeqCst), FATAL_EXIT_CODE);
    assert!(cleaned.load(Ordering::SeqCst));
    assert!(logger.is_exited());
    assert!(lifecycle.is_exited());
    assert!(sink.drain_logs().contains("FATAL: out of memory"));

    logger.info("after the end");
    logger.fatal("again");
    assert_eq!(sink.len(), 0);
}

#[test]
fn loggers_sharing_a_lifecycle_stop_together() {
    let (lifecycle, _) = recording_lifecycle();
    let (first, _) = attached(&lifecycle);
    let (second, second_sink) = attached(&lifecycle);
    first.fatal("bye");
    second.info("dropped");
    assert!(second.is_exited());
    assert!(second_sink.is_empty());
}

#[test]
fn notify_exit_stops_attached_loggers() {
    let (lifecycle, code) = recording_lifecycle();
    let (logger, sink) = attached(&lifecycle);
    logger.info("before");
    lifecycle.notify_exit(ExitReason::Signal("SIGTERM".to_string()));
    logger.info("after");
    assert_eq!(code.load(Ordering::SeqCst), 0);
    let logs = sink.drain_logs();
    assert!(logs.contains("before"));
    assert!(!logs.contains("after"));
}

#[test]
fn system_logger_reports_exit() {
    let system = Logger::new(LoggerOptions::default().terminal(false).prefix("SYSTEM")).unwrap();
    let sink = Arc::new(InMemorySink::new());
    system.register_sink(sink.clone());
    let lifecycle = Lifecycle::with_system_logger(Some(system)).with_exit_handler(|_| {});
    lifecycle.register_cleanup_task("a", || async {});
    lifecycle.register_cleanup_task("a", || async {});
    lifecycle.unregister_cleanup_task("missing");
    lifecycle.notify_exit(ExitReason::Code(0));
    let logs = sink.drain_logs();
    assert!(logs.contains("[SYSTEM] WARN: Cleanup task with id a has been overwritten!"));
    assert!(logs.contains("Cleanup task with id missing not found!"));
    assert!(logs.contains("INFO: Program finished, code: 0"));
}

#[test_executors::async_test]
async fn overlapping_runs_execute_each_task_once() {
    let lifecycle = Lifecycle::with_system_logger(None);
    let runs = Arc::new(AtomicUsize::new(0));
    let (release, wait) = futures::channel::oneshot::channel::<()>();
    let counter = runs.clone();
    lifecycle.register_cleanup_task("slow", move || async move {
        let _ = wait.await;
        counter.fetch_add(1, Ordering::SeqCst);
    });
    futures::join!(
        lifecycle.run_cleanup_tasks(),
        lifecycle.run_cleanup_tasks(),
        async {
            let _ = release.send(());
        },
    );
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(lifecycle.task_ids().is_empty());
}

#[test_executors::async_test]
async fn cleanup_closes_file_renderers() {
    let dir = tempfile::tempdir().unwrap();
    let lifecycle = Lifecycle::with_system_logger(None);
    let files = FileRenderer::with_lifecycle(FileStorageSettings::new(dir.path()), &lifecycle).unwrap();
    let (logger, _) = attached(&lifecycle);
    logger.register_sink(files.clone());
    logger.warn("written before shutdown");
    lifecycle.run_cleanup_tasks().await;
    assert!(files.is_closed());
    assert!(!dir.path().join("latest.log").exists());
    let session = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|path| path.extension().is_some_and(|e| e == "log"))
        .unwrap();
    let text = std::fs::read_to_string(session).unwrap();
    assert!(text.contains("WARN: written before shutdown"));

    files.render(&sample_message());
    assert_eq!(files.enqueued_writes(), 1);
}

fn sample_message() -> tintlog::LogMessage {
    tintlog::LogMessage::new(
        tintlog::Level::Info,
        vec![tintlog::Chunk::new("late")],
        Arc::from(Vec::new()),
        tintlog::Presentation::default(),
        Arc::new(tintlog::Defaults::default()),
    )
}
