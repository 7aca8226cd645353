//! Job progress publication and console rendering

use std::io::{self, Write};
use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::model::{JobSnapshot, JobStatus};

/// Observer of conversion progress, driven by [`forward_to_callback`]
pub trait ProgressCallback: Send + Sync {
    /// A job entered `Running`
    fn on_start(&self, job_id: u64);

    /// Latest progress fraction in `[0, 1]`
    fn on_progress(&self, job_id: u64, fraction: f64);

    /// Job finished with an artifact
    fn on_complete(&self, job_id: u64);

    /// Job ended as `Failed`
    fn on_error(&self, job_id: u64, cause: &str);
}

/// Publishes the current job snapshot to any number of observers.
///
/// Backed by a watch channel, so slow observers only ever see the latest
/// value; progress is state, not an event log.
#[derive(Debug, Clone)]
pub struct ProgressPublisher {
    sender: Arc<watch::Sender<JobSnapshot>>,
}

impl ProgressPublisher {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(JobSnapshot::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> JobSnapshot {
        self.sender.borrow().clone()
    }

    /// Mark a new job as running at zero progress
    pub fn begin(&self, job_id: u64) {
        self.sender.send_replace(JobSnapshot {
            job_id,
            status: JobStatus::Running,
            progress: 0.0,
        });
    }

    /// Republish a clamped progress fraction; ignored unless `job_id` is the current job
    pub fn progress(&self, job_id: u64, fraction: f64) {
        self.sender.send_if_modified(|snapshot| {
            if snapshot.job_id != job_id {
                return false;
            }
            snapshot.progress = fraction;
            true
        });
    }

    /// Publish the terminal status; ignored unless `job_id` is the current job
    pub fn finish(&self, job_id: u64, status: JobStatus) {
        self.sender.send_if_modified(|snapshot| {
            if snapshot.job_id != job_id {
                return false;
            }
            if status == JobStatus::Succeeded {
                snapshot.progress = 1.0;
            }
            snapshot.status = status;
            true
        });
    }
}

impl Default for ProgressPublisher {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed snapshots from `receiver` into `callback` until the job reaches a terminal status.
///
/// A job that had already finished when the receiver subscribed is skipped.
/// Returns the terminal snapshot, or the last one seen if the publisher went away.
pub async fn forward_to_callback(
    mut receiver: watch::Receiver<JobSnapshot>,
    callback: Arc<dyn ProgressCallback>,
) -> JobSnapshot {
    let mut started_job = None;
    let finished_job = {
        let unseen = receiver.has_changed().unwrap_or(false);
        let current = receiver.borrow();
        (!unseen && current.status.is_terminal()).then_some(current.job_id)
    };

    loop {
        let snapshot = receiver.borrow_and_update().clone();

        match &snapshot.status {
            _ if finished_job == Some(snapshot.job_id) => {}
            JobStatus::Idle => {}
            JobStatus::Running => {
                if started_job != Some(snapshot.job_id) {
                    started_job = Some(snapshot.job_id);
                    callback.on_start(snapshot.job_id);
                }
                callback.on_progress(snapshot.job_id, snapshot.progress);
            }
            JobStatus::Succeeded => {
                callback.on_complete(snapshot.job_id);
                return snapshot;
            }
            JobStatus::Failed { cause } => {
                callback.on_error(snapshot.job_id, cause);
                return snapshot;
            }
        }

        if receiver.changed().await.is_err() {
            return receiver.borrow().clone();
        }
    }
}

/// Console progress callback for CLI usage
pub struct ConsoleProgressCallback {
    verbose: bool,
}

impl ConsoleProgressCallback {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn render_bar(fraction: f64) -> String {
        const WIDTH: usize = 30;
        let filled = ((fraction.clamp(0.0, 1.0) * WIDTH as f64).round() as usize).min(WIDTH);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_start(&self, job_id: u64) {
        if self.verbose {
            eprintln!("Converting (job {})", job_id);
        }
    }

    fn on_progress(&self, _job_id: u64, fraction: f64) {
        let mut stderr = io::stderr();
        let _ = write!(
            stderr,
            "\r{} {:5.1}%",
            Self::render_bar(fraction),
            fraction * 100.0
        );
        let _ = stderr.flush();
    }

    fn on_complete(&self, _job_id: u64) {
        eprintln!("\r{} 100.0%", Self::render_bar(1.0));
    }

    fn on_error(&self, _job_id: u64, cause: &str) {
        eprintln!();
        eprintln!("Conversion failed: {}", cause);
    }
}

/// Emits one JSON object per progress event on stdout
pub struct JsonProgressCallback;

impl JsonProgressCallback {
    fn emit(event: serde_json::Value) {
        println!("{}", event);
    }
}

impl ProgressCallback for JsonProgressCallback {
    fn on_start(&self, job_id: u64) {
        Self::emit(serde_json::json!({
            "event": "start",
            "job_id": job_id,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn on_progress(&self, job_id: u64, fraction: f64) {
        Self::emit(serde_json::json!({
            "event": "progress",
            "job_id": job_id,
            "percent": fraction * 100.0,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn on_complete(&self, job_id: u64) {
        Self::emit(serde_json::json!({
            "event": "complete",
            "job_id": job_id,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn on_error(&self, job_id: u64, cause: &str) {
        Self::emit(serde_json::json!({
            "event": "error",
            "job_id": job_id,
            "error": cause,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }
}

/// No-op progress callback for when progress tracking is disabled
pub struct NoOpProgressCallback;

impl ProgressCallback for NoOpProgressCallback {
    fn on_start(&self, _job_id: u64) {}
    fn on_progress(&self, _job_id: u64, _fraction: f64) {}
    fn on_complete(&self, _job_id: u64) {}
    fn on_error(&self, _job_id: u64, _cause: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    struct TestCallback {
        started: AtomicU64,
        progress_calls: AtomicU64,
        completed: AtomicBool,
        error_called: AtomicBool,
    }

    impl TestCallback {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                started: AtomicU64::new(0),
                progress_calls: AtomicU64::new(0),
                completed: AtomicBool::new(false),
                error_called: AtomicBool::new(false),
            })
        }
    }

    impl ProgressCallback for TestCallback {
        fn on_start(&self, _job_id: u64) {
            self.started.fetch_add(1, Ordering::Relaxed);
        }

        fn on_progress(&self, _job_id: u64, _fraction: f64) {
            self.progress_calls.fetch_add(1, Ordering::Relaxed);
        }

        fn on_complete(&self, _job_id: u64) {
            self.completed.store(true, Ordering::Relaxed);
        }

        fn on_error(&self, _job_id: u64, _cause: &str) {
            self.error_called.store(true, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_publisher_lifecycle() {
        let publisher = ProgressPublisher::new();
        assert_eq!(publisher.current().status, JobStatus::Idle);

        publisher.begin(3);
        publisher.progress(3, 0.4);
        let snapshot = publisher.current();
        assert_eq!(snapshot.job_id, 3);
        assert_eq!(snapshot.status, JobStatus::Running);
        assert_eq!(snapshot.progress, 0.4);

        publisher.finish(3, JobStatus::Succeeded);
        assert_eq!(publisher.current().progress, 1.0);
    }

    #[test]
    fn test_stale_job_updates_are_ignored() {
        let publisher = ProgressPublisher::new();
        publisher.begin(1);
        publisher.begin(2);
        publisher.progress(1, 0.9);
        publisher.finish(1, JobStatus::Succeeded);

        let snapshot = publisher.current();
        assert_eq!(snapshot.job_id, 2);
        assert_eq!(snapshot.status, JobStatus::Running);
        assert_eq!(snapshot.progress, 0.0);
    }

    #[test]
    fn test_failed_job_keeps_last_progress() {
        let publisher = ProgressPublisher::new();
        publisher.begin(1);
        publisher.progress(1, 0.3);
        publisher.finish(1, JobStatus::Failed {
            cause: "exit 1".to_string(),
        });
        let snapshot = publisher.current();
        assert_eq!(snapshot.progress, 0.3);
        assert!(snapshot.status.is_terminal());
    }

    #[tokio::test]
    async fn test_forward_to_callback_until_complete() {
        let publisher = ProgressPublisher::new();
        let callback = TestCallback::new();
        let receiver = publisher.subscribe();

        publisher.begin(9);
        let forwarder = tokio::spawn(forward_to_callback(receiver, callback.clone()));

        tokio::task::yield_now().await;
        publisher.progress(9, 0.5);
        tokio::task::yield_now().await;
        publisher.finish(9, JobStatus::Succeeded);

        let terminal = forwarder.await.unwrap();
        assert_eq!(terminal.status, JobStatus::Succeeded);
        assert_eq!(callback.started.load(Ordering::Relaxed), 1);
        assert!(callback.progress_calls.load(Ordering::Relaxed) >= 1);
        assert!(callback.completed.load(Ordering::Relaxed));
        assert!(!callback.error_called.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_forward_to_callback_reports_failure() {
        let publisher = ProgressPublisher::new();
        let callback = TestCallback::new();
        let receiver = publisher.subscribe();

        publisher.begin(2);
        publisher.finish(2, JobStatus::Failed {
            cause: "engine crashed".to_string(),
        });

        let terminal = forward_to_callback(receiver, callback.clone()).await;
        assert!(matches!(terminal.status, JobStatus::Failed { .. }));
        assert!(callback.error_called.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_forward_to_callback_skips_previous_job() {
        let publisher = ProgressPublisher::new();
        publisher.begin(1);
        publisher.finish(1, JobStatus::Succeeded);

        let callback = TestCallback::new();
        let forwarder = tokio::spawn(forward_to_callback(publisher.subscribe(), callback.clone()));
        tokio::task::yield_now().await;
        assert!(!forwarder.is_finished());

        publisher.begin(2);
        publisher.finish(2, JobStatus::Failed {
            cause: "boom".to_string(),
        });
        let terminal = forwarder.await.unwrap();
        assert_eq!(terminal.job_id, 2);
        assert!(callback.error_called.load(Ordering::Relaxed));
        assert!(!callback.completed.load(Ordering::Relaxed));
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(
            ConsoleProgressCallback::render_bar(0.5),
            format!("[{}{}]", "#".repeat(15), "-".repeat(15))
        );
        assert_eq!(
            ConsoleProgressCallback::render_bar(7.0),
            format!("[{}]", "#".repeat(30))
        );
    }
}
