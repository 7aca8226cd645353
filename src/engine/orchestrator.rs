//! Drives the external engine through one conversion

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::engine::progress::ProgressPublisher;
use crate::ports::EnginePort;

/// Turns a source and a trim window into a GIF artifact using the engine.
///
/// Only one job runs at a time; a second `convert` while one is running is
/// rejected with [`DomainError::JobAlreadyRunning`].
pub struct TranscodeOrchestrator {
    engine: Arc<dyn EnginePort>,
    settings: OutputSettings,
    publisher: ProgressPublisher,
    running: AtomicBool,
    next_job_id: AtomicU64,
}

/// Releases the single-job slot when the conversion ends, however it ends
struct RunningGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl TranscodeOrchestrator {
    pub fn new(engine: Arc<dyn EnginePort>, settings: OutputSettings) -> Self {
        Self {
            engine,
            settings,
            publisher: ProgressPublisher::new(),
            running: AtomicBool::new(false),
            next_job_id: AtomicU64::new(0),
        }
    }

    pub fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    /// Observe status and progress of the current job
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.publisher.subscribe()
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.publisher.current()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Convert `source` over `trim` into an artifact.
    ///
    /// Returns `Err` only when the job cannot start: invalid input, an engine
    /// that is not loaded, or another job still running. Once started, the
    /// job always comes back with a terminal status, and the staged files are
    /// removed from the engine whether it succeeded or not.
    #[instrument(skip_all, fields(source = %source.file_name(), trim = %trim))]
    pub async fn convert(
        &self,
        source: MediaSource,
        trim: TimeRange,
    ) -> Result<ConversionJob, DomainError> {
        validate_conversion_input(&source, &trim)?;

        if !self.engine.is_loaded() {
            return Err(DomainError::UnsupportedEnvironment(
                "Transcoding engine is not loaded".to_string(),
            ));
        }

        let guard = match RunningGuard::acquire(&self.running) {
            Some(guard) => guard,
            None => {
                warn!("Rejecting conversion while another job is running");
                return Err(DomainError::JobAlreadyRunning);
            }
        };

        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut job = ConversionJob::new(job_id, source, trim);
        job.status = JobStatus::Running;
        self.publisher.begin(job_id);

        let names = StagedNames::for_source(&job.source, &self.settings);
        info!(
            job_id,
            trimmed = TrimPolicy::requests_trim(&job.trim),
            "Starting conversion"
        );

        let outcome = self.run_pipeline(&mut job, &names).await;
        self.cleanup(&names).await;

        match outcome {
            Ok(bytes) => {
                let file_name = output_file_name(job.source.file_name(), &self.settings.extension);
                info!(job_id, bytes = bytes.len(), output = %file_name, "Conversion succeeded");
                job.artifact = Some(ResultArtifact::new(
                    file_name,
                    self.settings.mime.clone(),
                    bytes,
                ));
                job.progress = 1.0;
                job.status = JobStatus::Succeeded;
            }
            Err(e) => {
                error!(job_id, error = %e, "Conversion failed");
                job.status = JobStatus::Failed {
                    cause: e.to_string(),
                };
            }
        }
        job.finished_at = Some(Utc::now());

        // The terminal snapshot is visible before the slot frees
        self.publisher.finish(job_id, job.status.clone());
        drop(guard);
        Ok(job)
    }

    /// Stage, execute and retrieve; cleanup is the caller's job
    async fn run_pipeline(
        &self,
        job: &mut ConversionJob,
        names: &StagedNames,
    ) -> Result<Vec<u8>, DomainError> {
        debug!(name = %names.input, bytes = job.source.len(), "Staging source");
        self.engine.stage(&names.input, job.source.bytes()).await?;

        let argv = TranscodeCommand::build(names, &job.trim, &self.settings).to_argv();
        info!(argv = ?argv, "Executing engine command");
        self.execute_with_progress(job, &argv).await?;

        debug!(name = %names.output, "Retrieving output");
        let bytes = self.engine.retrieve(&names.output).await?;
        if bytes.is_empty() {
            return Err(DomainError::EngineExecution(format!(
                "Engine produced an empty '{}'",
                names.output
            )));
        }
        Ok(bytes)
    }

    /// Run the command while republishing engine events.
    ///
    /// The subscription lives exactly as long as the execution and is
    /// drained before it is dropped.
    async fn execute_with_progress(
        &self,
        job: &mut ConversionJob,
        argv: &[String],
    ) -> Result<(), DomainError> {
        let mut subscription = self.engine.subscribe();
        let execution = self.engine.execute(argv);
        tokio::pin!(execution);

        let result = loop {
            tokio::select! {
                biased;
                event = subscription.next() => match event {
                    Some(event) => self.handle_event(job, event),
                    None => break (&mut execution).await,
                },
                result = &mut execution => break result,
            }
        };

        while let Some(event) = subscription.try_next() {
            self.handle_event(job, event);
        }
        drop(subscription);

        result
    }

    fn handle_event(&self, job: &mut ConversionJob, event: EngineEvent) {
        match event {
            EngineEvent::Progress(progress) => match clamp_progress(progress.fraction) {
                Some(fraction) => {
                    trace!(fraction, elapsed_us = progress.elapsed_micros, "Engine progress");
                    job.progress = fraction;
                    self.publisher.progress(job.id, fraction);
                }
                None => debug!(raw = progress.fraction, "Dropping non-finite progress"),
            },
            EngineEvent::Log(line) => debug!(target: "gifclip::engine", "{}", line),
        }
    }

    /// Remove both staged names; failures are logged and never change the outcome
    async fn cleanup(&self, names: &StagedNames) {
        for name in [&names.input, &names.output] {
            match self.engine.unstage(name).await {
                Ok(()) => trace!(name = %name, "Unstaged"),
                Err(e) => debug!(name = %name, error = %e, "Could not unstage"),
            }
        }
    }
}
