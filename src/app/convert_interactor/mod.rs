// Convert interactor - Orchestrates the source-to-GIF use case

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::adapters::SimulatedMediaElement;
use crate::domain::model::*;
use crate::engine::{forward_to_callback, ProgressCallback, TranscodeOrchestrator};
use crate::error::{GifClipError, GifClipResult};
use crate::intake::FileIntake;
use crate::output::{ArtifactWriter, OverwritePolicy};
use crate::player::TrimPlayer;
use crate::ports::*;

/// Request to convert one file
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    /// Trim-in in seconds; the clip start when absent
    pub start: Option<f64>,
    /// Trim-out in seconds; the clip end when absent
    pub end: Option<f64>,
    /// Destination; `<basename>.<ext>` next to the input when absent
    pub output: Option<PathBuf>,
    pub overwrite: OverwritePolicy,
}

impl ConvertRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            start: None,
            end: None,
            output: None,
            overwrite: OverwritePolicy::Never,
        }
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone)]
pub struct ConvertResponse {
    pub job_id: u64,
    pub range: TimeRange,
    pub trimmed: bool,
    pub output_path: PathBuf,
    pub artifact_size: usize,
    pub mime: String,
}

/// Interactor for the convert use case
pub struct ConvertInteractor {
    intake: FileIntake,
    probe_port: Arc<dyn ProbePort>,
    orchestrator: Arc<TranscodeOrchestrator>,
}

impl ConvertInteractor {
    pub fn new(
        intake: FileIntake,
        probe_port: Arc<dyn ProbePort>,
        orchestrator: Arc<TranscodeOrchestrator>,
    ) -> Self {
        Self {
            intake,
            probe_port,
            orchestrator,
        }
    }

    pub fn orchestrator(&self) -> &Arc<TranscodeOrchestrator> {
        &self.orchestrator
    }

    /// Intake, select the trim window, convert and write the artifact
    pub async fn execute(
        &self,
        request: ConvertRequest,
        callback: Arc<dyn ProgressCallback>,
    ) -> GifClipResult<ConvertResponse> {
        if !request.input.exists() {
            return Err(GifClipError::InputFileNotFound {
                path: request.input.display().to_string(),
            });
        }

        let source = self.intake.accept(&request.input).await?;
        let duration = self.probe_port.probe_duration(&request.input).await?;
        info!("Source duration: {:.3}s", duration);

        let range = select_range(duration, request.start, request.end);
        let trimmed = crate::domain::rules::TrimPolicy::requests_trim(&range);
        info!("Trim window: {} (trimmed: {})", range, trimmed);

        let forwarder = tokio::spawn(forward_to_callback(
            self.orchestrator.subscribe(),
            callback,
        ));

        let mut job = match self.orchestrator.convert(source, range).await {
            Ok(job) => job,
            Err(e) => {
                forwarder.abort();
                return Err(e.into());
            }
        };
        if let Err(e) = forwarder.await {
            warn!("Progress reporting stopped early: {}", e);
        }

        match &job.status {
            JobStatus::Succeeded => {}
            JobStatus::Failed { cause } => {
                return Err(GifClipError::ConversionFailed {
                    cause: cause.clone(),
                })
            }
            other => {
                return Err(GifClipError::ConversionFailed {
                    cause: format!("job ended as {}", other),
                })
            }
        }

        let artifact = job.take_artifact().ok_or_else(|| GifClipError::ConversionFailed {
            cause: "succeeded without an artifact".to_string(),
        })?;
        let destination = request
            .output
            .clone()
            .unwrap_or_else(|| ArtifactWriter::default_destination(&request.input, &artifact));

        let output_path = ArtifactWriter::new(request.overwrite).write(&artifact, &destination)?;

        Ok(ConvertResponse {
            job_id: job.id,
            range,
            trimmed,
            output_path,
            artifact_size: artifact.len(),
            mime: artifact.mime().to_string(),
        })
    }
}

/// Run the requested window through the player's clamped setters
pub fn select_range(duration: f64, start: Option<f64>, end: Option<f64>) -> TimeRange {
    let mut player = TrimPlayer::new(SimulatedMediaElement::new(duration));
    player.load_source(duration);
    let full = player.range();
    match (start, end) {
        (None, None) => full,
        (start, end) => player.set_trim(start.unwrap_or(0.0), end.unwrap_or(full.end)),
    }
}
