// Domain models - Core types and data structures

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Smallest trim window, in seconds, the range setters will ever publish
pub const MIN_GAP: f64 = 0.1;

/// Tolerance used when comparing a window against the clip bounds
const BOUNDARY_EPSILON: f64 = 1e-6;

/// Trim window over a clip of known duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

impl TimeRange {
    /// Range covering the whole clip
    pub fn full(duration: f64) -> Self {
        let duration = sanitize_seconds(duration);
        Self {
            start: 0.0,
            end: duration,
            duration,
        }
    }

    /// Length of the selected window
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// True when the window covers the entire clip, within float noise at either bound
    pub fn is_full(&self) -> bool {
        self.start <= BOUNDARY_EPSILON && self.end >= self.duration - BOUNDARY_EPSILON
    }

    /// True when `seconds` lies inside `[start, end)`
    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.start && seconds < self.end
    }

    /// Check the structural invariant `0 <= start <= end <= duration`
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.start.is_finite() && self.end.is_finite() && self.duration.is_finite()) {
            return Err(DomainError::InputConstraintViolation(
                "Trim range contains a non-finite value".to_string(),
            ));
        }
        if self.start < 0.0 || self.duration < 0.0 {
            return Err(DomainError::InputConstraintViolation(format!(
                "Trim range cannot be negative: {}",
                self
            )));
        }
        if self.end > self.duration {
            return Err(DomainError::InputConstraintViolation(format!(
                "Trim end exceeds clip duration: {}",
                self
            )));
        }
        Ok(())
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::full(0.0)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}s, {:.3}s] of {:.3}s", self.start, self.end, self.duration)
    }
}

/// Which end of the trim window a handle controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimHandle {
    Start,
    End,
}

/// Drag state of the scrub track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging(TrimHandle),
}

impl DragSession {
    /// Handle being moved, if any
    pub fn active_handle(&self) -> Option<TrimHandle> {
        match self {
            DragSession::Idle => None,
            DragSession::Dragging(handle) => Some(*handle),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DragSession::Dragging(_))
    }
}

/// On-screen geometry of the scrub track, read at the moment of each gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub left: f64,
    pub width: f64,
}

impl TrackGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Map a pointer x coordinate onto `[0, 1]` along the track.
    ///
    /// Degenerate geometry or a non-finite pointer collapses to `0.0`.
    pub fn normalize(&self, pointer_x: f64) -> f64 {
        if !(self.width.is_finite() && self.left.is_finite() && pointer_x.is_finite())
            || self.width <= 0.0
        {
            return 0.0;
        }
        ((pointer_x - self.left) / self.width).clamp(0.0, 1.0)
    }
}

/// Snapshot of playback for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_time: f64,
    pub is_playing: bool,
}

/// Normalized positions used to draw the scrub track
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackLayout {
    pub start_fraction: f64,
    pub end_fraction: f64,
    pub playhead_fraction: f64,
}

/// User-selected video, immutable once created
#[derive(Debug, Clone)]
pub struct MediaSource {
    file_name: String,
    extension: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl MediaSource {
    /// Create a new source; the extension is taken from the file name
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let extension = extension_of(&file_name).unwrap_or_default();
        Self {
            file_name,
            extension,
            mime: mime.into(),
            bytes: Arc::from(bytes),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Lowercase extension without the dot, empty when the name has none
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Output produced by a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ResultArtifact {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
    created_at: DateTime<Utc>,
}

impl ResultArtifact {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
            created_at: Utc::now(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Lifecycle of a conversion job
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed {
        cause: String,
    },
}

impl JobStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, JobStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed { .. })
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Idle => write!(f, "idle"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed { cause } => write!(f, "failed: {}", cause),
        }
    }
}

/// One conversion of one source over one trim window
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub id: u64,
    pub source: MediaSource,
    pub trim: TimeRange,
    pub status: JobStatus,
    pub progress: f64,
    pub artifact: Option<ResultArtifact>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ConversionJob {
    pub fn new(id: u64, source: MediaSource, trim: TimeRange) -> Self {
        Self {
            id,
            source,
            trim,
            status: JobStatus::Idle,
            progress: 0.0,
            artifact: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            job_id: self.id,
            status: self.status.clone(),
            progress: self.progress,
        }
    }

    /// Take ownership of the artifact, leaving the job without one
    pub fn take_artifact(&mut self) -> Option<ResultArtifact> {
        self.artifact.take()
    }
}

/// What the presentation layer observes while a job runs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: u64,
    pub status: JobStatus,
    pub progress: f64,
}

/// Progress report emitted by the engine during `execute`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub fraction: f64,
    pub elapsed_micros: i64,
}

/// Everything the engine can emit on its subscription
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress(ProgressEvent),
    Log(String),
}

/// Target format of the conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub extension: String,
    pub mime: String,
    pub fps: u32,
    pub width: u32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            extension: "gif".to_string(),
            mime: "image/gif".to_string(),
            fps: 15,
            width: 320,
        }
    }
}

/// Lowercase extension of a file name, if it has one
pub fn extension_of(file_name: &str) -> Option<String> {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => Some(name[idx + 1..].to_lowercase()),
        _ => None,
    }
}

/// Clamp a media-reported duration to a usable non-negative number
pub fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}
