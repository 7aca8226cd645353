//! FFmpeg execution adapter
//!
//! Runs the `ffmpeg` binary as a subprocess against a private working
//! directory. Staged files live in that directory under plain names, and
//! progress is read from `-progress pipe:1` while stderr is forwarded as log
//! lines.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::time::parse_time;

/// Stderr lines kept for the failure message
const STDERR_TAIL_LINES: usize = 8;

/// One parsed line of ffmpeg's `-progress` output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressLine {
    /// Output timestamp in microseconds
    OutTime(i64),
    /// `progress=end`
    End,
}

/// Parse a `key=value` line from `-progress` output
pub fn parse_progress_line(line: &str) -> Option<ProgressLine> {
    let (key, value) = line.trim().split_once('=')?;
    match key {
        // ffmpeg reports microseconds under both keys
        "out_time_us" | "out_time_ms" => value.trim().parse::<i64>().ok().map(ProgressLine::OutTime),
        "progress" if value.trim() == "end" => Some(ProgressLine::End),
        _ => None,
    }
}

/// Input duration in seconds from an ffmpeg banner line such as `  Duration: 00:00:10.04, start: 0.000000`
pub fn parse_duration_line(line: &str) -> Option<f64> {
    let rest = line.trim_start().strip_prefix("Duration:")?;
    let value = rest.split(',').next()?.trim();
    parse_time(value).ok().filter(|seconds| *seconds > 0.0)
}

/// Length of the clip window requested by `-ss`/`-to` in `argv`, if both are present
pub fn clip_span_from_argv(argv: &[String]) -> Option<f64> {
    let value_after = |flag: &str| {
        argv.iter()
            .position(|arg| arg == flag)
            .and_then(|idx| argv.get(idx + 1))
            .and_then(|value| value.parse::<f64>().ok())
    };
    let start = value_after("-ss")?;
    let end = value_after("-to")?;
    (end > start).then_some(end - start)
}

/// Read one `\n`-terminated line, decoding invalid UTF-8 lossily; `None` at EOF.
///
/// Partial bytes stay in `buf` when the future is dropped, so this can be raced in `select!`.
async fn read_lossy_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf)
        .trim_end_matches(['\r', '\n'])
        .to_string();
    buf.clear();
    Ok(Some(line))
}

/// FFmpeg-based engine
pub struct FfmpegEngine {
    ffmpeg_path: PathBuf,
    threads: usize,
    workdir: TempDir,
    events: EngineEventBus,
    loaded: AtomicBool,
}

impl FfmpegEngine {
    /// Create an engine with a fresh working directory; call [`load`](Self::load) before use
    pub fn new(ffmpeg_path: impl Into<PathBuf>, threads: usize) -> Result<Self, DomainError> {
        let workdir = tempfile::Builder::new()
            .prefix("gifclip-")
            .tempdir()
            .map_err(|e| DomainError::FsFail(format!("Failed to create working directory: {}", e)))?;
        let threads = if threads == 0 { num_cpus::get() } else { threads };

        debug!("Engine working directory: {}", workdir.path().display());
        Ok(Self {
            ffmpeg_path: ffmpeg_path.into(),
            threads,
            workdir,
            events: EngineEventBus::new(),
            loaded: AtomicBool::new(false),
        })
    }

    pub fn working_dir(&self) -> &Path {
        self.workdir.path()
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Verify the binary runs and mark the engine ready
    pub async fn load(&self) -> Result<String, DomainError> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::UnsupportedEnvironment(format!(
                    "Cannot run {}: {}",
                    self.ffmpeg_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(DomainError::UnsupportedEnvironment(format!(
                "{} -version exited with {:?}",
                self.ffmpeg_path.display(),
                output.status.code()
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        info!("Engine loaded: {}", version);
        self.loaded.store(true, Ordering::Release);
        Ok(version)
    }

    /// Map a staged name onto the working directory; only plain file names are addressable
    fn resolve(&self, name: &str) -> Result<PathBuf, DomainError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(DomainError::EngineExecution(format!(
                "Invalid staged name: {:?}",
                name
            )));
        }
        Ok(self.workdir.path().join(name))
    }

    fn full_argv(&self, argv: &[String]) -> Vec<String> {
        let mut full: Vec<String> = [
            "-hide_banner",
            "-nostdin",
            "-y",
            "-nostats",
            "-progress",
            "pipe:1",
            "-threads",
        ]
        .iter()
        .map(|arg| arg.to_string())
        .collect();
        full.push(self.threads.to_string());
        full.extend(argv.iter().cloned());
        full
    }

    fn publish_progress(&self, line: ProgressLine, total_micros: Option<f64>, last_micros: &mut i64) {
        let event = match line {
            ProgressLine::OutTime(micros) => {
                *last_micros = micros;
                let fraction = match total_micros {
                    Some(total) if total > 0.0 => micros as f64 / total,
                    _ => 0.0,
                };
                ProgressEvent {
                    fraction,
                    elapsed_micros: micros,
                }
            }
            ProgressLine::End => ProgressEvent {
                fraction: 1.0,
                elapsed_micros: *last_micros,
            },
        };
        self.events.emit(EngineEvent::Progress(event));
    }
}

#[async_trait]
impl EnginePort for FfmpegEngine {
    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    async fn stage(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::EngineExecution(format!("Failed to stage {}: {}", name, e)))?;
        debug!("Staged {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    async fn execute(&self, argv: &[String]) -> Result<(), DomainError> {
        if !self.is_loaded() {
            return Err(DomainError::UnsupportedEnvironment(
                "Engine has not been loaded".to_string(),
            ));
        }

        let full_argv = self.full_argv(argv);
        debug!("Running {} {:?}", self.ffmpeg_path.display(), full_argv);

        let mut child = Command::new(&self.ffmpeg_path)
            .args(&full_argv)
            .current_dir(self.workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DomainError::EngineExecution(format!("Failed to start ffmpeg: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DomainError::EngineExecution("ffmpeg stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DomainError::EngineExecution("ffmpeg stderr unavailable".to_string()))?;

        // A reader is dropped on EOF or error so ffmpeg never blocks on a full pipe
        let mut progress_reader = Some(BufReader::new(stdout));
        let mut log_reader = Some(BufReader::new(stderr));
        let mut progress_buf = Vec::new();
        let mut log_buf = Vec::new();

        let mut total_micros = clip_span_from_argv(argv).map(|seconds| seconds * 1_000_000.0);
        let mut last_micros = 0;
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);

        while progress_reader.is_some() || log_reader.is_some() {
            tokio::select! {
                line = async {
                    match progress_reader.as_mut() {
                        Some(reader) => read_lossy_line(reader, &mut progress_buf).await,
                        None => Ok(None),
                    }
                }, if progress_reader.is_some() => match line {
                    Ok(Some(line)) => {
                        if let Some(parsed) = parse_progress_line(&line) {
                            self.publish_progress(parsed, total_micros, &mut last_micros);
                        }
                    }
                    Ok(None) => progress_reader = None,
                    Err(e) => {
                        warn!("Failed to read ffmpeg progress: {}", e);
                        progress_reader = None;
                    }
                },
                line = async {
                    match log_reader.as_mut() {
                        Some(reader) => read_lossy_line(reader, &mut log_buf).await,
                        None => Ok(None),
                    }
                }, if log_reader.is_some() => match line {
                    Ok(Some(line)) => {
                        if total_micros.is_none() {
                            total_micros = parse_duration_line(&line).map(|seconds| seconds * 1_000_000.0);
                        }
                        if tail.len() == STDERR_TAIL_LINES {
                            tail.pop_front();
                        }
                        tail.push_back(line.clone());
                        self.events.emit(EngineEvent::Log(line));
                    }
                    Ok(None) => log_reader = None,
                    Err(e) => {
                        warn!("Failed to read ffmpeg log: {}", e);
                        log_reader = None;
                    }
                },
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| DomainError::EngineExecution(format!("Failed to wait for ffmpeg: {}", e)))?;

        if !status.success() {
            let detail = tail.into_iter().collect::<Vec<_>>().join("\n");
            return Err(DomainError::EngineExecution(format!(
                "ffmpeg exited with code {:?}: {}",
                status.code(),
                detail
            )));
        }
        Ok(())
    }

    async fn retrieve(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.resolve(name)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DomainError::EngineExecution(format!("Failed to retrieve {}: {}", name, e)))?;
        debug!("Retrieved {} ({} bytes)", name, bytes.len());
        Ok(bytes)
    }

    async fn unstage(&self, name: &str) -> Result<(), DomainError> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Unstaged {}", name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::EngineExecution(format!(
                "Failed to unstage {}: {}",
                name, e
            ))),
        }
    }

    fn subscribe(&self) -> EngineSubscription {
        self.events.subscribe()
    }
}
