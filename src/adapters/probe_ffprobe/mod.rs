//! FFprobe adapter for media duration probing

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Parse the bare duration ffprobe prints with `-of default=nw=1:nk=1`
pub fn parse_probe_duration(output: &str) -> Result<f64, DomainError> {
    let value = output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| DomainError::ProbeFail("ffprobe reported no duration".to_string()))?;

    match value.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(DomainError::ProbeFail(format!(
            "Unusable duration from ffprobe: {}",
            value
        ))),
    }
}

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    ffprobe_path: PathBuf,
}

impl FfprobeAdapter {
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=nw=1:nk=1",
            ])
            .arg(file_path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::ProbeFail(format!(
                    "Cannot run {}: {}",
                    self.ffprobe_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(DomainError::ProbeFail(format!(
                "ffprobe failed on {}: {}",
                file_path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let duration = parse_probe_duration(&String::from_utf8_lossy(&output.stdout))?;
        debug!("Probed {}: {:.3}s", file_path.display(), duration);
        Ok(duration)
    }
}
