//! File intake: size limit and video-type filter in front of the core

use std::path::Path;

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::{extension_of, MediaSource};

/// Default intake limit, 50 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Extensions accepted as video, with the MIME type each is declared as
const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("ogv", "video/ogg"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("3gp", "video/3gpp"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
];

/// Video MIME type for a file name, if its extension is an accepted video type
pub fn video_mime_for(file_name: &str) -> Option<&'static str> {
    let extension = extension_of(file_name)?;
    VIDEO_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

/// Turns user-selected files into [`MediaSource`]s, rejecting what the core must never see
#[derive(Debug, Clone)]
pub struct FileIntake {
    max_file_size: u64,
}

impl FileIntake {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Read and accept a file from disk
    pub async fn accept(&self, path: &Path) -> Result<MediaSource, DomainError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                DomainError::IntakeRejected(format!("Not a file: {}", path.display()))
            })?;

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            DomainError::FsFail(format!("Cannot access {}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(DomainError::IntakeRejected(format!(
                "Not a file: {}",
                path.display()
            )));
        }
        // Checked before reading so oversize files are never loaded
        self.check_size(&file_name, metadata.len())?;
        self.check_type(&file_name)?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.accept_bytes(file_name, bytes)
    }

    /// Accept an in-memory file
    pub fn accept_bytes(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<MediaSource, DomainError> {
        let file_name = file_name.into();
        self.check_size(&file_name, bytes.len() as u64)?;
        let mime = self.check_type(&file_name)?;

        info!(
            "Accepted {} ({} bytes, {})",
            file_name,
            bytes.len(),
            mime
        );
        Ok(MediaSource::new(file_name, mime, bytes))
    }

    fn check_size(&self, file_name: &str, len: u64) -> Result<(), DomainError> {
        if len == 0 {
            return Err(DomainError::IntakeRejected(format!(
                "{} is empty",
                file_name
            )));
        }
        if len > self.max_file_size {
            return Err(DomainError::IntakeRejected(format!(
                "{} is {} bytes, limit is {} bytes",
                file_name, len, self.max_file_size
            )));
        }
        Ok(())
    }

    fn check_type(&self, file_name: &str) -> Result<&'static str, DomainError> {
        let mime = video_mime_for(file_name).ok_or_else(|| {
            DomainError::IntakeRejected(format!("{} is not a supported video file", file_name))
        })?;
        debug!("{} detected as {}", file_name, mime);
        Ok(mime)
    }
}

impl Default for FileIntake {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}
