//! Artifact file writer

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::domain::model::ResultArtifact;
use crate::error::{GifClipError, GifClipResult};
use crate::output::OverwritePolicy;

/// Persists a conversion artifact to disk
pub struct ArtifactWriter {
    overwrite: OverwritePolicy,
}

impl ArtifactWriter {
    pub fn new(overwrite: OverwritePolicy) -> Self {
        Self { overwrite }
    }

    /// Default destination: the artifact name next to the source file
    pub fn default_destination(source_path: &Path, artifact: &ResultArtifact) -> PathBuf {
        match source_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(artifact.file_name()),
            _ => PathBuf::from(artifact.file_name()),
        }
    }

    /// Write the artifact atomically: a temp file in the target directory renamed into place
    pub fn write(&self, artifact: &ResultArtifact, destination: &Path) -> GifClipResult<PathBuf> {
        info!("Writing artifact to {}", destination.display());

        if destination.exists() && self.overwrite == OverwritePolicy::Never {
            return Err(GifClipError::OutputError {
                message: format!(
                    "{} already exists and overwrite is disabled",
                    destination.display()
                ),
            });
        }

        let directory = match destination.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&directory).map_err(|e| GifClipError::OutputError {
            message: format!("Failed to create output directory: {}", e),
        })?;

        let mut temp = NamedTempFile::new_in(&directory).map_err(|e| GifClipError::OutputError {
            message: format!("Failed to create temporary file: {}", e),
        })?;
        temp.write_all(artifact.bytes())?;
        temp.as_file().sync_all()?;
        debug!("Temporary file written: {}", temp.path().display());

        self.place(temp, destination)?;

        info!(
            "Artifact written: {} ({} bytes, {})",
            destination.display(),
            artifact.len(),
            artifact.mime()
        );
        Ok(destination.to_path_buf())
    }

    /// Rename the finished temp file onto `destination`; `Never` refuses a file that appeared meanwhile
    fn place(&self, temp: NamedTempFile, destination: &Path) -> GifClipResult<()> {
        let persisted = match self.overwrite {
            OverwritePolicy::Never => temp.persist_noclobber(destination),
            OverwritePolicy::Always => temp.persist(destination),
        };
        persisted.map(|_| ()).map_err(|e| GifClipError::OutputError {
            message: format!(
                "Failed to move artifact into place at {}: {}",
                destination.display(),
                e.error
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact() -> ResultArtifact {
        ResultArtifact::new("clip.gif", "image/gif", b"GIF89a-data".to_vec())
    }

    #[test]
    fn test_write_new_file() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("nested").join("clip.gif");

        let writer = ArtifactWriter::new(OverwritePolicy::Never);
        let written = writer.write(&artifact(), &destination).unwrap();

        assert_eq!(written, destination);
        assert_eq!(std::fs::read(&destination).unwrap(), b"GIF89a-data");
    }

    #[test]
    fn test_existing_file_respects_policy() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("clip.gif");
        std::fs::write(&destination, b"old").unwrap();

        let never = ArtifactWriter::new(OverwritePolicy::Never);
        assert!(matches!(
            never.write(&artifact(), &destination),
            Err(GifClipError::OutputError { .. })
        ));
        assert_eq!(std::fs::read(&destination).unwrap(), b"old");

        let always = ArtifactWriter::new(OverwritePolicy::Always);
        always.write(&artifact(), &destination).unwrap();
        assert_eq!(std::fs::read(&destination).unwrap(), b"GIF89a-data");
    }

    #[test]
    fn test_never_policy_does_not_clobber_late_file() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("clip.gif");

        let mut temp = NamedTempFile::new_in(dir.path()).unwrap();
        temp.write_all(b"GIF89a-data").unwrap();
        // Another writer wins the race after the existence check
        std::fs::write(&destination, b"other").unwrap();

        let never = ArtifactWriter::new(OverwritePolicy::Never);
        assert!(matches!(
            never.place(temp, &destination),
            Err(GifClipError::OutputError { .. })
        ));
        assert_eq!(std::fs::read(&destination).unwrap(), b"other");
    }

    #[test]
    fn test_default_destination() {
        let artifact = artifact();
        assert_eq!(
            ArtifactWriter::default_destination(Path::new("/videos/clip.mp4"), &artifact),
            PathBuf::from("/videos/clip.gif")
        );
        assert_eq!(
            ArtifactWriter::default_destination(Path::new("clip.mp4"), &artifact),
            PathBuf::from("clip.gif")
        );
    }
}
