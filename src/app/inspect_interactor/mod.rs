// Inspect interactor - Reports what a conversion of a file would do

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::output_file_name;
use crate::intake::FileIntake;
use crate::ports::*;
use crate::utils::format_file_size;
use crate::utils::time::format_timestamp;

/// Inspection result, printable as text or JSON
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub file_name: String,
    pub mime: String,
    pub size_bytes: usize,
    pub duration: f64,
    pub default_range: TimeRange,
    pub output_name: String,
}

impl InspectReport {
    pub fn summary(&self) -> String {
        format!(
            "File:     {}\nType:     {}\nSize:     {}\nDuration: {}\nRange:    {} - {}\nOutput:   {}",
            self.file_name,
            self.mime,
            format_file_size(self.size_bytes as u64),
            format_timestamp(self.duration),
            format_timestamp(self.default_range.start),
            format_timestamp(self.default_range.end),
            self.output_name
        )
    }
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    intake: FileIntake,
    probe_port: Arc<dyn ProbePort>,
    output: OutputSettings,
}

impl InspectInteractor {
    pub fn new(intake: FileIntake, probe_port: Arc<dyn ProbePort>, output: OutputSettings) -> Self {
        Self {
            intake,
            probe_port,
            output,
        }
    }

    pub async fn execute(&self, input: &Path) -> Result<InspectReport, DomainError> {
        info!("Inspecting {}", input.display());

        let source = self.intake.accept(input).await?;
        let duration = self.probe_port.probe_duration(input).await?;

        Ok(InspectReport {
            file_name: source.file_name().to_string(),
            mime: source.mime().to_string(),
            size_bytes: source.len(),
            duration,
            default_range: TimeRange::full(duration),
            output_name: output_file_name(source.file_name(), &self.output.extension),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedProbe(f64);

    #[async_trait]
    impl ProbePort for FixedProbe {
        async fn probe_duration(&self, _file_path: &Path) -> Result<f64, DomainError> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn test_inspect_reports_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("beach.day.mov");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let interactor = InspectInteractor::new(
            FileIntake::default(),
            Arc::new(FixedProbe(12.5)),
            OutputSettings::default(),
        );
        let report = interactor.execute(&path).await.unwrap();

        assert_eq!(report.mime, "video/quicktime");
        assert_eq!(report.size_bytes, 2048);
        assert_eq!(report.default_range, TimeRange::full(12.5));
        assert_eq!(report.output_name, "beach.day.gif");
        assert!(report.summary().contains("2.00 KB"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["default_range"]["end"], 12.5);
    }

    #[tokio::test]
    async fn test_inspect_rejects_non_video() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let interactor = InspectInteractor::new(
            FileIntake::default(),
            Arc::new(FixedProbe(1.0)),
            OutputSettings::default(),
        );
        assert!(matches!(
            interactor.execute(&path).await,
            Err(DomainError::IntakeRejected(_))
        ));
    }
}
