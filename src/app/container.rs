use std::sync::Arc;

use crate::adapters::{FfmpegEngine, FfprobeAdapter, TomlConfigAdapter};
use crate::adapters::toml_config::AppConfig;
use crate::app::{
    convert_interactor::ConvertInteractor, inspect_interactor::InspectInteractor,
    preview_interactor::PreviewInteractor,
};
use crate::domain::errors::DomainError;
use crate::engine::TranscodeOrchestrator;
use crate::intake::FileIntake;
use crate::ports::{EnginePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn preview_interactor(&self) -> Arc<PreviewInteractor>;
}

pub struct DefaultAppContainer {
    engine: Arc<FfmpegEngine>,
    convert_interactor: Arc<ConvertInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    preview_interactor: Arc<PreviewInteractor>,
}

impl DefaultAppContainer {
    /// Wire adapters from configuration; the engine is not loaded yet
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let engine = Arc::new(FfmpegEngine::new(&config.ffmpeg_path, config.threads)?);
        let probe_port = Arc::new(FfprobeAdapter::new(&config.ffprobe_path));
        let intake = FileIntake::new(config.max_file_size);
        let output = config.output_settings();

        let orchestrator = Arc::new(TranscodeOrchestrator::new(
            Arc::clone(&engine) as Arc<dyn EnginePort>,
            output.clone(),
        ));

        let convert_interactor = Arc::new(ConvertInteractor::new(
            intake.clone(),
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            orchestrator,
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            intake,
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            output,
        ));

        let preview_interactor = Arc::new(PreviewInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
        ));

        Ok(Self {
            engine,
            convert_interactor,
            inspect_interactor,
            preview_interactor,
        })
    }

    /// Container with every setting at its default
    pub fn with_defaults() -> Result<Self, DomainError> {
        Self::new(&TomlConfigAdapter::parse("")?)
    }

    /// Bootstrap the engine; conversions fail with `UnsupportedEnvironment` until this succeeds
    pub async fn load_engine(&self) -> Result<(), DomainError> {
        if self.engine.is_loaded() {
            return Ok(());
        }
        self.engine.load().await.map(|_| ())
    }
}

impl AppContainer for DefaultAppContainer {
    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn preview_interactor(&self) -> Arc<PreviewInteractor> {
        Arc::clone(&self.preview_interactor)
    }
}
