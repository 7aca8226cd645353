//! Transcode orchestration
//!
//! [`TranscodeOrchestrator`] runs the fixed stage / execute / retrieve /
//! cleanup pipeline against an [`EnginePort`](crate::ports::EnginePort) and
//! republishes engine progress through a [`ProgressPublisher`].

pub mod orchestrator;
pub mod progress;

pub use orchestrator::TranscodeOrchestrator;
pub use progress::{
    forward_to_callback, ConsoleProgressCallback, JsonProgressCallback, NoOpProgressCallback,
    ProgressCallback, ProgressPublisher,
};
