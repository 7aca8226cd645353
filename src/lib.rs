//! gifclip Library
//!
//! Select a trim window in a local video and convert it to an animated GIF.
//! The player keeps the trim range, playback position and scrub track in one
//! model; the transcode orchestrator drives an external engine through a
//! fixed stage / execute / retrieve / cleanup pipeline.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod intake;
pub mod output;
pub mod player;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    ConversionJob, DragSession, JobSnapshot, JobStatus, MediaSource, PlaybackState,
    ResultArtifact, TimeRange, TrackGeometry, TrimHandle,
};
pub use engine::TranscodeOrchestrator;
pub use error::{GifClipError, GifClipResult};
pub use player::TrimPlayer;
