// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Capacity of the engine event channel before slow subscribers start lagging
const ENGINE_EVENT_CAPACITY: usize = 256;

/// Port for the external transcoding engine.
///
/// The engine owns a private working storage addressed by plain names. It
/// must be bootstrapped by its owner before the orchestrator sees it.
#[async_trait]
pub trait EnginePort: Send + Sync {
    /// Whether bootstrap finished and the engine can accept work
    fn is_loaded(&self) -> bool;

    /// Copy bytes into working storage under `name`
    async fn stage(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError>;

    /// Run one command; fails on non-zero exit or internal error
    async fn execute(&self, argv: &[String]) -> Result<(), DomainError>;

    /// Read a file back out of working storage
    async fn retrieve(&self, name: &str) -> Result<Vec<u8>, DomainError>;

    /// Remove a file from working storage
    async fn unstage(&self, name: &str) -> Result<(), DomainError>;

    /// Attach to the engine's progress and log stream
    fn subscribe(&self) -> EngineSubscription;
}

/// Port for the media element that renders the selected video.
///
/// Called only from the UI task, so it is synchronous and takes `&mut self`.
pub trait MediaElementPort {
    /// Live playback position in seconds
    fn current_time(&self) -> f64;

    /// Seek to `seconds`
    fn set_current_time(&mut self, seconds: f64);

    fn play(&mut self);

    fn pause(&mut self);

    fn is_paused(&self) -> bool;
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Duration of the media file in seconds
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError>;
}

/// Sending half of the engine event stream, shared by engine implementations
#[derive(Debug, Clone)]
pub struct EngineEventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl EngineEventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(ENGINE_EVENT_CAPACITY);
        Self { sender }
    }

    /// Publish an event; events with no subscriber attached are dropped
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> EngineSubscription {
        EngineSubscription::new(self.sender.subscribe())
    }
}

impl Default for EngineEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of the engine event stream.
///
/// Dropping the subscription detaches it from the engine.
#[derive(Debug)]
pub struct EngineSubscription {
    receiver: broadcast::Receiver<EngineEvent>,
}

impl EngineSubscription {
    pub fn new(receiver: broadcast::Receiver<EngineEvent>) -> Self {
        Self { receiver }
    }

    /// Wait for the next event; `None` once the engine side is gone
    pub async fn next(&mut self) -> Option<EngineEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Engine subscription lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-delivered event, without waiting
    pub fn try_next(&mut self) -> Option<EngineEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Engine subscription lagged");
                }
                Err(_) => return None,
            }
        }
    }
}
