//! Shared test doubles for the integration suites
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use gifclip::domain::errors::DomainError;
use gifclip::domain::model::{EngineEvent, MediaSource, ProgressEvent};
use gifclip::ports::{EngineEventBus, EnginePort, EngineSubscription, ProbePort};

/// One recorded engine call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Stage(String),
    Execute(Vec<String>),
    Retrieve(String),
    Unstage(String),
}

/// Engine that records every call and plays back a scripted outcome
pub struct FakeEngine {
    pub loaded: bool,
    pub progress: Vec<f64>,
    pub output: Vec<u8>,
    pub fail_stage: Option<String>,
    pub fail_execute: Option<String>,
    pub fail_retrieve: Option<String>,
    /// When set, `execute` signals `started` and waits for `release`
    pub gate: Option<(Arc<Notify>, Arc<Notify>)>,
    events: EngineEventBus,
    storage: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            loaded: true,
            progress: vec![0.25, 0.5, 1.0],
            output: b"GIF89a-fake".to_vec(),
            fail_stage: None,
            fail_execute: None,
            fail_retrieve: None,
            gate: None,
            events: EngineEventBus::new(),
            storage: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn execute_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Execute(argv) => Some(argv),
                _ => None,
            })
            .collect()
    }

    pub fn unstage_count(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == Call::Unstage(name.to_string()))
            .count()
    }

    pub fn stored_names(&self) -> Vec<String> {
        self.storage.lock().unwrap().keys().cloned().collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EnginePort for FakeEngine {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    async fn stage(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        self.record(Call::Stage(name.to_string()));
        if let Some(message) = &self.fail_stage {
            return Err(DomainError::EngineExecution(message.clone()));
        }
        self.storage
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn execute(&self, argv: &[String]) -> Result<(), DomainError> {
        self.record(Call::Execute(argv.to_vec()));

        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }

        self.events.emit(EngineEvent::Log("fake engine running".to_string()));
        for (idx, fraction) in self.progress.iter().enumerate() {
            self.events.emit(EngineEvent::Progress(ProgressEvent {
                fraction: *fraction,
                elapsed_micros: idx as i64 * 100_000,
            }));
        }

        if let Some(message) = &self.fail_execute {
            return Err(DomainError::EngineExecution(message.clone()));
        }

        if let Some(output_name) = argv.last() {
            self.storage
                .lock()
                .unwrap()
                .insert(output_name.clone(), self.output.clone());
        }
        Ok(())
    }

    async fn retrieve(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        self.record(Call::Retrieve(name.to_string()));
        if let Some(message) = &self.fail_retrieve {
            return Err(DomainError::EngineExecution(message.clone()));
        }
        self.storage
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::EngineExecution(format!("{} not found", name)))
    }

    async fn unstage(&self, name: &str) -> Result<(), DomainError> {
        self.record(Call::Unstage(name.to_string()));
        self.storage.lock().unwrap().remove(name);
        Ok(())
    }

    fn subscribe(&self) -> EngineSubscription {
        self.events.subscribe()
    }
}

/// Probe that always reports the same duration
pub struct FixedProbe(pub f64);

#[async_trait]
impl ProbePort for FixedProbe {
    async fn probe_duration(&self, _file_path: &Path) -> Result<f64, DomainError> {
        Ok(self.0)
    }
}

pub fn source(name: &str) -> MediaSource {
    MediaSource::new(name, "video/mp4", vec![0u8; 64])
}

pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}
