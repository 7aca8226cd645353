// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Caller handed `convert` something it can never process
    InputConstraintViolation(String),
    /// The engine failed while staging, executing or retrieving
    EngineExecution(String),
    /// The engine was not bootstrapped or lacks a required capability
    UnsupportedEnvironment(String),
    /// A conversion is already running
    JobAlreadyRunning,
    /// File intake refused the selected file
    IntakeRejected(String),
    /// Probing the source failed
    ProbeFail(String),
    /// File system operation failed
    FsFail(String),
    /// Invalid arguments provided
    BadArgs(String),
    /// Configuration could not be loaded or validated
    ConfigFail(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InputConstraintViolation(msg) => {
                write!(f, "Input constraint violation: {}", msg)
            }
            DomainError::EngineExecution(msg) => write!(f, "Engine execution failed: {}", msg),
            DomainError::UnsupportedEnvironment(msg) => {
                write!(f, "Unsupported environment: {}", msg)
            }
            DomainError::JobAlreadyRunning => write!(f, "A conversion is already running"),
            DomainError::IntakeRejected(msg) => write!(f, "File rejected: {}", msg),
            DomainError::ProbeFail(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::ConfigFail(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
