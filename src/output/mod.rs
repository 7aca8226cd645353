//! Artifact disposal

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

pub mod writer;

pub use writer::ArtifactWriter;

/// What to do when the destination file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Refuse to replace an existing file
    #[default]
    Never,
    /// Replace an existing file
    Always,
}

impl OverwritePolicy {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "never" => Ok(OverwritePolicy::Never),
            "always" => Ok(OverwritePolicy::Always),
            other => Err(DomainError::BadArgs(format!(
                "Invalid overwrite policy: {}. Valid policies: never, always",
                other
            ))),
        }
    }
}
