//! Logging configuration and subscriber setup

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::domain::errors::DomainError;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    #[default]
    Pretty,
    /// Single-line text format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl FromStr for LogFormat {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(DomainError::ConfigFail(format!(
                "Invalid log format: {}. Valid formats: pretty, compact, json",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// Check a level name the way the subscriber will read it
pub fn parse_level(value: &str) -> Result<tracing::Level, DomainError> {
    value.trim().parse::<tracing::Level>().map_err(|_| {
        DomainError::ConfigFail(format!(
            "Invalid log level: {}. Valid levels: error, warn, info, debug, trace",
            value
        ))
    })
}

/// Logging configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include target module information
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            target: false,
        }
    }
}

impl LoggingConfig {
    /// `RUST_LOG` wins over the configured level
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr so stdout stays free for command output. Returns
/// `false` when a subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(config.target)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
        LogFormat::Compact => builder.compact().try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(
            "Logging initialized: level={}, format={}",
            config.level,
            config.format
        );
    }
    installed
}

/// Log version and platform information
pub fn log_system_info() {
    tracing::info!("gifclip {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Platform: {} {}, {} CPUs",
        std::env::consts::OS,
        std::env::consts::ARCH,
        num_cpus::get()
    );
}
