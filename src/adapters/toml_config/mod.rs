// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::OutputSettings;
use crate::intake::DEFAULT_MAX_FILE_SIZE;
use crate::utils::logging::{parse_level, LogFormat, LoggingConfig};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "gifclip.toml";

/// Application configuration, read from the `[gifclip]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub max_file_size: u64,
    pub output_extension: String,
    pub output_mime: String,
    pub fps: u32,
    pub width: u32,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    /// Engine threads; 0 means one per CPU
    pub threads: usize,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        let output = OutputSettings::default();
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            output_extension: output.extension,
            output_mime: output.mime,
            fps: output.fps,
            width: output.width,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            threads: 0,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_file_size == 0 {
            return Err(DomainError::ConfigFail(
                "max_file_size must be greater than zero".to_string(),
            ));
        }
        if self.output_extension.is_empty()
            || !self
                .output_extension
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(DomainError::ConfigFail(format!(
                "Invalid output_extension: {:?}",
                self.output_extension
            )));
        }
        if self.output_mime.trim().is_empty() {
            return Err(DomainError::ConfigFail(
                "output_mime cannot be empty".to_string(),
            ));
        }
        if !(1..=120).contains(&self.fps) {
            return Err(DomainError::ConfigFail(format!(
                "fps must be between 1 and 120, got {}",
                self.fps
            )));
        }
        if !(16..=4096).contains(&self.width) {
            return Err(DomainError::ConfigFail(format!(
                "width must be between 16 and 4096, got {}",
                self.width
            )));
        }
        parse_level(&self.log_level)?;
        Ok(())
    }

    pub fn output_settings(&self) -> OutputSettings {
        OutputSettings {
            extension: self.output_extension.clone(),
            mime: self.output_mime.clone(),
            fps: self.fps,
            width: self.width,
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            ..LoggingConfig::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    gifclip: Option<AppConfig>,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a config document; a missing `[gifclip]` table yields defaults
    pub fn parse(toml_content: &str) -> Result<AppConfig, DomainError> {
        let parsed: ConfigFile = toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to parse TOML config: {}", e)))?;
        Ok(parsed.gifclip.unwrap_or_default())
    }

    /// Load and parse a config file
    pub fn load(path: &Path) -> Result<AppConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::ConfigFail(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::parse(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Platform config file: `$XDG_CONFIG_HOME`, `~/.config` or `%APPDATA%`
    pub fn default_config_path() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(dir).join("gifclip").join("config.toml"));
        }
        if let Some(appdata) = std::env::var_os("APPDATA").filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(appdata).join("gifclip").join("config.toml"));
        }
        std::env::var_os("HOME")
            .filter(|v| !v.is_empty())
            .map(|home| PathBuf::from(home).join(".config").join("gifclip").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.max_file_size, 52_428_800);
        assert_eq!(config.output_settings(), OutputSettings::default());
    }

    #[test]
    fn test_parse_partial_table() {
        let config = TomlConfigAdapter::parse(
            r#"
            [gifclip]
            fps = 10
            width = 480
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.fps, 10);
        assert_eq!(config.width, 480);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.output_extension, "gif");
    }

    #[test]
    fn test_parse_without_table() {
        let config = TomlConfigAdapter::parse("[other]\nkey = 1\n").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let result = TomlConfigAdapter::parse("[gifclip]\nfps = \"fast\"\n");
        assert!(matches!(result, Err(DomainError::ConfigFail(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig {
            fps: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        config.fps = 15;
        config.output_extension = "../gif".to_string();
        assert!(config.validate().is_err());

        config.output_extension = "gif".to_string();
        config.log_level = "chatty".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gifclip.toml");
        std::fs::write(&path, "[gifclip]\nffmpeg_path = \"/opt/ffmpeg/bin/ffmpeg\"\n").unwrap();

        let config = TomlConfigAdapter::load(&path).unwrap();
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));

        assert!(TomlConfigAdapter::load(&dir.path().join("missing.toml")).is_err());
    }
}
