//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter, LOCAL_CONFIG_FILE};
use crate::cli::{Cli, Commands};
use crate::domain::errors::DomainError;
use crate::utils::logging::LogFormat;

/// Environment variables and the config keys they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("GIFCLIP_MAX_FILE_SIZE", "max_file_size"),
    ("GIFCLIP_OUTPUT_EXTENSION", "output_extension"),
    ("GIFCLIP_OUTPUT_MIME", "output_mime"),
    ("GIFCLIP_FPS", "fps"),
    ("GIFCLIP_WIDTH", "width"),
    ("GIFCLIP_FFMPEG_PATH", "ffmpeg_path"),
    ("GIFCLIP_FFPROBE_PATH", "ffprobe_path"),
    ("GIFCLIP_THREADS", "threads"),
    ("GIFCLIP_LOG_LEVEL", "log_level"),
    ("GIFCLIP_LOG_FORMAT", "log_format"),
];

/// Build the configuration following precedence: CLI > Env > File > Defaults
///
/// Runs before logging is installed, so progress here is only visible at
/// `debug` when a subscriber already exists.
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<AppConfig> {
    // Step 1 and 2: defaults, overlaid by a config file when one is found
    let mut config = match find_config_file(cli.config.as_deref())? {
        Some(path) => TomlConfigAdapter::load(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            debug!("No configuration file found, using defaults");
            AppConfig::default()
        }
    };

    // Step 3: environment
    let env_overrides = apply_environment(&mut config, |key| std::env::var(key).ok())?;
    if env_overrides > 0 {
        debug!("Applied {} environment variable overrides", env_overrides);
    }

    // Step 4: command line
    let cli_overrides = apply_cli_overrides(&mut config, cli);
    if cli_overrides > 0 {
        debug!("Applied {} CLI configuration overrides", cli_overrides);
    }

    config.validate()?;
    info!("Configuration hierarchy initialized");
    Ok(config)
}

/// An explicit path must exist; otherwise `./gifclip.toml`, then the platform config file
fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>, DomainError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(DomainError::ConfigFail(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Ok(Some(local));
    }

    Ok(TomlConfigAdapter::default_config_path().filter(|path| path.is_file()))
}

/// Overlay `GIFCLIP_*` variables read through `lookup`; returns how many were applied
pub fn apply_environment<F>(config: &mut AppConfig, lookup: F) -> Result<usize, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;
    for &(env_var, key) in ENV_MAPPINGS {
        let Some(value) = lookup(env_var) else {
            continue;
        };
        set_config_value(config, key, &value).map_err(|e| {
            DomainError::ConfigFail(format!("{} from {}: {}", key, env_var, e))
        })?;
        debug!("Environment override: {} = {}", key, value);
        applied += 1;
    }
    Ok(applied)
}

fn set_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), String> {
    fn number<T: std::str::FromStr>(value: &str) -> Result<T, String> {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| format!("invalid number {:?}", value))
    }

    match key {
        "max_file_size" => config.max_file_size = number(value)?,
        "output_extension" => config.output_extension = value.trim().to_lowercase(),
        "output_mime" => config.output_mime = value.trim().to_string(),
        "fps" => config.fps = number(value)?,
        "width" => config.width = number(value)?,
        "ffmpeg_path" => config.ffmpeg_path = PathBuf::from(value),
        "ffprobe_path" => config.ffprobe_path = PathBuf::from(value),
        "threads" => config.threads = number(value)?,
        "log_level" => config.log_level = value.trim().to_lowercase(),
        "log_format" => {
            config.log_format = value.parse::<LogFormat>().map_err(|e| e.to_string())?
        }
        other => return Err(format!("unknown key {}", other)),
    }
    Ok(())
}

/// Apply CLI argument overrides; returns how many were applied
fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> usize {
    let mut cli_overrides = 0;

    if let Some(level) = &cli.log_level {
        config.log_level = level.trim().to_lowercase();
        cli_overrides += 1;
    }
    if cli.json_logs {
        config.log_format = LogFormat::Json;
        cli_overrides += 1;
    }
    if let Commands::Convert(args) = &cli.command {
        if let Some(fps) = args.fps {
            config.fps = fps;
            cli_overrides += 1;
        }
        if let Some(width) = args.width {
            config.width = width;
            cli_overrides += 1;
        }
    }

    cli_overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = AppConfig::default();
        let applied = apply_environment(
            &mut config,
            env(&[
                ("GIFCLIP_FPS", "12"),
                ("GIFCLIP_LOG_FORMAT", "json"),
                ("GIFCLIP_FFMPEG_PATH", "/usr/local/bin/ffmpeg"),
            ]),
        )
        .unwrap();

        assert_eq!(applied, 3);
        assert_eq!(config.fps, 12);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
    }

    #[test]
    fn test_environment_rejects_bad_number() {
        let mut config = AppConfig::default();
        let result = apply_environment(&mut config, env(&[("GIFCLIP_WIDTH", "wide")]));
        assert!(matches!(result, Err(DomainError::ConfigFail(_))));
    }

    #[test]
    fn test_cli_overrides_win() {
        let cli = Cli::try_parse_from([
            "gifclip",
            "--json-logs",
            "--log-level",
            "DEBUG",
            "convert",
            "-i",
            "clip.mp4",
            "--width",
            "640",
        ])
        .unwrap();
        let mut config = AppConfig {
            width: 200,
            ..AppConfig::default()
        };

        assert_eq!(apply_cli_overrides(&mut config, &cli), 3);
        assert_eq!(config.width, 640);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[gifclip]\nwidth = 400\n").unwrap();

        assert_eq!(find_config_file(Some(&path)).unwrap(), Some(path.clone()));
        assert!(find_config_file(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
