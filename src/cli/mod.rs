//! CLI module for gifclip
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ConvertArgs, InspectArgs, PreviewArgs};

/// gifclip
///
/// Pick a trim window in a local video and turn it into an animated GIF.
#[derive(Parser, Debug)]
#[command(name = "gifclip")]
#[command(about = "gifclip - Trim a video and turn it into a GIF")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file (default: ./gifclip.toml, then the user config directory)
    #[arg(long, global = true, env = "GIFCLIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a video, or a trimmed part of it, to a GIF
    Convert(args::ConvertArgs),
    /// Show duration, default trim window and output name
    Inspect(args::InspectArgs),
    /// Play the trim window on a virtual clock until it auto-pauses
    Preview(args::PreviewArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "gifclip", "--log-level", "debug", "convert", "-i", "clip.mp4", "-s", "1.5", "-e",
            "00:04", "--fps", "10",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.input, PathBuf::from("clip.mp4"));
                assert_eq!(args.start.as_deref(), Some("1.5"));
                assert_eq!(args.end.as_deref(), Some("00:04"));
                assert_eq!(args.fps, Some(10));
                assert!(!args.overwrite);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_preview_defaults() {
        let cli = Cli::try_parse_from(["gifclip", "preview", "-i", "clip.mp4"]).unwrap();
        match cli.command {
            Commands::Preview(args) => assert_eq!(args.tick_ms, 100),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
