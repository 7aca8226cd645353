//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Trim start (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub start: Option<String>,

    /// Trim end (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Output file path (default: <basename>.gif next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace the output file if it exists
    #[arg(long)]
    pub overwrite: bool,

    /// Output frame rate
    #[arg(long)]
    pub fps: Option<u32>,

    /// Output width in pixels; height keeps the aspect ratio
    #[arg(long)]
    pub width: Option<u32>,

    /// Report progress as JSON lines on stdout
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Trim start
    #[arg(short, long)]
    pub start: Option<String>,

    /// Trim end
    #[arg(short, long)]
    pub end: Option<String>,

    /// Milliseconds between simulated time updates
    #[arg(long, default_value_t = 100)]
    pub tick_ms: u64,
}
