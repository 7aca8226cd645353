// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod simulated_media;
pub mod toml_config;

// Re-export adapters
pub use exec_ffmpeg::FfmpegEngine;
pub use probe_ffprobe::FfprobeAdapter;
pub use simulated_media::{MediaTick, SimulatedMediaElement};
pub use toml_config::{AppConfig, TomlConfigAdapter};
