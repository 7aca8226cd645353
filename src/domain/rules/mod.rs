// Domain rules - Business logic and policies

use crate::domain::errors::*;
use crate::domain::model::*;

/// Fallback artifact name when the source name yields no usable basename
const DEFAULT_OUTPUT_STEM: &str = "output";

/// Reserved name of the staged input, without extension
const STAGED_INPUT_STEM: &str = "input";

/// Reserved name of the staged output, without extension
const STAGED_OUTPUT_STEM: &str = "output";

/// Decides whether a trim window turns into explicit clip arguments
pub struct TrimPolicy;

impl TrimPolicy {
    /// A positive span that is narrower than the whole clip is a real trim.
    ///
    /// Zero-length, inverted and full-length windows all mean "convert the whole clip".
    pub fn requests_trim(range: &TimeRange) -> bool {
        range.span() > 0.0 && !range.is_full()
    }

    /// Clip window to pass to the engine, if any
    pub fn clip_window(range: &TimeRange) -> Option<(f64, f64)> {
        if Self::requests_trim(range) {
            Some((range.start, range.end))
        } else {
            None
        }
    }
}

/// Names used inside the engine's working storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedNames {
    pub input: String,
    pub output: String,
}

impl StagedNames {
    /// Derive the reserved staged names for a source and target extension
    pub fn for_source(source: &MediaSource, settings: &OutputSettings) -> Self {
        let input = if source.extension().is_empty() {
            STAGED_INPUT_STEM.to_string()
        } else {
            format!("{}.{}", STAGED_INPUT_STEM, source.extension())
        };
        Self {
            input,
            output: format!("{}.{}", STAGED_OUTPUT_STEM, settings.extension),
        }
    }
}

/// Output file name shown to the user: the source basename with the target extension
pub fn output_file_name(source_name: &str, extension: &str) -> String {
    let name = source_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_name)
        .trim();

    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        Some(_) => "",
        None => name,
    };

    if stem.is_empty() {
        format!("{}.{}", DEFAULT_OUTPUT_STEM, extension)
    } else {
        format!("{}.{}", stem, extension)
    }
}

/// Format a clip boundary for the engine command line
pub fn format_clip_time(seconds: f64) -> String {
    format!("{:.3}", seconds.max(0.0))
}

/// Clamp an engine-reported fraction into `[0, 1]`; non-finite values are dropped
pub fn clamp_progress(fraction: f64) -> Option<f64> {
    if fraction.is_finite() {
        Some(fraction.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Reject inputs `convert` can never act on
pub fn validate_conversion_input(
    source: &MediaSource,
    range: &TimeRange,
) -> Result<(), DomainError> {
    if source.is_empty() {
        return Err(DomainError::InputConstraintViolation(format!(
            "Source '{}' has no content",
            source.file_name()
        )));
    }
    range.validate()
}

/// Engine command for one conversion
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeCommand {
    pub input_name: String,
    pub output_name: String,
    pub clip: Option<(f64, f64)>,
    pub video_filter: String,
}

impl TranscodeCommand {
    /// Build the command for a staged input, trim window and output format
    pub fn build(names: &StagedNames, range: &TimeRange, settings: &OutputSettings) -> Self {
        Self {
            input_name: names.input.clone(),
            output_name: names.output.clone(),
            clip: TrimPolicy::clip_window(range),
            video_filter: format!("fps={},scale={}:-1", settings.fps, settings.width),
        }
    }

    /// Ordered argument vector handed to the engine
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = vec!["-i".to_string(), self.input_name.clone()];

        if let Some((start, end)) = self.clip {
            argv.push("-ss".to_string());
            argv.push(format_clip_time(start));
            argv.push("-to".to_string());
            argv.push(format_clip_time(end));
        }

        argv.push("-vf".to_string());
        argv.push(self.video_filter.clone());
        argv.push(self.output_name.clone());
        argv
    }
}

#[cfg(test)]
mod tests;
