//! Time parsing and formatting utilities

use crate::error::{GifClipError, GifClipResult};

/// Parse a time string to seconds.
///
/// Accepts plain seconds (`12.5`), `MM:SS(.ms)` and `HH:MM:SS(.ms)`.
pub fn parse_time(time_str: &str) -> GifClipResult<f64> {
    let time_str = time_str.trim();
    let invalid = || GifClipError::InvalidTimeFormat {
        time: time_str.to_string(),
    };

    let parts: Vec<&str> = time_str.split(':').collect();
    let seconds = match parts.as_slice() {
        [seconds] => parse_component(seconds).ok_or_else(invalid)?,
        [minutes, seconds] => {
            let minutes = parse_whole(minutes).ok_or_else(invalid)?;
            let seconds = parse_sexagesimal(seconds).ok_or_else(invalid)?;
            minutes * 60.0 + seconds
        }
        [hours, minutes, seconds] => {
            let hours = parse_whole(hours).ok_or_else(invalid)?;
            let minutes = parse_whole(minutes).filter(|m| *m < 60.0).ok_or_else(invalid)?;
            let seconds = parse_sexagesimal(seconds).ok_or_else(invalid)?;
            hours * 3600.0 + minutes * 60.0 + seconds
        }
        _ => return Err(invalid()),
    };

    Ok(seconds)
}

fn parse_component(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_whole(value: &str) -> Option<f64> {
    value.parse::<u32>().ok().map(f64::from)
}

fn parse_sexagesimal(value: &str) -> Option<f64> {
    parse_component(value).filter(|v| *v < 60.0)
}

/// Toolbar-style label with one decimal, e.g. `12.3s`
pub fn format_seconds(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    format!("{:.1}s", seconds)
}

/// Format seconds as `MM:SS.mmm`, or `HH:MM:SS.mmm` past the hour
pub fn format_timestamp(seconds: f64) -> String {
    let total_millis = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    }
}
