//! Trim window state with clamping invariants

use crate::domain::model::{sanitize_seconds, TimeRange, MIN_GAP};

/// Holds the trim window and the cached playhead of the loaded clip.
///
/// Every setter leaves `0 <= start <= end <= duration` and, when the clip is
/// longer than the minimum gap, `end - start >= min_gap`. Non-finite inputs
/// are ignored and leave the field unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRangeModel {
    range: TimeRange,
    playhead: f64,
    min_gap: f64,
}

impl TimeRangeModel {
    pub fn new() -> Self {
        Self::with_min_gap(MIN_GAP)
    }

    pub fn with_min_gap(min_gap: f64) -> Self {
        Self {
            range: TimeRange::full(0.0),
            playhead: 0.0,
            min_gap: sanitize_seconds(min_gap),
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn start(&self) -> f64 {
        self.range.start
    }

    pub fn end(&self) -> f64 {
        self.range.end
    }

    pub fn duration(&self) -> f64 {
        self.range.duration
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    /// Replace the clip duration, resetting the window to the whole clip
    pub fn set_duration(&mut self, duration: f64) {
        self.range = TimeRange::full(duration);
        self.playhead = self.playhead.clamp(0.0, self.range.duration);
    }

    /// Move the in-point, clamped to `[0, end - min_gap]`; returns the applied value
    pub fn set_start(&mut self, seconds: f64) -> f64 {
        if seconds.is_nan() {
            return self.range.start;
        }
        let upper = (self.range.end - self.min_gap).max(0.0);
        self.range.start = seconds.clamp(0.0, upper);
        self.range.start
    }

    /// Move the out-point, clamped to `[start + min_gap, duration]`; returns the applied value
    pub fn set_end(&mut self, seconds: f64) -> f64 {
        if seconds.is_nan() {
            return self.range.end;
        }
        let duration = self.range.duration;
        let lower = (self.range.start + self.min_gap).min(duration);
        self.range.end = seconds.clamp(lower, duration);
        self.range.end
    }

    /// Restore the window to the whole clip
    pub fn reset(&mut self) {
        self.range = TimeRange::full(self.range.duration);
    }

    /// Cache the playhead, clamped to `[0, duration]`; returns the applied value
    pub fn set_playhead(&mut self, seconds: f64) -> f64 {
        if seconds.is_nan() {
            return self.playhead;
        }
        self.playhead = seconds.clamp(0.0, self.range.duration);
        self.playhead
    }
}

impl Default for TimeRangeModel {
    fn default() -> Self {
        Self::new()
    }
}
