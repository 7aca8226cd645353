// Simulated media adapter - Virtual-clock media element for headless playback

use crate::domain::model::sanitize_seconds;
use crate::ports::MediaElementPort;

/// What happened during one clock advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaTick {
    /// The position moved and a time update should be dispatched
    pub time_update: bool,
    /// Playback ran into the end of the stream
    pub ended: bool,
}

/// Media element driven by an explicit clock instead of a decoder.
///
/// Position only moves when [`advance`](Self::advance) is called while playing.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedMediaElement {
    duration: f64,
    position: f64,
    paused: bool,
}

impl SimulatedMediaElement {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: sanitize_seconds(duration),
            position: 0.0,
            paused: true,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Advance the clock by `seconds` of wall time
    pub fn advance(&mut self, seconds: f64) -> MediaTick {
        if self.paused || !seconds.is_finite() || seconds <= 0.0 {
            return MediaTick::default();
        }

        self.position += seconds;
        if self.position >= self.duration {
            self.position = self.duration;
            self.paused = true;
            return MediaTick {
                time_update: true,
                ended: true,
            };
        }

        MediaTick {
            time_update: true,
            ended: false,
        }
    }
}

impl MediaElementPort for SimulatedMediaElement {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        if seconds.is_nan() {
            return;
        }
        self.position = seconds.clamp(0.0, self.duration);
    }

    fn play(&mut self) {
        // playing from the very end restarts the stream, like a browser video element
        if self.position >= self.duration {
            self.position = 0.0;
        }
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
