//! Playback control constrained to the trim window

use tracing::{debug, trace};

use crate::domain::model::{PlaybackState, TimeRange};
use crate::player::time_range::TimeRangeModel;
use crate::ports::MediaElementPort;

/// Drives a media element so that preview playback never leaves the trim window.
///
/// `Paused -> Playing` only through [`toggle_play`](Self::toggle_play);
/// `Playing -> Paused` on toggle, on reaching the out-point, or when the
/// media reports end of stream.
#[derive(Debug)]
pub struct PlaybackController<M: MediaElementPort> {
    media: M,
    is_playing: bool,
}

impl<M: MediaElementPort> PlaybackController<M> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            is_playing: false,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn state(&self, model: &TimeRangeModel) -> PlaybackState {
        PlaybackState {
            current_time: model.playhead(),
            is_playing: self.is_playing,
        }
    }

    /// A new source finished loading its metadata
    pub fn load_source(&mut self, model: &mut TimeRangeModel, duration: f64) {
        self.media.pause();
        self.is_playing = false;
        model.set_duration(duration);
        model.set_playhead(0.0);
        self.media.set_current_time(0.0);
        debug!(duration = model.duration(), "Loaded source into player");
    }

    /// Toggle between playing and paused; returns the new playing flag.
    ///
    /// Starting playback from outside `[start, end - min_gap)` rewinds to the in-point first.
    pub fn toggle_play(&mut self, model: &mut TimeRangeModel) -> bool {
        if self.is_playing {
            self.media.pause();
            self.is_playing = false;
            return false;
        }

        let current = model.playhead();
        let playable = TimeRange {
            end: model.end() - model.min_gap(),
            ..model.range()
        };
        if !playable.contains(current) {
            trace!(from = current, to = model.start(), "Rewinding to trim in-point");
            self.seek_to(model, model.start());
        }

        self.media.play();
        self.is_playing = true;
        true
    }

    /// Move the media and the cached playhead to `seconds`; returns the applied position
    pub fn seek_to(&mut self, model: &mut TimeRangeModel, seconds: f64) -> f64 {
        let applied = model.set_playhead(seconds);
        self.media.set_current_time(applied);
        applied
    }

    /// The media reported a new playback position
    pub fn on_time_update(&mut self, model: &mut TimeRangeModel) {
        let current = model.set_playhead(self.media.current_time());
        if current >= model.end() {
            if self.is_playing {
                debug!(current, end = model.end(), "Reached trim out-point, pausing");
            }
            self.media.pause();
            self.is_playing = false;
        }
    }

    /// The media started playing on its own
    pub fn on_play(&mut self) {
        self.is_playing = true;
    }

    pub fn on_pause(&mut self) {
        self.is_playing = false;
    }

    /// The media ran out of frames
    pub fn on_ended(&mut self) {
        self.is_playing = false;
    }
}
