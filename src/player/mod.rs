//! Trim-synchronized preview player
//!
//! The trim window, the media element position and the scrub-track visual
//! share a single [`TimeRangeModel`]. Gestures go through
//! [`TrimInputController`], playback through [`PlaybackController`], and
//! [`TrimPlayer`] bundles the three for the presentation layer.

pub mod playback;
pub mod time_range;
pub mod trim_input;

pub use playback::PlaybackController;
pub use time_range::TimeRangeModel;
pub use trim_input::TrimInputController;

use tracing::debug;

use crate::domain::model::{
    DragSession, PlaybackState, TimeRange, TrackGeometry, TrackLayout, TrimHandle,
};
use crate::ports::MediaElementPort;

/// Player session for one media element
#[derive(Debug)]
pub struct TrimPlayer<M: MediaElementPort> {
    model: TimeRangeModel,
    input: TrimInputController,
    playback: PlaybackController<M>,
}

impl<M: MediaElementPort> TrimPlayer<M> {
    pub fn new(media: M) -> Self {
        Self {
            model: TimeRangeModel::new(),
            input: TrimInputController::new(),
            playback: PlaybackController::new(media),
        }
    }

    pub fn model(&self) -> &TimeRangeModel {
        &self.model
    }

    pub fn range(&self) -> TimeRange {
        self.model.range()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state(&self.model)
    }

    pub fn drag_session(&self) -> DragSession {
        self.input.session()
    }

    pub fn media(&self) -> &M {
        self.playback.media()
    }

    pub fn media_mut(&mut self) -> &mut M {
        self.playback.media_mut()
    }

    /// Metadata for a newly selected source is available
    pub fn load_source(&mut self, duration: f64) {
        self.input.end_drag();
        self.playback.load_source(&mut self.model, duration);
    }

    pub fn begin_drag(&mut self, handle: TrimHandle) -> bool {
        self.input.begin_drag(handle)
    }

    pub fn update_drag(&mut self, pointer_x: f64, track: TrackGeometry) -> Option<f64> {
        self.input
            .update_drag(pointer_x, track, &mut self.model, &mut self.playback)
    }

    pub fn end_drag(&mut self) {
        self.input.end_drag();
    }

    pub fn seek(&mut self, pointer_x: f64, track: TrackGeometry) -> f64 {
        self.input
            .seek(pointer_x, track, &mut self.model, &mut self.playback)
    }

    pub fn toggle_play(&mut self) -> bool {
        self.playback.toggle_play(&mut self.model)
    }

    /// Restore the full window and rewind, whatever the drag state
    pub fn reset(&mut self) {
        self.input.end_drag();
        self.model.reset();
        self.playback.seek_to(&mut self.model, 0.0);
        debug!(range = %self.model.range(), "Trim window reset");
    }

    /// Apply a trim window through the same clamped setters used by dragging
    pub fn set_trim(&mut self, start: f64, end: f64) -> TimeRange {
        self.model.reset();
        let start = self.model.set_start(start);
        self.model.set_end(end);
        self.playback.seek_to(&mut self.model, start);
        self.model.range()
    }

    pub fn on_time_update(&mut self) {
        self.playback.on_time_update(&mut self.model);
    }

    pub fn on_play(&mut self) {
        self.playback.on_play();
    }

    pub fn on_pause(&mut self) {
        self.playback.on_pause();
    }

    pub fn on_ended(&mut self) {
        self.playback.on_ended();
    }

    /// Handle and playhead positions as fractions of the track width
    pub fn track_layout(&self) -> TrackLayout {
        let duration = self.model.duration();
        if duration <= 0.0 {
            return TrackLayout::default();
        }
        TrackLayout {
            start_fraction: self.model.start() / duration,
            end_fraction: self.model.end() / duration,
            playhead_fraction: self.model.playhead() / duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SimulatedMediaElement;

    fn player(duration: f64) -> TrimPlayer<SimulatedMediaElement> {
        let mut player = TrimPlayer::new(SimulatedMediaElement::new(duration));
        player.load_source(duration);
        player
    }

    #[test]
    fn test_reset_during_drag() {
        let mut player = player(10.0);
        let track = TrackGeometry::new(0.0, 100.0);
        player.begin_drag(TrimHandle::Start);
        player.update_drag(30.0, track);

        player.reset();
        assert_eq!(player.range(), TimeRange::full(10.0));
        assert_eq!(player.drag_session(), DragSession::Idle);
        assert_eq!(player.playback_state().current_time, 0.0);
    }

    #[test]
    fn test_set_trim_uses_clamped_setters() {
        let mut player = player(10.0);
        let range = player.set_trim(3.0, 1.0);
        assert_eq!(range.start, 3.0);
        assert!((range.end - 3.1).abs() < 1e-9);
        assert_eq!(player.playback_state().current_time, 3.0);

        let range = player.set_trim(-2.0, 40.0);
        assert_eq!(range, TimeRange::full(10.0));
    }

    #[test]
    fn test_track_layout() {
        let mut player = player(8.0);
        player.set_trim(2.0, 6.0);
        let layout = player.track_layout();
        assert_eq!(layout.start_fraction, 0.25);
        assert_eq!(layout.end_fraction, 0.75);
        assert_eq!(layout.playhead_fraction, 0.25);
    }

    #[test]
    fn test_track_layout_without_duration() {
        let player = TrimPlayer::new(SimulatedMediaElement::new(0.0));
        assert_eq!(player.track_layout(), TrackLayout::default());
    }

    #[test]
    fn test_preview_loop_stops_at_out_point() {
        let mut player = player(10.0);
        player.set_trim(1.0, 2.0);
        assert!(player.toggle_play());

        for _ in 0..40 {
            let tick = player.media_mut().advance(0.25);
            if tick.time_update {
                player.on_time_update();
            }
            if !player.playback_state().is_playing {
                break;
            }
        }

        let state = player.playback_state();
        assert!(!state.is_playing);
        assert!(state.current_time >= 2.0);
        assert!(state.current_time < 2.5);

        // playing again restarts from the in-point
        player.toggle_play();
        assert_eq!(player.playback_state().current_time, 1.0);
    }

    #[test]
    fn test_load_source_cancels_drag() {
        let mut player = player(10.0);
        player.begin_drag(TrimHandle::End);
        player.load_source(4.0);
        assert_eq!(player.drag_session(), DragSession::Idle);
        assert_eq!(player.range(), TimeRange::full(4.0));
    }
}
