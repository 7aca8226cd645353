//! Pointer gestures on the scrub track

use tracing::trace;

use crate::domain::model::{DragSession, TrackGeometry, TrimHandle};
use crate::player::playback::PlaybackController;
use crate::player::time_range::TimeRangeModel;
use crate::ports::MediaElementPort;

/// Turns handle drags and track clicks into trim window and playhead updates.
///
/// Track geometry is passed with every call because the track may reflow
/// between pointer events.
#[derive(Debug, Default)]
pub struct TrimInputController {
    session: DragSession,
}

impl TrimInputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> DragSession {
        self.session
    }

    /// Pointer went down on a handle.
    ///
    /// Returns `false` and keeps the current session if a drag is already active.
    pub fn begin_drag(&mut self, handle: TrimHandle) -> bool {
        if let DragSession::Dragging(active) = self.session {
            trace!(?active, ?handle, "Ignoring drag start while another drag is active");
            return false;
        }
        self.session = DragSession::Dragging(handle);
        true
    }

    /// Pointer moved during a drag; returns the applied endpoint, or `None` when idle.
    ///
    /// The moved endpoint also becomes the playback position so the cut frame is visible.
    pub fn update_drag<M: MediaElementPort>(
        &mut self,
        pointer_x: f64,
        track: TrackGeometry,
        model: &mut TimeRangeModel,
        playback: &mut PlaybackController<M>,
    ) -> Option<f64> {
        let handle = self.session.active_handle()?;
        let target = track.normalize(pointer_x) * model.duration();

        let applied = match handle {
            TrimHandle::Start => model.set_start(target),
            TrimHandle::End => model.set_end(target),
        };
        playback.seek_to(model, applied);
        Some(applied)
    }

    /// Pointer released; no-op without an active drag
    pub fn end_drag(&mut self) {
        self.session = DragSession::Idle;
    }

    /// Click on the track outside the handles; returns the new playback position
    pub fn seek<M: MediaElementPort>(
        &self,
        pointer_x: f64,
        track: TrackGeometry,
        model: &mut TimeRangeModel,
        playback: &mut PlaybackController<M>,
    ) -> f64 {
        let target = track.normalize(pointer_x) * model.duration();
        playback.seek_to(model, target)
    }
}
