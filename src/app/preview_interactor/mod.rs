// Preview interactor - Plays the trim window on a virtual clock

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::SimulatedMediaElement;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::player::TrimPlayer;
use crate::ports::*;
use crate::utils::time::format_seconds;

/// Request to preview a trim window
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub input: PathBuf,
    pub start: Option<f64>,
    pub end: Option<f64>,
    /// Clock step between time updates
    pub tick: Duration,
}

/// How the preview loop ended
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewReport {
    pub range: TimeRange,
    pub time_updates: usize,
    pub final_time: f64,
}

/// Interactor for the preview use case
pub struct PreviewInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl PreviewInteractor {
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    pub async fn execute(&self, request: PreviewRequest) -> Result<PreviewReport, DomainError> {
        if request.tick.is_zero() {
            return Err(DomainError::BadArgs(
                "Preview tick must be greater than zero".to_string(),
            ));
        }

        let duration = self.probe_port.probe_duration(&request.input).await?;
        let mut player = TrimPlayer::new(SimulatedMediaElement::new(duration));
        player.load_source(duration);
        if request.start.is_some() || request.end.is_some() {
            let full_end = player.range().end;
            player.set_trim(request.start.unwrap_or(0.0), request.end.unwrap_or(full_end));
        }

        run_preview(&mut player, request.tick).await
    }
}

/// Play from the trim-in point until the player pauses itself
pub async fn run_preview(
    player: &mut TrimPlayer<SimulatedMediaElement>,
    tick: Duration,
) -> Result<PreviewReport, DomainError> {
    let range = player.range();
    if range.span() <= 0.0 {
        return Err(DomainError::BadArgs(format!(
            "Nothing to preview in {}",
            range
        )));
    }

    info!(
        "Previewing {} - {}",
        format_seconds(range.start),
        format_seconds(range.end)
    );
    player.toggle_play();

    let mut interval = tokio::time::interval(tick);
    let mut time_updates = 0;
    while player.playback_state().is_playing {
        interval.tick().await;
        let media_tick = player.media_mut().advance(tick.as_secs_f64());
        if media_tick.time_update {
            player.on_time_update();
            time_updates += 1;
            debug!("Playhead {}", format_seconds(player.playback_state().current_time));
        }
        if media_tick.ended {
            player.on_ended();
        }
    }

    let final_time = player.playback_state().current_time;
    info!("Preview paused at {}", format_seconds(final_time));
    Ok(PreviewReport {
        range,
        time_updates,
        final_time,
    })
}
