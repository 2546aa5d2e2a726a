//! Trace replay application.
//!
//! Feeds a recorded pose trace through a [`GestureTracker`] frame by frame,
//! the same way a live camera pipeline would, and collects what fired.

use crate::{
    error::Result,
    gesture::{Direction, GestureAction},
    trace::{load_trace, TraceFrame},
    tracker::GestureTracker,
};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Replay application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Pose trace to replay
    pub trace_path: PathBuf,
    /// Call `reset()` on the tracker after every fired action, as a quiz
    /// does when it moves on to the next question
    pub reset_after_action: bool,
}

/// An action fired during replay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredAction {
    /// Timestamp of the frame that fired
    pub timestamp: f64,
    /// The action
    pub action: GestureAction,
}

/// Outcome of a replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    /// Frames processed
    pub frames: usize,
    /// Frames without a face
    pub faces_lost: usize,
    /// Frames whose state was stable
    pub stable_frames: usize,
    /// Frames rejected by calibration
    pub calibration_failures: usize,
    /// Direction transitions reported
    pub transitions: usize,
    /// Actions in firing order
    pub actions: Vec<FiredAction>,
}

/// Replays pose traces through a tracker
#[derive(Debug)]
pub struct ReplayApp {
    config: AppConfig,
    tracker: GestureTracker,
}

impl ReplayApp {
    /// Create a replay application
    #[must_use]
    pub fn new(config: AppConfig, tracker: GestureTracker) -> Self {
        Self { config, tracker }
    }

    /// The tracker driving the replay
    #[must_use]
    pub const fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    /// Load the configured trace and replay it
    ///
    /// # Errors
    ///
    /// Returns an error if the trace cannot be read or parsed
    pub fn run(&mut self) -> Result<ReplaySummary> {
        info!("Replaying pose trace {}", self.config.trace_path.display());
        let frames = load_trace(&self.config.trace_path)?;
        info!("Loaded {} frames", frames.len());
        Ok(self.replay(&frames))
    }

    /// Replay already loaded frames
    pub fn replay(&mut self, frames: &[TraceFrame]) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        let mut last_direction = Direction::Center;

        for frame in frames {
            summary.frames += 1;
            let sample = frame.sample();
            if sample.is_none() {
                summary.faces_lost += 1;
            }

            let outcome = match self.tracker.process_frame(sample) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Frame at {:.0}ms skipped: {}", frame.timestamp, e);
                    summary.calibration_failures += 1;
                    continue;
                }
            };

            if outcome.state.is_stable {
                summary.stable_frames += 1;
            }
            if outcome.state.direction != last_direction {
                summary.transitions += 1;
                last_direction = outcome.state.direction;
            }

            if outcome.action.is_selection() {
                summary.actions.push(FiredAction {
                    timestamp: outcome.state.timestamp,
                    action: outcome.action,
                });
                if self.config.reset_after_action {
                    debug!("Resetting tracker for the next question");
                    self.tracker.reset();
                    last_direction = Direction::Center;
                }
            }
        }

        info!(
            "Replay finished: {} frames, {} actions, {} without face",
            summary.frames,
            summary.actions.len(),
            summary.faces_lost
        );
        summary
    }
}
