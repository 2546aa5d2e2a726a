//! Frame-by-frame head gesture classification with debounced action resolution.
//!
//! Every observed frame goes through the same steps: axis selection,
//! confidence and intensity scaling, direction hysteresis with confidence
//! decay, adaptive confidence smoothing, then velocity, duration and
//! stability bookkeeping. The resulting state is pushed into a bounded
//! history that the debounced action policy consults for directional
//! consistency.

use super::config::ClassifierConfig;
use super::history::GestureHistory;
use super::listeners::{Listeners, SubscriptionId, SubscriptionIds};
use super::{ActionPolicy, Direction, GestureAction, GestureState, PoseSample, Rotation};
use crate::constants::MS_PER_SECOND;
use crate::utils::{clamp01, elapsed_ms};
use crate::Result;
use log::{debug, info, trace, warn};

/// Unsmoothed reading of a single pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    /// Candidate direction from axis selection
    pub direction: Direction,
    /// Confidence before smoothing, 0..1
    pub confidence: f64,
    /// Rotation along the candidate axis relative to saturation, 0..1
    pub intensity: f64,
}

impl RawReading {
    const CENTER: Self = Self {
        direction: Direction::Center,
        confidence: 0.0,
        intensity: 0.0,
    };
}

/// An action fired by [`GestureClassifier::resolve_action`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionEvent {
    /// The selection that fired
    pub action: GestureAction,
    /// Timestamp of the state that fired it
    pub timestamp: f64,
    /// Confidence of that state
    pub confidence: f64,
}

/// Turns a stream of head pose samples into gesture states and actions.
///
/// The classifier is single-threaded: calls to [`observe_pose`](Self::observe_pose)
/// must be serialized by the caller, typically one per camera frame. All
/// timing is derived from the timestamps carried by the samples.
///
/// Tunable changes are staged and only take effect when the next frame is
/// observed, so states produced earlier always resolve under the tunables
/// they were classified with.
#[derive(Debug)]
pub struct GestureClassifier {
    config: ClassifierConfig,
    pending_config: Option<ClassifierConfig>,
    history: GestureHistory,
    last_state: GestureState,
    last_rotation: Option<Rotation>,
    last_timestamp: Option<f64>,
    last_action_at: Option<f64>,
    subscription_ids: SubscriptionIds,
    state_listeners: Listeners<GestureState>,
    action_listeners: Listeners<ActionEvent>,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::from_valid_config(ClassifierConfig::default())
    }
}

impl GestureClassifier {
    /// Create a classifier with the given tunables
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration is inconsistent
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: ClassifierConfig) -> Self {
        Self {
            history: GestureHistory::new(config.history_capacity),
            config,
            pending_config: None,
            last_state: GestureState::default(),
            last_rotation: None,
            last_timestamp: None,
            last_action_at: None,
            subscription_ids: SubscriptionIds::default(),
            state_listeners: Listeners::new(),
            action_listeners: Listeners::new(),
        }
    }

    /// Latest tunables, including changes not yet applied to a frame
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        self.pending_config.as_ref().unwrap_or(&self.config)
    }

    /// Tunables the most recent state was classified and resolved with
    #[must_use]
    pub const fn active_config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn staged_config(&mut self) -> &mut ClassifierConfig {
        self.pending_config.get_or_insert_with(|| self.config.clone())
    }

    fn apply_pending_config(&mut self) {
        if let Some(config) = self.pending_config.take() {
            self.history.set_capacity(config.history_capacity);
            self.config = config;
            debug!("Applied updated classifier tunables");
        }
    }

    /// Replace all tunables from the next observed frame on; history is kept
    /// as classified, only truncated if the capacity shrinks.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` and keeps the old tunables if the new
    /// configuration is inconsistent
    pub fn update_config(&mut self, config: ClassifierConfig) -> Result<()> {
        config.validate()?;
        self.pending_config = Some(config);
        Ok(())
    }

    /// Set the minimum confidence for an action, clamped into `[0, 1]`.
    /// Applies from the next observed frame on.
    pub fn set_confidence_threshold(&mut self, threshold: f64) {
        let config = self.staged_config();
        config.confidence_threshold = clamp01(threshold);
        debug!("Confidence threshold set to {:.2}", config.confidence_threshold);
    }

    /// Set the minimum time between debounced actions; negative or
    /// non-finite values disable the cooldown. Applies from the next
    /// observed frame on.
    pub fn set_action_cooldown(&mut self, cooldown_ms: f64) {
        let config = self.staged_config();
        config.action_cooldown_ms = if cooldown_ms.is_finite() { cooldown_ms.max(0.0) } else { 0.0 };
        debug!("Action cooldown set to {:.0}ms", config.action_cooldown_ms);
    }

    /// Most recently produced state
    #[must_use]
    pub const fn last_state(&self) -> &GestureState {
        &self.last_state
    }

    /// Number of states currently kept in history
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Timestamp of the last debounced action, if any since the last reset
    #[must_use]
    pub const fn last_action_at(&self) -> Option<f64> {
        self.last_action_at
    }

    /// Whether a debounced action at `now` would still be blocked by the cooldown
    #[must_use]
    pub fn is_cooling_down(&self, now: f64) -> bool {
        self.last_action_at
            .is_some_and(|last| elapsed_ms(Some(last), now) < self.config.action_cooldown_ms)
    }

    /// Register a listener for every smoothed state
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&GestureState) + Send + 'static,
    {
        let id = self.subscription_ids.allocate();
        self.state_listeners.subscribe(id, listener)
    }

    /// Register a listener for every action that fires
    pub fn subscribe_actions<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ActionEvent) + Send + 'static,
    {
        let id = self.subscription_ids.allocate();
        self.action_listeners.subscribe(id, listener)
    }

    /// Remove a state or action listener. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state_listeners.unsubscribe(id) || self.action_listeners.unsubscribe(id)
    }

    /// Clear history, cooldown and the last observed pose. Tunables and
    /// listeners are kept.
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_state = GestureState::default();
        self.last_rotation = None;
        self.last_timestamp = None;
        self.last_action_at = None;
        info!("Gesture classifier reset");
    }

    /// Candidate direction, confidence and intensity of a single pose,
    /// ignoring all history.
    #[must_use]
    pub fn classify_raw(&self, rotation: &Rotation) -> RawReading {
        let cfg = &self.config;
        let abs_yaw = rotation.yaw.abs();
        let abs_pitch = rotation.pitch.abs();

        let (direction, magnitude, activation) = if abs_yaw > abs_pitch && abs_yaw > cfg.horizontal_threshold {
            let direction = if rotation.yaw > 0.0 { Direction::Right } else { Direction::Left };
            (direction, abs_yaw, cfg.horizontal_threshold)
        } else if abs_pitch > abs_yaw && abs_pitch > cfg.vertical_threshold {
            let direction = if rotation.pitch > 0.0 { Direction::Down } else { Direction::Up };
            (direction, abs_pitch, cfg.vertical_threshold)
        } else {
            return RawReading::CENTER;
        };

        let span = cfg.saturation_threshold - activation;
        let mut confidence = clamp01((magnitude - activation) / span) * cfg.confidence_gain;
        if magnitude > cfg.strong_gesture_angle {
            confidence += cfg.strong_gesture_boost;
        }

        RawReading {
            direction,
            confidence: clamp01(confidence),
            intensity: clamp01(magnitude / cfg.saturation_threshold),
        }
    }

    /// Observe one frame: a pose sample, or `None` when no face was detected.
    ///
    /// The returned state is also pushed into history and sent to every
    /// state listener.
    pub fn observe_pose(&mut self, sample: Option<PoseSample>) -> GestureState {
        self.apply_pending_config();
        let state = match sample {
            Some(sample) => self.observe_face(&sample),
            None => self.observe_face_lost(),
        };

        if state.direction != self.last_state.direction {
            debug!(
                "Gesture {} -> {} (confidence {:.2}) at {:.0}ms",
                self.last_state.direction, state.direction, state.confidence, state.timestamp
            );
        }
        trace!("{state:?}");

        self.history.push(state);
        self.last_state = state;
        self.state_listeners.notify(&state);
        state
    }

    fn observe_face_lost(&mut self) -> GestureState {
        let prev = self.last_state;
        let timestamp = self.last_timestamp.unwrap_or(prev.timestamp);
        // A re-acquired face must not produce a velocity spike against the old pose
        self.last_rotation = None;

        GestureState {
            duration: if prev.direction == Direction::Center { prev.duration } else { 0.0 },
            previous_direction: prev.direction,
            ..GestureState::neutral(timestamp)
        }
    }

    fn observe_face(&mut self, sample: &PoseSample) -> GestureState {
        if !sample.is_finite() {
            warn!("Non-finite pose angles at {}ms treated as zero", sample.timestamp);
        }
        let rotation = sample.sanitized().rotation();

        let elapsed = elapsed_ms(self.last_timestamp, sample.timestamp);
        let timestamp = match self.last_timestamp {
            Some(last) => last + elapsed,
            None if sample.timestamp.is_finite() => sample.timestamp,
            None => 0.0,
        };

        let velocity = match self.last_rotation {
            Some(last) if elapsed > 0.0 => {
                let delta = (rotation.yaw - last.yaw).hypot(rotation.pitch - last.pitch);
                delta / (elapsed / MS_PER_SECOND)
            }
            _ => 0.0,
        };

        let prev = self.last_state;
        let raw = self.classify_raw(&rotation);
        let (direction, confidence) = self.smooth(&prev, &raw);
        let intensity = clamp01(direction.extent(&rotation) / self.config.saturation_threshold);
        let duration = if direction == prev.direction { prev.duration + elapsed } else { 0.0 };

        let cfg = &self.config;
        let is_stable = confidence > cfg.stable_confidence
            && duration >= cfg.stable_duration_ms
            && velocity < cfg.stability_velocity_ceiling;

        self.last_rotation = Some(rotation);
        self.last_timestamp = Some(timestamp);

        GestureState {
            direction,
            confidence,
            intensity,
            duration,
            velocity,
            is_stable,
            previous_direction: prev.direction,
            timestamp,
            rotation,
        }
    }

    /// Reconcile a raw reading with the previous state.
    ///
    /// Same direction: blend confidences, with larger jumps weighted more
    /// toward the fresh reading, and decay instead of snapping to zero when
    /// the fresh reading drops out. Different direction: switch only when the
    /// fresh reading is strong or the previous one was already weak,
    /// otherwise hold the previous direction with decayed confidence.
    fn smooth(&self, prev: &GestureState, raw: &RawReading) -> (Direction, f64) {
        let cfg = &self.config;

        if raw.direction == prev.direction {
            if !raw.direction.is_active() {
                return (Direction::Center, 0.0);
            }
            if raw.confidence == 0.0 && prev.confidence > 0.0 {
                return (prev.direction, prev.confidence * cfg.decay_factor);
            }
            let jump = raw.confidence - prev.confidence;
            let weight = (cfg.smoothing_floor + jump.abs()).min(1.0);
            return (raw.direction, clamp01(weight.mul_add(jump, prev.confidence)));
        }

        if raw.confidence > cfg.direction_switch_confidence || prev.confidence < cfg.direction_hold_confidence {
            return (raw.direction, raw.confidence);
        }

        (prev.direction, prev.confidence * cfg.decay_factor)
    }

    /// Action of `state` under the immediate policy. Pure, no cooldown.
    #[must_use]
    pub fn immediate_action(&self, state: &GestureState) -> GestureAction {
        let cfg = &self.config;
        if state.direction.is_active()
            && state.confidence >= cfg.confidence_threshold
            && state.is_stable
            && state.intensity >= cfg.immediate_min_intensity
        {
            GestureAction::select(state.direction)
        } else {
            GestureAction::NoAction
        }
    }

    fn debounced_action(&self, state: &GestureState) -> GestureAction {
        let cfg = &self.config;
        let action = self.immediate_action(state);
        if !action.is_selection() || self.is_cooling_down(state.timestamp) {
            return GestureAction::NoAction;
        }

        if state.intensity < cfg.debounced_min_intensity
            || state.duration < cfg.debounced_min_duration_ms
            || state.velocity > cfg.stability_velocity_ceiling
        {
            return GestureAction::NoAction;
        }

        let agreed = self.history.consistent_direction(
            cfg.confidence_threshold,
            cfg.consistency_window,
            cfg.consistency_quorum,
        );
        if agreed == Some(state.direction) {
            action
        } else {
            GestureAction::NoAction
        }
    }

    /// Resolve `state` into an action under `policy`.
    ///
    /// A debounced selection restarts the cooldown. Every selection is sent
    /// to the action listeners.
    pub fn resolve_action(&mut self, state: &GestureState, policy: ActionPolicy) -> GestureAction {
        let action = match policy {
            ActionPolicy::Immediate => self.immediate_action(state),
            ActionPolicy::Debounced => self.debounced_action(state),
        };

        if action.is_selection() {
            if policy == ActionPolicy::Debounced {
                self.last_action_at = Some(state.timestamp);
            }
            info!(
                "Action {} at {:.0}ms (confidence {:.2}, held {:.0}ms)",
                action, state.timestamp, state.confidence, state.duration
            );
            self.action_listeners.notify(&ActionEvent {
                action,
                timestamp: state.timestamp,
                confidence: state.confidence,
            });
        }
        action
    }

    /// Observe a frame and resolve it in one step
    pub fn process(&mut self, sample: Option<PoseSample>, policy: ActionPolicy) -> (GestureState, GestureAction) {
        let state = self.observe_pose(sample);
        let action = self.resolve_action(&state, policy);
        (state, action)
    }
}
