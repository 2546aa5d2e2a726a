//! Classifier tunables.

use crate::constants::{
    DEFAULT_ACTION_COOLDOWN_MS, DEFAULT_CONFIDENCE_GAIN, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_CONSISTENCY_QUORUM,
    DEFAULT_CONSISTENCY_WINDOW, DEFAULT_DEBOUNCED_MIN_DURATION_MS, DEFAULT_DEBOUNCED_MIN_INTENSITY,
    DEFAULT_DECAY_FACTOR, DEFAULT_DIRECTION_HOLD_CONFIDENCE, DEFAULT_DIRECTION_SWITCH_CONFIDENCE,
    DEFAULT_HISTORY_CAPACITY, DEFAULT_HORIZONTAL_THRESHOLD, DEFAULT_IMMEDIATE_MIN_INTENSITY,
    DEFAULT_SATURATION_THRESHOLD, DEFAULT_SMOOTHING_FLOOR, DEFAULT_STABILITY_VELOCITY_CEILING,
    DEFAULT_STABLE_CONFIDENCE, DEFAULT_STABLE_DURATION_MS, DEFAULT_STRONG_GESTURE_ANGLE,
    DEFAULT_STRONG_GESTURE_BOOST, DEFAULT_VERTICAL_THRESHOLD,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tunables of the gesture classifier. Angles in degrees, times in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Yaw a turn must exceed to count as left/right
    pub horizontal_threshold: f64,

    /// Pitch a tilt must exceed to count as up/down
    pub vertical_threshold: f64,

    /// Rotation at which confidence and intensity saturate
    pub saturation_threshold: f64,

    /// Rotation past which the strong-gesture boost applies
    pub strong_gesture_angle: f64,

    /// Multiplier on the normalised rotation past activation
    pub confidence_gain: f64,

    /// Added to confidence past `strong_gesture_angle`
    pub strong_gesture_boost: f64,

    /// Minimum confidence for a state to resolve into an action
    pub confidence_threshold: f64,

    /// Minimum time between debounced actions
    pub action_cooldown_ms: f64,

    /// Maximum velocity (deg/s) of a stable gesture
    pub stability_velocity_ceiling: f64,

    /// Confidence a stable gesture must exceed
    pub stable_confidence: f64,

    /// Time a stable gesture must have been held
    pub stable_duration_ms: f64,

    /// Factor applied to the previous confidence when the fresh reading drops out
    pub decay_factor: f64,

    /// Fresh confidence above which the direction may switch
    pub direction_switch_confidence: f64,

    /// Previous confidence below which the direction may switch
    pub direction_hold_confidence: f64,

    /// Smallest blend weight given to a fresh confidence reading
    pub smoothing_floor: f64,

    /// Intensity floor of the immediate policy
    pub immediate_min_intensity: f64,

    /// Intensity floor of the debounced policy
    pub debounced_min_intensity: f64,

    /// Duration floor of the debounced policy
    pub debounced_min_duration_ms: f64,

    /// Number of confident history entries inspected for agreement
    pub consistency_window: usize,

    /// How many of those must agree on one direction
    pub consistency_quorum: usize,

    /// Number of past states kept
    pub history_capacity: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            horizontal_threshold: DEFAULT_HORIZONTAL_THRESHOLD,
            vertical_threshold: DEFAULT_VERTICAL_THRESHOLD,
            saturation_threshold: DEFAULT_SATURATION_THRESHOLD,
            strong_gesture_angle: DEFAULT_STRONG_GESTURE_ANGLE,
            confidence_gain: DEFAULT_CONFIDENCE_GAIN,
            strong_gesture_boost: DEFAULT_STRONG_GESTURE_BOOST,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            action_cooldown_ms: DEFAULT_ACTION_COOLDOWN_MS,
            stability_velocity_ceiling: DEFAULT_STABILITY_VELOCITY_CEILING,
            stable_confidence: DEFAULT_STABLE_CONFIDENCE,
            stable_duration_ms: DEFAULT_STABLE_DURATION_MS,
            decay_factor: DEFAULT_DECAY_FACTOR,
            direction_switch_confidence: DEFAULT_DIRECTION_SWITCH_CONFIDENCE,
            direction_hold_confidence: DEFAULT_DIRECTION_HOLD_CONFIDENCE,
            smoothing_floor: DEFAULT_SMOOTHING_FLOOR,
            immediate_min_intensity: DEFAULT_IMMEDIATE_MIN_INTENSITY,
            debounced_min_intensity: DEFAULT_DEBOUNCED_MIN_INTENSITY,
            debounced_min_duration_ms: DEFAULT_DEBOUNCED_MIN_DURATION_MS,
            consistency_window: DEFAULT_CONSISTENCY_WINDOW,
            consistency_quorum: DEFAULT_CONSISTENCY_QUORUM,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl ClassifierConfig {
    /// Validate the tunables
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` naming the first inconsistent tunable
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("horizontal_threshold", self.horizontal_threshold),
            ("vertical_threshold", self.vertical_threshold),
            ("saturation_threshold", self.saturation_threshold),
            ("strong_gesture_angle", self.strong_gesture_angle),
            ("confidence_gain", self.confidence_gain),
            ("strong_gesture_boost", self.strong_gesture_boost),
            ("action_cooldown_ms", self.action_cooldown_ms),
            ("stability_velocity_ceiling", self.stability_velocity_ceiling),
            ("stable_duration_ms", self.stable_duration_ms),
            ("debounced_min_duration_ms", self.debounced_min_duration_ms),
        ];
        for (name, value) in finite {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }

        if self.horizontal_threshold >= self.saturation_threshold
            || self.vertical_threshold >= self.saturation_threshold
        {
            return Err(Error::ConfigError(
                "Activation thresholds must be below the saturation threshold".to_string(),
            ));
        }
        if self.confidence_gain <= 0.0 {
            return Err(Error::ConfigError("Confidence gain must be positive".to_string()));
        }

        let unit = [
            ("confidence_threshold", self.confidence_threshold),
            ("stable_confidence", self.stable_confidence),
            ("direction_switch_confidence", self.direction_switch_confidence),
            ("direction_hold_confidence", self.direction_hold_confidence),
            ("smoothing_floor", self.smoothing_floor),
            ("immediate_min_intensity", self.immediate_min_intensity),
            ("debounced_min_intensity", self.debounced_min_intensity),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::ConfigError(format!(
                    "{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }

        if !(self.decay_factor > 0.0 && self.decay_factor <= 1.0) {
            return Err(Error::ConfigError(format!(
                "decay_factor must be in (0, 1], got {}",
                self.decay_factor
            )));
        }

        if self.history_capacity == 0 {
            return Err(Error::ConfigError(
                "History capacity must be greater than 0".to_string(),
            ));
        }
        if self.consistency_quorum == 0 || self.consistency_quorum > self.consistency_window {
            return Err(Error::ConfigError(format!(
                "Consistency quorum must be between 1 and the window ({}), got {}",
                self.consistency_window, self.consistency_quorum
            )));
        }
        if self.consistency_window > self.history_capacity {
            return Err(Error::ConfigError(format!(
                "Consistency window ({}) cannot exceed history capacity ({})",
                self.consistency_window, self.history_capacity
            )));
        }

        Ok(())
    }
}
