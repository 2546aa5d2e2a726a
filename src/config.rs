//! Configuration management for head gesture tracking

use crate::calibration::{Calibrator, NeutralPose};
use crate::constants::{DEFAULT_CALIBRATION_MAX_STD_DEV, DEFAULT_CALIBRATION_SAMPLES};
use crate::filters::{create_filter, AngleFilter};
use crate::gesture::{ActionPolicy, ClassifierConfig, GestureClassifier};
use crate::tracker::GestureTracker;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gesture classifier tunables
    pub classifier: ClassifierConfig,

    /// Angle pre-filter configuration
    pub filter: FilterConfig,

    /// Neutral pose calibration
    pub calibration: CalibrationConfig,

    /// Action resolution
    pub action: ActionConfig,
}

/// Filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter description, `name[:param[:param]]`
    pub kind: String,
}

/// Calibration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Calibrate from the first frames of a session
    pub on_start: bool,

    /// Frames collected per calibration
    pub samples: usize,

    /// Largest per-axis standard deviation (degrees) accepted as holding still
    pub max_std_dev: f64,

    /// Neutral pose used until a calibration completes
    pub neutral: NeutralPose,
}

/// Action resolution configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// `debounced` or `immediate`
    pub policy: ActionPolicy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { kind: "none".to_string() }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            on_start: false,
            samples: DEFAULT_CALIBRATION_SAMPLES,
            max_std_dev: DEFAULT_CALIBRATION_MAX_STD_DEV,
            neutral: NeutralPose::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and
    /// `Error::ConfigError` if it is not valid configuration YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the text is not valid configuration YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create the angle filter from configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::FilterError` for an unknown or invalid filter
    pub fn create_filter(&self) -> Result<Box<dyn AngleFilter>> {
        create_filter(&self.filter.kind)
    }

    /// Create a calibrator from configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` for invalid calibration parameters
    pub fn create_calibrator(&self) -> Result<Calibrator> {
        self.validate_calibration()?;
        Ok(Calibrator::new(self.calibration.samples, self.calibration.max_std_dev))
    }

    /// Build a complete tracking pipeline from configuration
    ///
    /// # Errors
    ///
    /// Returns the first validation error of any section
    pub fn build_tracker(&self) -> Result<GestureTracker> {
        self.validate()?;
        let classifier = GestureClassifier::new(self.classifier.clone())?;
        let mut tracker = GestureTracker::new(classifier, self.action.policy)
            .with_filter(self.create_filter()?)
            .with_neutral_pose(self.calibration.neutral);
        if self.calibration.on_start {
            tracker.start_calibration(self.create_calibrator()?);
        }
        Ok(tracker)
    }

    fn validate_calibration(&self) -> Result<()> {
        if self.calibration.samples == 0 {
            return Err(Error::ConfigError(
                "Calibration sample count must be greater than 0".to_string(),
            ));
        }
        if !(self.calibration.max_std_dev >= 0.0) {
            return Err(Error::ConfigError(
                "Calibration max_std_dev must be non-negative".to_string(),
            ));
        }
        let neutral = self.calibration.neutral;
        if ![neutral.yaw, neutral.pitch, neutral.roll].iter().all(|v| v.is_finite()) {
            return Err(Error::ConfigError("Neutral pose must be finite".to_string()));
        }
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` or `Error::FilterError` describing the
    /// first invalid setting
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;
        self.create_filter()?;
        self.validate_calibration()
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Gesture Configuration

# Gesture classifier (angles in degrees, times in milliseconds)
classifier:
  horizontal_threshold: 8.0
  vertical_threshold: 10.0
  saturation_threshold: 25.0
  strong_gesture_angle: 20.0
  confidence_gain: 1.2
  strong_gesture_boost: 0.1
  confidence_threshold: 0.6
  action_cooldown_ms: 1000.0
  stability_velocity_ceiling: 100.0
  stable_confidence: 0.5
  stable_duration_ms: 200.0
  decay_factor: 0.7
  direction_switch_confidence: 0.7
  direction_hold_confidence: 0.3
  smoothing_floor: 0.4
  immediate_min_intensity: 0.3
  debounced_min_intensity: 0.4
  debounced_min_duration_ms: 150.0
  consistency_window: 3
  consistency_quorum: 2
  history_capacity: 5

# Angle pre-filter: none, exponential[:alpha], moving_average[:window],
# median[:window], hampel[:window[:threshold]]
filter:
  kind: "none"

# Neutral pose calibration
calibration:
  on_start: false
  samples: 30
  max_std_dev: 2.0
  neutral:
    yaw: 0.0
    pitch: 0.0
    roll: 0.0

# Action resolution: debounced or immediate
action:
  policy: "debounced"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = Config::from_yaml("classifier:\n  confidence_threshold: 0.8\naction:\n  policy: immediate\n").unwrap();
        assert_eq!(parsed.classifier.confidence_threshold, 0.8);
        assert_eq!(parsed.classifier.horizontal_threshold, 8.0);
        assert_eq!(parsed.action.policy, ActionPolicy::Immediate);
        assert_eq!(parsed.filter.kind, "none");
    }

    #[test]
    fn test_validate_rejects_bad_filter() {
        let mut config = Config::default();
        config.filter.kind = "median:4".to_string();
        assert!(config.validate().is_err());
        assert!(config.build_tracker().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_calibration() {
        let mut config = Config::default();
        config.calibration.samples = 0;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_build_tracker() {
        let mut config = Config::default();
        config.filter.kind = "exponential:0.5".to_string();
        config.calibration.on_start = true;
        let tracker = config.build_tracker().unwrap();
        assert_eq!(tracker.filter_name(), "ExponentialFilter");
        assert!(tracker.is_calibrating());
        assert_eq!(tracker.policy(), ActionPolicy::Debounced);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(Config::from_yaml("action:\n  policy: sometimes\n").is_err());
    }
}
