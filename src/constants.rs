//! Constants used throughout the library

/// Yaw magnitude (degrees) a head turn must exceed to count as left/right
pub const DEFAULT_HORIZONTAL_THRESHOLD: f64 = 8.0;

/// Pitch magnitude (degrees) a head tilt must exceed to count as up/down
pub const DEFAULT_VERTICAL_THRESHOLD: f64 = 10.0;

/// Rotation (degrees) at which intensity saturates
pub const DEFAULT_SATURATION_THRESHOLD: f64 = 25.0;

/// Rotation (degrees) past which a gesture counts as strong
pub const DEFAULT_STRONG_GESTURE_ANGLE: f64 = 20.0;

/// Confidence scaling
pub const DEFAULT_CONFIDENCE_GAIN: f64 = 1.2;
pub const DEFAULT_STRONG_GESTURE_BOOST: f64 = 0.1;

/// Minimum confidence for a state to resolve into an action
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Minimum time between two debounced actions (milliseconds)
pub const DEFAULT_ACTION_COOLDOWN_MS: f64 = 1000.0;

/// Stability criteria
pub const DEFAULT_STABILITY_VELOCITY_CEILING: f64 = 100.0;
pub const DEFAULT_STABLE_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_STABLE_DURATION_MS: f64 = 200.0;

/// Anti-jitter tuning
pub const DEFAULT_DECAY_FACTOR: f64 = 0.7;
pub const DEFAULT_DIRECTION_SWITCH_CONFIDENCE: f64 = 0.7;
pub const DEFAULT_DIRECTION_HOLD_CONFIDENCE: f64 = 0.3;
pub const DEFAULT_SMOOTHING_FLOOR: f64 = 0.4;

/// Action policy intensity and duration floors
pub const DEFAULT_IMMEDIATE_MIN_INTENSITY: f64 = 0.3;
pub const DEFAULT_DEBOUNCED_MIN_INTENSITY: f64 = 0.4;
pub const DEFAULT_DEBOUNCED_MIN_DURATION_MS: f64 = 150.0;

/// Directional consistency over history
pub const DEFAULT_CONSISTENCY_WINDOW: usize = 3;
pub const DEFAULT_CONSISTENCY_QUORUM: usize = 2;
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Pose angles are clamped into this range (degrees)
pub const MAX_ABS_ANGLE: f64 = 180.0;

/// Milliseconds per second
pub const MS_PER_SECOND: f64 = 1000.0;

/// Calibration defaults
pub const DEFAULT_CALIBRATION_SAMPLES: usize = 30;
pub const DEFAULT_CALIBRATION_MAX_STD_DEV: f64 = 2.0;

/// Default window sizes for filters
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;
pub const DEFAULT_MEDIAN_WINDOW: usize = 5;
pub const DEFAULT_HAMPEL_WINDOW: usize = 5;

/// Default filter parameters
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;
pub const DEFAULT_HAMPEL_THRESHOLD: f64 = 3.0;

/// Scale factor turning a median absolute deviation into a standard deviation estimate
pub const MAD_TO_SIGMA: f64 = 1.4826;
