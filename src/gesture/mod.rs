//! Head-gesture recognition: pose samples in, debounced directional actions out.
//!
//! A [`classifier::GestureClassifier`] consumes one [`PoseSample`] per video
//! frame (or `None` when no face was detected) and produces a smoothed
//! [`GestureState`]. States that are confident, held and steady resolve into a
//! [`GestureAction`] under an [`ActionPolicy`].

/// Classifier tunables and their validation
pub mod config;

/// Bounded history of recent gesture states
pub mod history;

/// Subscription registry for state and action listeners
pub mod listeners;

/// The gesture classifier itself
pub mod classifier;

pub use classifier::GestureClassifier;
pub use config::ClassifierConfig;
pub use listeners::SubscriptionId;

use crate::utils::sanitize_angle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One head pose observation, angles in degrees relative to a camera-facing
/// neutral pose, timestamp in monotonic milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseSample {
    /// Rotation around the vertical axis, positive turns right
    pub yaw: f64,
    /// Rotation around the lateral axis, positive tilts down
    pub pitch: f64,
    /// Rotation around the viewing axis
    pub roll: f64,
    /// Caller-supplied timestamp in milliseconds
    pub timestamp: f64,
}

impl PoseSample {
    /// Create a new pose sample
    #[must_use]
    pub const fn new(yaw: f64, pitch: f64, roll: f64, timestamp: f64) -> Self {
        Self {
            yaw,
            pitch,
            roll,
            timestamp,
        }
    }

    /// Whether every angle is a finite number
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite() && self.roll.is_finite()
    }

    /// Copy with non-finite angles replaced by 0 and the rest clamped to ±180°.
    /// The timestamp is left as is.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            yaw: sanitize_angle(self.yaw),
            pitch: sanitize_angle(self.pitch),
            roll: sanitize_angle(self.roll),
            timestamp: self.timestamp,
        }
    }

    /// Rotation part of the sample
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        Rotation {
            yaw: self.yaw,
            pitch: self.pitch,
            roll: self.roll,
        }
    }
}

/// Head rotation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation around the vertical axis, positive turns right
    pub yaw: f64,
    /// Rotation around the lateral axis, positive tilts down
    pub pitch: f64,
    /// Rotation around the viewing axis
    pub roll: f64,
}

/// Direction of a head gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    #[default]
    Center,
}

impl Direction {
    /// All directions that can be selected
    pub const ACTIVE: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Whether this is a selectable (non-center) direction
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Center)
    }

    /// Signed rotation of `rotation` toward this direction, 0 for center
    #[must_use]
    pub fn extent(self, rotation: &Rotation) -> f64 {
        match self {
            Self::Right => rotation.yaw,
            Self::Left => -rotation.yaw,
            Self::Down => rotation.pitch,
            Self::Up => -rotation.pitch,
            Self::Center => 0.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Center => "center",
        };
        f.write_str(name)
    }
}

/// Smoothed gesture state produced for every observed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    /// Reported gesture direction
    pub direction: Direction,
    /// How far the rotation is past the activation threshold, 0..1
    pub confidence: f64,
    /// Raw rotation toward `direction` relative to saturation, 0..1
    pub intensity: f64,
    /// Milliseconds `direction` has been continuously reported
    pub duration: f64,
    /// Degrees per second of pose change since the previous sample
    pub velocity: f64,
    /// Confident, held long enough and not moving fast
    pub is_stable: bool,
    /// Direction reported by the previous state
    pub previous_direction: Direction,
    /// Timestamp of the frame this state was computed from
    pub timestamp: f64,
    /// Rotation observed on that frame, zero when no face was present
    pub rotation: Rotation,
}

impl GestureState {
    /// Neutral state: center, nothing active
    #[must_use]
    pub fn neutral(timestamp: f64) -> Self {
        Self {
            direction: Direction::Center,
            confidence: 0.0,
            intensity: 0.0,
            duration: 0.0,
            velocity: 0.0,
            is_stable: false,
            previous_direction: Direction::Center,
            timestamp,
            rotation: Rotation::default(),
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::neutral(0.0)
    }
}

/// Discrete action a gesture resolves into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureAction {
    SelectLeft,
    SelectRight,
    SelectUp,
    SelectDown,
    NoAction,
}

impl GestureAction {
    /// Selection action for a direction, `NoAction` for center
    #[must_use]
    pub const fn select(direction: Direction) -> Self {
        match direction {
            Direction::Left => Self::SelectLeft,
            Direction::Right => Self::SelectRight,
            Direction::Up => Self::SelectUp,
            Direction::Down => Self::SelectDown,
            Direction::Center => Self::NoAction,
        }
    }

    /// Whether this action selects something
    #[must_use]
    pub const fn is_selection(self) -> bool {
        !matches!(self, Self::NoAction)
    }
}

impl fmt::Display for GestureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SelectLeft => "select_left",
            Self::SelectRight => "select_right",
            Self::SelectUp => "select_up",
            Self::SelectDown => "select_down",
            Self::NoAction => "no_action",
        };
        f.write_str(name)
    }
}

/// How a gesture state is turned into an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPolicy {
    /// Fire whenever the current state is confident, stable and intense enough
    Immediate,
    /// Additionally require cooldown, steadiness and agreement across history
    #[default]
    Debounced,
}

impl std::str::FromStr for ActionPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "debounced" => Ok(Self::Debounced),
            _ => Err(crate::Error::InvalidInput(format!("Unknown action policy: {s}"))),
        }
    }
}

impl fmt::Display for ActionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Immediate => "immediate",
            Self::Debounced => "debounced",
        })
    }
}
