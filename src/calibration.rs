//! Neutral head pose calibration.
//!
//! People rarely face the camera at exactly zero degrees. The calibrator
//! collects a window of pose samples while the user holds still, checks the
//! spread of every axis and adopts the mean pose as the new neutral. Poses
//! are then classified relative to that neutral.

use crate::constants::{DEFAULT_CALIBRATION_MAX_STD_DEV, DEFAULT_CALIBRATION_SAMPLES};
use crate::gesture::PoseSample;
use crate::utils::Statistics;
use crate::{Error, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Rest pose subtracted from every sample before classification
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NeutralPose {
    /// Resting yaw in degrees
    pub yaw: f64,
    /// Resting pitch in degrees
    pub pitch: f64,
    /// Resting roll in degrees
    pub roll: f64,
}

impl NeutralPose {
    /// Express `sample` relative to this neutral pose
    #[must_use]
    pub fn apply(&self, sample: &PoseSample) -> PoseSample {
        PoseSample {
            yaw: sample.yaw - self.yaw,
            pitch: sample.pitch - self.pitch,
            roll: sample.roll - self.roll,
            timestamp: sample.timestamp,
        }
    }
}

/// Progress of a calibration run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStatus {
    /// Still gathering samples
    Collecting {
        /// Samples gathered so far
        collected: usize,
        /// Samples needed
        required: usize,
    },
    /// Enough steady samples were gathered
    Complete(NeutralPose),
}

/// Collects a still window of poses and derives the neutral pose from it
#[derive(Debug, Clone)]
pub struct Calibrator {
    required: usize,
    max_std_dev: f64,
    yaw: VecDeque<f64>,
    pitch: VecDeque<f64>,
    roll: VecDeque<f64>,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(DEFAULT_CALIBRATION_SAMPLES, DEFAULT_CALIBRATION_MAX_STD_DEV)
    }
}

impl Calibrator {
    /// Create a calibrator needing `required` samples whose per-axis standard
    /// deviation stays within `max_std_dev` degrees
    ///
    /// # Panics
    ///
    /// Panics if `required` is zero or `max_std_dev` is negative
    #[must_use]
    pub fn new(required: usize, max_std_dev: f64) -> Self {
        assert!(required > 0, "Calibration sample count must be greater than 0");
        assert!(max_std_dev >= 0.0, "Maximum standard deviation must be non-negative, got {}", max_std_dev);
        Self {
            required,
            max_std_dev,
            yaw: VecDeque::with_capacity(required),
            pitch: VecDeque::with_capacity(required),
            roll: VecDeque::with_capacity(required),
        }
    }

    /// Feed one frame. `None` (no face) restarts collection; a frame with
    /// non-finite angles is skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::CalibrationError` when a full window moved more than
    /// allowed; collection restarts from scratch
    pub fn add_sample(&mut self, sample: Option<&PoseSample>) -> Result<CalibrationStatus> {
        let Some(sample) = sample else {
            if !self.yaw.is_empty() {
                warn!("Face lost during calibration, restarting");
            }
            self.reset();
            return Ok(self.status());
        };

        if !sample.is_finite() {
            warn!("Non-finite pose angles at {}ms skipped during calibration", sample.timestamp);
            return Ok(self.status());
        }

        self.yaw.push_back(sample.yaw);
        self.pitch.push_back(sample.pitch);
        self.roll.push_back(sample.roll);

        if self.yaw.len() < self.required {
            return Ok(self.status());
        }

        let result = self.steady_mean();
        self.reset();
        let neutral = result?;

        info!(
            "Calibrated neutral pose: yaw {:.2}°, pitch {:.2}°, roll {:.2}°",
            neutral.yaw, neutral.pitch, neutral.roll
        );
        Ok(CalibrationStatus::Complete(neutral))
    }

    fn steady_mean(&self) -> Result<NeutralPose> {
        let axis = |name: &str, values: &VecDeque<f64>| -> Result<f64> {
            let stats = Statistics::from_values(values)
                .ok_or_else(|| Error::CalibrationError("Empty calibration window".to_string()))?;
            if stats.std_dev > self.max_std_dev {
                warn!(
                    "Calibration rejected: {} moved {:.2}° (std dev), allowed {:.2}°",
                    name, stats.std_dev, self.max_std_dev
                );
                return Err(Error::CalibrationError(format!(
                    "Head moved during calibration: {name} std dev {:.2}° exceeds {:.2}°",
                    stats.std_dev, self.max_std_dev
                )));
            }
            Ok(stats.mean)
        };

        Ok(NeutralPose {
            yaw: axis("yaw", &self.yaw)?,
            pitch: axis("pitch", &self.pitch)?,
            roll: axis("roll", &self.roll)?,
        })
    }

    /// Current progress
    #[must_use]
    pub fn status(&self) -> CalibrationStatus {
        CalibrationStatus::Collecting {
            collected: self.yaw.len(),
            required: self.required,
        }
    }

    /// Drop all collected samples
    pub fn reset(&mut self) {
        self.yaw.clear();
        self.pitch.clear();
        self.roll.clear();
    }
}
