//! Head gesture library for hands-free answer selection.
//!
//! This library turns the per-frame head pose reported by a face detector
//! (yaw, pitch and roll in degrees) into discrete, debounced gestures:
//! `left`, `right`, `up`, `down` or `center`. Confident, held and steady
//! gestures resolve into selection actions suitable for driving a quiz.
//!
//! The pipeline for every frame:
//! 1. Optional neutral-pose offset from calibration
//! 2. Optional angle pre-filter to smooth detector noise
//! 3. Classification with hysteresis, confidence decay and smoothing
//! 4. Action resolution, immediate or debounced
//!
//! No clock, camera or thread is involved: timestamps come with the samples,
//! so the whole pipeline can be driven deterministically.
//!
//! # Examples
//!
//! ## Classifying frames
//!
//! ```
//! use head_gesture::gesture::{ActionPolicy, Direction, GestureAction, GestureClassifier, PoseSample};
//!
//! let mut classifier = GestureClassifier::default();
//!
//! let mut fired = Vec::new();
//! for (t, yaw) in [(0.0, 0.0), (100.0, 12.0), (200.0, 18.0), (300.0, 22.0)] {
//!     let state = classifier.observe_pose(Some(PoseSample::new(yaw, 0.0, 0.0, t)));
//!     let action = classifier.resolve_action(&state, ActionPolicy::Debounced);
//!     if action.is_selection() {
//!         fired.push(action);
//!     }
//! }
//!
//! assert_eq!(classifier.last_state().direction, Direction::Right);
//! assert_eq!(fired, vec![GestureAction::SelectRight]);
//!
//! // No face on this frame
//! let state = classifier.observe_pose(None);
//! assert_eq!(state.direction, Direction::Center);
//! ```
//!
//! ## Subscribing to states
//!
//! ```
//! use head_gesture::gesture::{GestureClassifier, PoseSample};
//! use std::sync::{Arc, Mutex};
//!
//! let mut classifier = GestureClassifier::default();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let id = classifier.subscribe(move |state| sink.lock().unwrap().push(state.direction));
//!
//! classifier.observe_pose(Some(PoseSample::new(-20.0, 0.0, 0.0, 0.0)));
//! classifier.unsubscribe(id);
//! classifier.observe_pose(None);
//!
//! assert_eq!(seen.lock().unwrap().len(), 1);
//! ```
//!
//! ## Full tracking session
//!
//! ```
//! use head_gesture::config::Config;
//! use head_gesture::gesture::PoseSample;
//!
//! # fn main() -> head_gesture::Result<()> {
//! let mut config = Config::default();
//! config.filter.kind = "median:3".to_string();
//! let mut tracker = config.build_tracker()?;
//!
//! let outcome = tracker.process_frame(Some(PoseSample::new(3.0, -1.0, 0.0, 0.0)))?;
//! assert!(!outcome.action.is_selection());
//!
//! // Next question
//! tracker.reset();
//! # Ok(())
//! # }
//! ```

/// Gesture types, classifier, history and subscriptions
pub mod gesture;

/// Signal filtering algorithms for smoothing pose angles
pub mod filters;

/// Neutral pose calibration
pub mod calibration;

/// Per-session tracking pipeline
pub mod tracker;

/// Pose trace parsing
pub mod trace;

/// Trace replay application
pub mod app;

/// Numeric helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
