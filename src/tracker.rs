//! Per-session tracking pipeline.
//!
//! A [`GestureTracker`] is owned by whatever screen or session consumes head
//! gestures. It applies the neutral-pose offset, the optional angle filter,
//! the classifier and the action policy, in that order, to every frame.

use crate::calibration::{CalibrationStatus, Calibrator, NeutralPose};
use crate::filters::{AngleFilter, NoFilter};
use crate::gesture::{ActionPolicy, GestureAction, GestureClassifier, GestureState, PoseSample};
use crate::Result;
use log::{debug, info, warn};

/// Everything produced for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// Smoothed gesture state
    pub state: GestureState,
    /// Action resolved from it, `NoAction` while calibrating
    pub action: GestureAction,
}

/// Calibration offset, angle filter, classifier and policy for one session
pub struct GestureTracker {
    classifier: GestureClassifier,
    filter: Box<dyn AngleFilter>,
    policy: ActionPolicy,
    neutral: NeutralPose,
    calibrator: Option<Calibrator>,
}

impl GestureTracker {
    /// Create a tracker without pre-filtering and with a zero neutral pose
    #[must_use]
    pub fn new(classifier: GestureClassifier, policy: ActionPolicy) -> Self {
        Self {
            classifier,
            filter: Box::new(NoFilter),
            policy,
            neutral: NeutralPose::default(),
            calibrator: None,
        }
    }

    /// Smooth yaw and pitch with `filter` before classification
    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn AngleFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Classify poses relative to `neutral`
    #[must_use]
    pub fn with_neutral_pose(mut self, neutral: NeutralPose) -> Self {
        self.neutral = neutral;
        self
    }

    /// The classifier, for inspection
    #[must_use]
    pub const fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// The classifier, for setters and subscriptions
    pub fn classifier_mut(&mut self) -> &mut GestureClassifier {
        &mut self.classifier
    }

    /// Active action policy
    #[must_use]
    pub const fn policy(&self) -> ActionPolicy {
        self.policy
    }

    /// Switch the action policy from the next frame on
    pub fn set_policy(&mut self, policy: ActionPolicy) {
        self.policy = policy;
    }

    /// Neutral pose currently subtracted from samples
    #[must_use]
    pub const fn neutral_pose(&self) -> NeutralPose {
        self.neutral
    }

    /// Name of the active angle filter
    #[must_use]
    pub fn filter_name(&self) -> &str {
        self.filter.name()
    }

    /// Whether frames are currently being collected for calibration
    #[must_use]
    pub const fn is_calibrating(&self) -> bool {
        self.calibrator.is_some()
    }

    /// Start collecting frames for a new neutral pose. Until it completes,
    /// frames still produce states but never actions.
    pub fn start_calibration(&mut self, calibrator: Calibrator) {
        info!("Calibration started");
        self.calibrator = Some(calibrator);
    }

    /// Process one frame, `None` when no face was detected.
    ///
    /// Non-finite angles are replaced by 0 before the neutral offset and the
    /// filter see them, so one bad frame never poisons filter state.
    ///
    /// # Errors
    ///
    /// Returns the calibration error when a calibration window is rejected.
    /// That frame is not classified and calibration starts over.
    pub fn process_frame(&mut self, sample: Option<PoseSample>) -> Result<FrameOutcome> {
        let status = self
            .calibrator
            .as_mut()
            .map(|calibrator| calibrator.add_sample(sample.as_ref()))
            .transpose()?;
        let calibrating = match status {
            Some(CalibrationStatus::Complete(neutral)) => {
                self.neutral = neutral;
                self.calibrator = None;
                self.filter.reset();
                self.classifier.reset();
                false
            }
            Some(CalibrationStatus::Collecting { .. }) => true,
            None => false,
        };

        let sample = sample.map(|raw| {
            if !raw.is_finite() {
                warn!("Non-finite pose angles at {}ms treated as zero", raw.timestamp);
            }
            let relative = self.neutral.apply(&raw.sanitized());
            let (yaw, pitch) = self.filter.apply(relative.yaw, relative.pitch);
            PoseSample { yaw, pitch, ..relative }
        });
        if sample.is_none() {
            self.filter.reset();
        }

        let state = self.classifier.observe_pose(sample);
        let action = if calibrating {
            GestureAction::NoAction
        } else {
            self.classifier.resolve_action(&state, self.policy)
        };

        Ok(FrameOutcome { state, action })
    }

    /// Clear filter and classifier state between questions. The neutral
    /// pose is kept; a running calibration is abandoned.
    pub fn reset(&mut self) {
        if self.calibrator.take().is_some() {
            debug!("Calibration abandoned by reset");
        }
        self.filter.reset();
        self.classifier.reset();
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(GestureClassifier::default(), ActionPolicy::default())
    }
}

impl std::fmt::Debug for GestureTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureTracker")
            .field("classifier", &self.classifier)
            .field("filter", &self.filter.name())
            .field("policy", &self.policy)
            .field("neutral", &self.neutral)
            .field("calibrating", &self.calibrator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::create_filter;
    use crate::gesture::Direction;

    #[test]
    fn test_neutral_pose_offsets_samples() {
        let mut tracker = GestureTracker::default().with_neutral_pose(NeutralPose {
            yaw: 10.0,
            pitch: 0.0,
            roll: 0.0,
        });

        // 15° raw is only 5° relative to the neutral pose
        let outcome = tracker.process_frame(Some(PoseSample::new(15.0, 0.0, 0.0, 0.0))).unwrap();
        assert_eq!(outcome.state.direction, Direction::Center);
    }

    #[test]
    fn test_calibration_suppresses_actions_then_applies() {
        let mut tracker = GestureTracker::default();
        tracker.start_calibration(Calibrator::new(3, 1.0));

        for i in 0..3 {
            let outcome = tracker
                .process_frame(Some(PoseSample::new(30.0, 0.0, 0.0, f64::from(i) * 100.0)))
                .unwrap();
            assert_eq!(outcome.action, GestureAction::NoAction);
        }

        assert!(!tracker.is_calibrating());
        assert_eq!(tracker.neutral_pose().yaw, 30.0);

        let outcome = tracker.process_frame(Some(PoseSample::new(30.0, 0.0, 0.0, 300.0))).unwrap();
        assert_eq!(outcome.state.direction, Direction::Center);
    }

    #[test]
    fn test_filter_is_applied() {
        let filter = create_filter("moving_average:2").unwrap();
        let mut tracker = GestureTracker::default().with_filter(filter);
        assert_eq!(tracker.filter_name(), "MovingAverageFilter");

        tracker.process_frame(Some(PoseSample::new(0.0, 0.0, 0.0, 0.0))).unwrap();
        let outcome = tracker.process_frame(Some(PoseSample::new(20.0, 0.0, 0.0, 100.0))).unwrap();
        assert_eq!(outcome.state.rotation.yaw, 10.0);
    }

    #[test]
    fn test_every_filter_recovers_from_non_finite_frame() {
        for spec in ["none", "exponential:0.5", "moving_average:5", "median:5", "hampel:5:3.0"] {
            for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                let mut tracker = GestureTracker::default().with_filter(create_filter(spec).unwrap());
                let first = tracker.process_frame(Some(PoseSample::new(bad, bad, bad, 0.0))).unwrap();
                assert_eq!(first.state.direction, Direction::Center);

                let mut fired = Vec::new();
                for i in 1..=30 {
                    let outcome = tracker
                        .process_frame(Some(PoseSample::new(25.0, 0.0, 0.0, f64::from(i) * 100.0)))
                        .unwrap();
                    assert!(outcome.state.rotation.yaw.is_finite());
                    if outcome.action.is_selection() {
                        fired.push(outcome.action);
                    }
                }

                let last = tracker.classifier().last_state();
                assert_eq!(last.direction, Direction::Right, "{spec} after {bad}");
                assert!((last.rotation.yaw - 25.0).abs() < 1e-6, "{spec} after {bad}");
                assert!(!fired.is_empty(), "{spec} never fired after {bad}");
            }
        }
    }

    #[test]
    fn test_non_finite_frame_during_calibration_is_classified() {
        let mut tracker = GestureTracker::default();
        tracker.start_calibration(Calibrator::new(3, 2.0));

        let outcome = tracker.process_frame(Some(PoseSample::new(f64::NAN, 0.0, 0.0, 0.0))).unwrap();
        assert_eq!(outcome.state.direction, Direction::Center);
        assert_eq!(outcome.action, GestureAction::NoAction);
        assert!(tracker.is_calibrating());

        for i in 1..=3 {
            tracker
                .process_frame(Some(PoseSample::new(6.0, 1.0, 0.0, f64::from(i) * 100.0)))
                .unwrap();
        }
        assert!(!tracker.is_calibrating());
        assert_eq!(tracker.neutral_pose().yaw, 6.0);
    }

    #[test]
    fn test_reset_abandons_calibration() {
        let mut tracker = GestureTracker::default();
        tracker.start_calibration(Calibrator::default());
        tracker.reset();
        assert!(!tracker.is_calibrating());
        assert_eq!(tracker.classifier().history_len(), 0);
    }
}
