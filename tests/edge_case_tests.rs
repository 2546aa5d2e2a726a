//! Edge case tests for filters, classification and calibration

use head_gesture::{
    calibration::{CalibrationStatus, Calibrator},
    filters::create_filter,
    gesture::{ActionPolicy, Direction, GestureAction, GestureClassifier, PoseSample},
    tracker::GestureTracker,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ALL_FILTERS: [&str; 5] = ["none", "movingaverage:5", "median:5", "exponential:0.8", "hampel:7:3.0"];

const EXTREME_VALUES: [(f64, f64); 5] = [
    (f64::INFINITY, f64::NEG_INFINITY),
    (f64::NEG_INFINITY, f64::INFINITY),
    (f64::NAN, f64::NAN),
    (f64::MAX, f64::MIN),
    (1e100, -1e100),
];

// Longer than every window in ALL_FILTERS
const RECOVERY_FRAMES: usize = 9;

#[test]
fn test_filter_extreme_values() {
    for filter_str in ALL_FILTERS {
        for (bad_yaw, bad_pitch) in EXTREME_VALUES {
            let mut filter = create_filter(filter_str).unwrap();
            for _ in 0..5 {
                filter.apply(10.0, -5.0);
            }
            filter.apply(bad_yaw, bad_pitch);

            let mut output = (0.0, 0.0);
            for frame in 0..RECOVERY_FRAMES {
                output = filter.apply(10.0, -5.0);
                assert!(
                    output.0.is_finite() && output.1.is_finite(),
                    "{filter_str} after ({bad_yaw}, {bad_pitch}) gave {output:?} on frame {frame}"
                );
            }

            // Windowed filters have flushed the extreme value by now
            if !filter_str.starts_with("exponential") {
                assert_eq!(output, (10.0, -5.0), "{filter_str} after ({bad_yaw}, {bad_pitch})");
            }
        }
    }
}

#[test]
fn test_tracker_recovers_from_extreme_values() {
    for filter_str in ALL_FILTERS {
        for (bad_yaw, bad_pitch) in EXTREME_VALUES {
            let mut tracker = GestureTracker::default().with_filter(create_filter(filter_str).unwrap());
            for i in 0..3 {
                tracker.process_frame(Some(PoseSample::new(0.0, 0.0, 0.0, f64::from(i) * 100.0))).unwrap();
            }
            tracker.process_frame(Some(PoseSample::new(bad_yaw, bad_pitch, bad_yaw, 300.0))).unwrap();

            let mut fired = 0;
            for i in 4..34 {
                let outcome = tracker
                    .process_frame(Some(PoseSample::new(25.0, 0.0, 0.0, f64::from(i) * 100.0)))
                    .unwrap();
                let state = outcome.state;
                for value in [
                    state.confidence,
                    state.intensity,
                    state.velocity,
                    state.duration,
                    state.rotation.yaw,
                    state.rotation.pitch,
                    state.rotation.roll,
                ] {
                    assert!(value.is_finite(), "{filter_str} after ({bad_yaw}, {bad_pitch}): {state:?}");
                }
                if outcome.action.is_selection() {
                    fired += 1;
                }
            }

            assert_eq!(
                tracker.classifier().last_state().direction,
                Direction::Right,
                "{filter_str} after ({bad_yaw}, {bad_pitch})"
            );
            assert!(fired > 0, "{filter_str} never fired after ({bad_yaw}, {bad_pitch})");
        }
    }
}

#[test]
fn test_filter_reset_behavior() {
    for filter_str in ["movingaverage:3", "exponential:0.5"] {
        let mut filter = create_filter(filter_str).unwrap();

        filter.apply(10.0, 20.0);
        filter.apply(15.0, 25.0);
        filter.apply(20.0, 30.0);
        let before_reset = filter.apply(25.0, 35.0);

        filter.reset();
        let after_reset = filter.apply(25.0, 35.0);

        assert_ne!(before_reset, after_reset, "Filter {} did not forget its input", filter.name());
        // First value after a reset passes through
        assert_eq!(after_reset, (25.0, 35.0));
    }
}

#[test]
fn test_filter_convergence() {
    for filter_str in ALL_FILTERS {
        let mut filter = create_filter(filter_str).unwrap();
        let target = (18.0, -12.0);

        let mut last_output = (0.0, 0.0);
        for _ in 0..50 {
            last_output = filter.apply(target.0, target.1);
        }

        assert!(
            (last_output.0 - target.0).abs() < 1e-6,
            "Filter {} did not converge to target yaw",
            filter.name()
        );
        assert!(
            (last_output.1 - target.1).abs() < 1e-6,
            "Filter {} did not converge to target pitch",
            filter.name()
        );
    }
}

#[test]
fn test_filter_impulse_response() {
    for filter_str in ["movingaverage:5", "median:5", "exponential:0.8", "hampel:5:3.0"] {
        let mut filter = create_filter(filter_str).unwrap();

        for _ in 0..10 {
            filter.apply(10.0, 10.0);
        }

        // A single detector glitch
        let impulse_response = filter.apply(170.0, 170.0);
        let recovery_response = filter.apply(10.0, 10.0);

        match filter.name() {
            "MedianFilter" | "HampelFilter" => {
                assert_eq!(impulse_response.0, 10.0, "{} did not reject impulse", filter.name());
            }
            _ => {
                assert!(impulse_response.0 > 30.0, "{} was not affected by impulse", filter.name());
            }
        }

        assert!(recovery_response.0 <= impulse_response.0);
    }
}

#[test]
fn test_extreme_angles_saturate() {
    let mut classifier = GestureClassifier::default();
    let state = classifier.observe_pose(Some(PoseSample::new(-1000.0, 5.0, 720.0, 0.0)));
    assert_eq!(state.direction, Direction::Left);
    assert_eq!(state.confidence, 1.0);
    assert_eq!(state.intensity, 1.0);
    assert_eq!(state.rotation.yaw, -180.0);
    assert_eq!(state.rotation.roll, 180.0);
}

#[test]
fn test_non_finite_frames_do_not_poison_state() {
    let mut classifier = GestureClassifier::default();
    classifier.observe_pose(Some(PoseSample::new(22.0, 0.0, 0.0, 0.0)));
    let state = classifier.observe_pose(Some(PoseSample::new(f64::NAN, f64::NAN, f64::NAN, 100.0)));

    for value in [state.confidence, state.intensity, state.velocity, state.duration, state.timestamp] {
        assert!(value.is_finite());
    }
    assert!((0.0..=1.0).contains(&state.confidence));

    let state = classifier.observe_pose(Some(PoseSample::new(22.0, 0.0, 0.0, f64::INFINITY)));
    assert!(state.timestamp.is_finite());
    assert!(state.velocity.is_finite());
}

#[test]
fn test_roll_alone_is_center() {
    let mut classifier = GestureClassifier::default();
    let state = classifier.observe_pose(Some(PoseSample::new(0.0, 0.0, 45.0, 0.0)));
    assert_eq!(state.direction, Direction::Center);
}

#[test]
fn test_noisy_center_never_fires() {
    let mut rng = StdRng::seed_from_u64(12345);
    let mut classifier = GestureClassifier::default();

    for i in 0..300 {
        let sample = PoseSample::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), 0.0, f64::from(i) * 33.0);
        let (state, action) = classifier.process(Some(sample), ActionPolicy::Debounced);
        assert_eq!(state.direction, Direction::Center);
        assert_eq!(action, GestureAction::NoAction);
    }
}

#[test]
fn test_noisy_hold_fires_once_through_filter() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tracker = GestureTracker::default().with_filter(create_filter("median:5").unwrap());

    let mut fired = Vec::new();
    for i in 0..10 {
        let yaw = 22.0 + rng.gen_range(-0.5..0.5);
        let outcome = tracker
            .process_frame(Some(PoseSample::new(yaw, 0.0, 0.0, f64::from(i) * 100.0)))
            .unwrap();
        if outcome.action.is_selection() {
            fired.push((outcome.state.timestamp, outcome.action));
        }
    }

    assert_eq!(fired, vec![(200.0, GestureAction::SelectRight)]);
}

#[test]
fn test_single_sample_calibration() {
    let mut calibrator = Calibrator::new(1, 0.0);
    let status = calibrator.add_sample(Some(&PoseSample::new(3.0, -2.0, 1.0, 0.0))).unwrap();
    match status {
        CalibrationStatus::Complete(neutral) => {
            assert_eq!((neutral.yaw, neutral.pitch, neutral.roll), (3.0, -2.0, 1.0));
        }
        CalibrationStatus::Collecting { .. } => panic!("one sample should complete calibration"),
    }
}

#[test]
fn test_calibration_skips_non_finite_sample() {
    let mut calibrator = Calibrator::new(2, 2.0);
    calibrator.add_sample(Some(&PoseSample::new(4.0, 1.0, 0.0, 0.0))).unwrap();

    let status = calibrator.add_sample(Some(&PoseSample::new(f64::NAN, 0.0, 0.0, 33.0))).unwrap();
    assert_eq!(status, CalibrationStatus::Collecting { collected: 1, required: 2 });

    let status = calibrator.add_sample(Some(&PoseSample::new(4.0, 1.0, 0.0, 66.0))).unwrap();
    match status {
        CalibrationStatus::Complete(neutral) => assert_eq!((neutral.yaw, neutral.pitch), (4.0, 1.0)),
        CalibrationStatus::Collecting { .. } => panic!("two finite samples should complete calibration"),
    }
}

#[test]
fn test_calibration_restarts_on_lost_face() {
    let mut calibrator = Calibrator::new(3, 2.0);
    calibrator.add_sample(Some(&PoseSample::new(1.0, 0.0, 0.0, 0.0))).unwrap();
    calibrator.add_sample(Some(&PoseSample::new(1.0, 0.0, 0.0, 33.0))).unwrap();

    let status = calibrator.add_sample(None).unwrap();
    assert_eq!(status, CalibrationStatus::Collecting { collected: 0, required: 3 });
}
