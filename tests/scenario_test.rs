//! End-to-end gesture scenarios


use head_gesture::gesture::{ActionPolicy, Direction, GestureAction, GestureClassifier};
use std::sync::{Arc, Mutex};
use test_helpers::{fired_at, hold_yaw, yaw_sample};

fn approx(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-3, "expected {expected}, got {actual}");
}

#[test]
fn test_gradual_right_turn() {
    let mut classifier = GestureClassifier::default();
    let outcomes: Vec<_> = [(0.0, 0.0), (100.0, 12.0), (200.0, 18.0), (300.0, 22.0)]
        .iter()
        .map(|(t, yaw)| classifier.process(yaw_sample(*yaw, *t), ActionPolicy::Debounced))
        .collect();

    let states: Vec<_> = outcomes.iter().map(|(state, _)| *state).collect();
    assert_eq!(states[0].direction, Direction::Center);
    for state in &states[1..] {
        assert_eq!(state.direction, Direction::Right);
    }

    approx(states[1].confidence, 0.2824);
    approx(states[2].confidence, 0.6312);
    approx(states[3].confidence, 0.9147);

    approx(states[1].velocity, 120.0);
    approx(states[2].velocity, 60.0);
    approx(states[3].velocity, 40.0);

    assert_eq!(states[1].duration, 0.0);
    assert_eq!(states[3].duration, 200.0);
    approx(states[3].intensity, 0.88);

    assert!(!states[2].is_stable);
    assert!(states[3].is_stable);

    assert_eq!(fired_at(&outcomes), vec![(300.0, GestureAction::SelectRight)]);
}

#[test]
fn test_quick_flip_is_rejected() {
    let mut classifier = GestureClassifier::default();
    let (first, _) = classifier.process(yaw_sample(15.0, 0.0), ActionPolicy::Debounced);
    let (second, action) = classifier.process(yaw_sample(-15.0, 50.0), ActionPolicy::Debounced);

    assert_eq!(first.direction, Direction::Right);
    approx(second.velocity, 600.0);
    assert_eq!(second.direction, Direction::Right);
    approx(second.confidence, 0.3459);
    assert!(!second.is_stable);
    assert_eq!(action, GestureAction::NoAction);
}

#[test]
fn test_face_lost_mid_gesture() {
    let mut classifier = GestureClassifier::default();
    for (t, yaw) in [(0.0, 0.0), (100.0, 12.0), (200.0, 18.0), (300.0, 22.0)] {
        classifier.process(yaw_sample(yaw, t), ActionPolicy::Debounced);
    }
    assert_eq!(classifier.last_action_at(), Some(300.0));

    let (lost, action) = classifier.process(None, ActionPolicy::Debounced);
    assert_eq!(lost.direction, Direction::Center);
    assert_eq!(lost.previous_direction, Direction::Right);
    assert_eq!(lost.duration, 0.0);
    assert_eq!(lost.timestamp, 300.0);
    assert_eq!(action, GestureAction::NoAction);

    // Re-acquired face starts fresh, without a velocity spike
    let (back, _) = classifier.process(yaw_sample(22.0, 500.0), ActionPolicy::Debounced);
    assert_eq!(back.direction, Direction::Right);
    assert_eq!(back.velocity, 0.0);
    assert_eq!(back.duration, 0.0);

    // Held long enough to be stable, but the cooldown from t=300 still applies
    let outcomes = hold_yaw(&mut classifier, 22.0, 600.0, 1200.0, 100.0, ActionPolicy::Debounced);
    assert!(outcomes[1].0.is_stable);
    assert!(fired_at(&outcomes).is_empty());
    assert!(classifier.is_cooling_down(1200.0));

    let (_, action) = classifier.process(yaw_sample(22.0, 1300.0), ActionPolicy::Debounced);
    assert_eq!(action, GestureAction::SelectRight);
}

#[test]
fn test_next_question_after_reset() {
    let mut classifier = GestureClassifier::default();
    let first = hold_yaw(&mut classifier, 25.0, 0.0, 300.0, 100.0, ActionPolicy::Debounced);
    assert_eq!(fired_at(&first), vec![(200.0, GestureAction::SelectRight)]);

    classifier.reset();

    let second = hold_yaw(&mut classifier, -25.0, 400.0, 700.0, 100.0, ActionPolicy::Debounced);
    assert_eq!(fired_at(&second), vec![(600.0, GestureAction::SelectLeft)]);
}

#[test]
fn test_action_listeners_see_every_selection() {
    let mut classifier = GestureClassifier::default();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    classifier.subscribe_actions(move |event| sink.lock().unwrap().push((event.timestamp, event.action)));

    hold_yaw(&mut classifier, -25.0, 0.0, 400.0, 100.0, ActionPolicy::Immediate);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|(_, action)| *action == GestureAction::SelectLeft));
    assert_eq!(events[0].0, 200.0);
}

#[test]
fn test_listener_can_be_removed_mid_session() {
    let mut classifier = GestureClassifier::default();
    let count = Arc::new(Mutex::new(0_usize));
    let sink = Arc::clone(&count);
    let id = classifier.subscribe(move |_| *sink.lock().unwrap() += 1);

    hold_yaw(&mut classifier, 0.0, 0.0, 400.0, 100.0, ActionPolicy::Debounced);
    assert!(classifier.unsubscribe(id));
    hold_yaw(&mut classifier, 0.0, 500.0, 900.0, 100.0, ActionPolicy::Debounced);

    assert_eq!(*count.lock().unwrap(), 5);
}
