use crate::shape_relay::debounce::{DebounceController, DebounceOutcome, SendEvent};
use crate::shape_relay::decision_gate::Decision;

fn decision(label: &str, confidence: f32) -> Decision {
    Decision {
        label: label.to_string(),
        confidence,
    }
}

#[test]
fn test_first_confident_decision_is_sent() {
    let controller = DebounceController::new(0.7);

    assert_eq!(controller.last_sent(), None);
    assert_eq!(
        controller.evaluate(&decision("Circle", 0.9)),
        DebounceOutcome::Send(SendEvent {
            label: "Circle".to_string(),
            confidence: 0.9,
        })
    );
}

#[test]
fn test_steady_label_is_sent_once() {
    let mut controller = DebounceController::new(0.7);
    let mut sends = 0;

    for _ in 0..50 {
        if let DebounceOutcome::Send(sent) = controller.evaluate(&decision("A", 0.9)) {
            sends += 1;
            controller.confirm(&sent);
        }
    }

    assert_eq!(sends, 1);
    assert_eq!(controller.last_sent(), Some("A"));
}

#[test]
fn test_below_threshold_is_uncertain() {
    let controller = DebounceController::new(0.7);

    assert_eq!(
        controller.evaluate(&decision("Circle", 0.69)),
        DebounceOutcome::Uncertain
    );
    assert_eq!(controller.last_sent(), None);
}

#[test]
fn test_threshold_is_inclusive() {
    let controller = DebounceController::new(0.7);

    assert!(matches!(
        controller.evaluate(&decision("Circle", 0.7)),
        DebounceOutcome::Send(_)
    ));
}

#[test]
fn test_nan_confidence_is_uncertain() {
    let controller = DebounceController::new(0.7);

    assert_eq!(
        controller.evaluate(&decision("Circle", f32::NAN)),
        DebounceOutcome::Uncertain
    );
    assert_eq!(controller.last_sent(), None);
}

#[test]
fn test_unconfirmed_send_is_retried() {
    let controller = DebounceController::new(0.7);

    let first = controller.evaluate(&decision("Square", 0.8));
    let second = controller.evaluate(&decision("Square", 0.8));

    assert!(matches!(first, DebounceOutcome::Send(_)));
    assert_eq!(first, second);
    assert_eq!(controller.last_sent(), None);
}

#[test]
fn test_oscillation_sends_every_change() {
    let mut controller = DebounceController::new(0.7);
    let mut sent_labels = Vec::new();

    for label in ["A", "B", "A", "A", "B"] {
        if let DebounceOutcome::Send(sent) = controller.evaluate(&decision(label, 0.95)) {
            controller.confirm(&sent);
            sent_labels.push(sent.label);
        }
    }

    assert_eq!(sent_labels, vec!["A", "B", "A", "B"]);
}

#[test]
fn test_uncertain_frame_does_not_reset_last_sent() {
    let mut controller = DebounceController::new(0.7);
    if let DebounceOutcome::Send(sent) = controller.evaluate(&decision("A", 0.9)) {
        controller.confirm(&sent);
    }

    assert_eq!(
        controller.evaluate(&decision("B", 0.4)),
        DebounceOutcome::Uncertain
    );
    assert_eq!(
        controller.evaluate(&decision("A", 0.9)),
        DebounceOutcome::Unchanged
    );
}
