use crate::shape_relay::decision_gate::DecisionGate;
use crate::shape_relay::probability::{LabelSet, ProbabilityVector};

fn gate() -> DecisionGate {
    DecisionGate::new(LabelSet::new(["Circle", "Triangle", "Square"]))
}

#[test]
fn test_picks_highest_score() {
    let decision = gate()
        .evaluate(&ProbabilityVector::new(vec![0.1, 0.2, 0.7]))
        .unwrap();

    assert_eq!(decision.label, "Square");
    assert!((decision.confidence - 0.7).abs() < 1e-6);
}

#[test]
fn test_exact_tie_resolves_to_lowest_index() {
    let decision = gate()
        .evaluate(&ProbabilityVector::new(vec![0.5, 0.5, 0.0]))
        .unwrap();

    assert_eq!(decision.label, "Circle");
    assert_eq!(decision.confidence, 0.5);
}

#[test]
fn test_nan_scores_never_win() {
    let decision = gate()
        .evaluate(&ProbabilityVector::new(vec![f32::NAN, 0.3, 0.2]))
        .unwrap();

    assert_eq!(decision.label, "Triangle");
}

#[test]
fn test_no_decision_without_scores() {
    assert_eq!(gate().evaluate(&ProbabilityVector::new(vec![])), None);
    assert_eq!(
        gate().evaluate(&ProbabilityVector::new(vec![f32::NAN, f32::NAN, f32::NAN])),
        None
    );
}
