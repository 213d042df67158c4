use crate::shape_relay::probability::ProbabilityVector;
use crate::shape_relay::smoothing_window::{SmoothingError, SmoothingWindow};

fn vector(scores: &[f32]) -> ProbabilityVector {
    ProbabilityVector::new(scores.to_vec())
}

fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-5, "{:?} != {:?}", actual, expected);
    }
}

#[test]
fn test_not_ready_until_full_for_any_depth() {
    for depth in 1..=6 {
        let mut window = SmoothingWindow::new(depth, 2);

        for _ in 0..depth - 1 {
            assert_eq!(window.push(vector(&[0.5, 0.5])).unwrap(), None);
        }
        for _ in 0..3 {
            assert!(window.push(vector(&[0.5, 0.5])).unwrap().is_some());
        }
    }
}

#[test]
fn test_mean_of_full_window() {
    let mut window = SmoothingWindow::new(3, 2);

    window.push(vector(&[0.9, 0.1])).unwrap();
    window.push(vector(&[0.8, 0.2])).unwrap();
    let smoothed = window.push(vector(&[0.85, 0.15])).unwrap().unwrap();

    assert_close(smoothed.scores(), &[0.85, 0.15]);
}

#[test]
fn test_oldest_vector_is_evicted() {
    let mut window = SmoothingWindow::new(2, 3);

    window.push(vector(&[1.0, 0.0, 0.0])).unwrap();
    window.push(vector(&[0.0, 1.0, 0.0])).unwrap();
    let smoothed = window.push(vector(&[0.0, 0.0, 1.0])).unwrap().unwrap();

    assert_eq!(window.len(), 2);
    assert_close(smoothed.scores(), &[0.0, 0.5, 0.5]);
}

#[test]
fn test_length_mismatch_fails_without_touching_history() {
    let mut window = SmoothingWindow::new(3, 2);
    window.push(vector(&[0.5, 0.5])).unwrap();

    let result = window.push(vector(&[0.2, 0.3, 0.5]));

    assert_eq!(
        result,
        Err(SmoothingError::LengthMismatch {
            expected: 2,
            actual: 3
        })
    );
    assert_eq!(window.len(), 1);
}

#[test]
fn test_zero_depth_behaves_as_single_frame() {
    let mut window = SmoothingWindow::new(0, 1);
    assert_eq!(window.depth(), 1);
    assert!(window.push(vector(&[0.4])).unwrap().is_some());
}
