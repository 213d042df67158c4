use super::probability::ProbabilityVector;
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmoothingError {
    #[error("probability vector has {actual} scores, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Fixed-depth moving average over the last `depth` probability vectors.
///
/// No smoothed vector is produced until the window has been filled once;
/// after that every push yields the mean of the newest `depth` vectors.
#[derive(Debug, Clone)]
pub struct SmoothingWindow {
    history: VecDeque<ProbabilityVector>,
    depth: usize,
    width: usize,
}

impl SmoothingWindow {
    /// `depth` is clamped to at least one frame; `width` is the number of labels.
    pub fn new(depth: usize, width: usize) -> Self {
        let depth = depth.max(1);
        Self {
            history: VecDeque::with_capacity(depth),
            depth,
            width,
        }
    }

    pub fn push(
        &mut self,
        vector: ProbabilityVector,
    ) -> Result<Option<ProbabilityVector>, SmoothingError> {
        if vector.len() != self.width {
            return Err(SmoothingError::LengthMismatch {
                expected: self.width,
                actual: vector.len(),
            });
        }

        self.history.push_back(vector);

        while self.history.len() > self.depth {
            self.history.pop_front();
        }

        if !self.is_full() {
            return Ok(None);
        }

        Ok(Some(self.mean()))
    }

    pub fn is_full(&self) -> bool {
        self.history.len() == self.depth
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn mean(&self) -> ProbabilityVector {
        let mut sums = vec![0.0f32; self.width];
        for vector in &self.history {
            for (sum, score) in sums.iter_mut().zip(vector.scores()) {
                *sum += score;
            }
        }
        let count = self.history.len() as f32;
        sums.iter_mut().for_each(|sum| *sum /= count);
        ProbabilityVector::new(sums)
    }
}
