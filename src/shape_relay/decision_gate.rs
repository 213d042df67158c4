use super::probability::{LabelSet, ProbabilityVector};

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub label: String,
    pub confidence: f32,
}

/// Picks the best label out of a smoothed vector. The confidence threshold is
/// not applied here; see `DebounceController`.
#[derive(Debug, Clone)]
pub struct DecisionGate {
    labels: LabelSet,
}

impl DecisionGate {
    pub fn new(labels: LabelSet) -> Self {
        Self { labels }
    }

    /// Arg-max over the smoothed scores. Exact ties resolve to the lowest index.
    /// NaN scores never win. Returns `None` only for an empty vector or an
    /// index with no matching label.
    pub fn evaluate(&self, smoothed: &ProbabilityVector) -> Option<Decision> {
        let mut best: Option<(usize, f32)> = None;
        for (index, &score) in smoothed.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }

        let (index, confidence) = best?;
        let label = self.labels.get(index)?;

        Some(Decision {
            label: label.to_string(),
            confidence,
        })
    }
}
