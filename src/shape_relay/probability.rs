use std::ops::Deref;

/// One score per label, index-aligned with the [`LabelSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityVector(Vec<f32>);

impl ProbabilityVector {
    pub fn new(scores: Vec<f32>) -> Self {
        Self(scores)
    }

    pub fn scores(&self) -> &[f32] {
        &self.0
    }
}

impl Deref for ProbabilityVector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
