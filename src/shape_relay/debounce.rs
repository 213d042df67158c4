use super::decision_gate::Decision;

/// A confirmed label change that should be transmitted to the device.
#[derive(Debug, Clone, PartialEq)]
pub struct SendEvent {
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DebounceOutcome {
    /// Below the confidence threshold.
    Uncertain,
    /// Same label as the last one the device accepted.
    Unchanged,
    Send(SendEvent),
}

/// Tracks the last label the device actually received.
///
/// `last_sent` only moves in [`DebounceController::confirm`], which the loop
/// calls after the serial write succeeded. A failed send leaves it untouched
/// so the next confident decision retries the same transition.
#[derive(Debug, Clone)]
pub struct DebounceController {
    confidence_threshold: f32,
    last_sent: Option<String>,
}

impl DebounceController {
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            confidence_threshold,
            last_sent: None,
        }
    }

    pub fn last_sent(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }

    pub fn evaluate(&self, decision: &Decision) -> DebounceOutcome {
        if decision.confidence.is_nan() || decision.confidence < self.confidence_threshold {
            return DebounceOutcome::Uncertain;
        }

        if self.last_sent.as_deref() == Some(decision.label.as_str()) {
            return DebounceOutcome::Unchanged;
        }

        DebounceOutcome::Send(SendEvent {
            label: decision.label.clone(),
            confidence: decision.confidence,
        })
    }

    pub fn confirm(&mut self, sent: &SendEvent) {
        self.last_sent = Some(sent.label.clone());
    }
}
