use super::debounce::{DebounceController, DebounceOutcome, SendEvent};
use super::decision_gate::{Decision, DecisionGate};
use super::probability::{LabelSet, ProbabilityVector};
use super::serial_notifier::{Ack, TransportError};
use super::smoothing_window::{SmoothingError, SmoothingWindow};
use crate::config::Config;
use crate::library::logger::interface::LogLevel;
use image::DynamicImage;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    WarmingUp { frames: usize, depth: usize },
    Uncertain(Decision),
    Steady(Decision),
    Sending(SendEvent),
    Sent(SendEvent),
}

#[derive(Debug, Clone)]
pub struct Model {
    pub window: SmoothingWindow,
    pub gate: DecisionGate,
    pub debounce: DebounceController,
    pub status: Status,
    pub last_ack: Option<String>,
    pub last_error: Option<String>,
}

impl Model {
    pub fn new(labels: LabelSet, window_depth: usize, confidence_threshold: f32) -> Self {
        let window = SmoothingWindow::new(window_depth, labels.len());
        let status = Status::WarmingUp {
            frames: 0,
            depth: window.depth(),
        };
        Self {
            window,
            gate: DecisionGate::new(labels),
            debounce: DebounceController::new(confidence_threshold),
            status,
            last_ack: None,
            last_error: None,
        }
    }

    pub fn last_sent(&self) -> Option<&str> {
        self.debounce.last_sent()
    }
}

pub enum Event {
    FrameCaptured(Result<Option<DynamicImage>, BoxError>),
    FrameClassified(Result<ProbabilityVector, BoxError>),
    NotifyDone {
        sent: SendEvent,
        result: Result<Ack, TransportError>,
    },
    BackoffElapsed,
}

pub enum Effect {
    CaptureFrame,
    ClassifyFrame { frame: DynamicImage },
    Notify(SendEvent),
    Backoff,
    Alert,
    Log { level: LogLevel, message: String },
}

#[derive(Debug, Error)]
pub enum IterationError {
    #[error("camera returned no usable frame")]
    FrameUnavailable,
    #[error("camera capture failed: {0}")]
    Capture(String),
    #[error("classifier failed: {0}")]
    Classifier(String),
    #[error("smoothing failed: {0}")]
    Smoothing(#[from] SmoothingError),
    #[error("smoothed vector has no valid score")]
    NoDecision,
    #[error("sending {label} failed: {source}")]
    Transport {
        label: String,
        source: TransportError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Move straight on to the next frame.
    Skip,
    /// Wait out the error backoff before the next frame.
    Retry,
}

impl IterationError {
    pub fn recovery(&self) -> Recovery {
        match self {
            IterationError::FrameUnavailable => Recovery::Skip,
            IterationError::Capture(_)
            | IterationError::Classifier(_)
            | IterationError::Smoothing(_)
            | IterationError::NoDecision
            | IterationError::Transport { .. } => Recovery::Retry,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            IterationError::FrameUnavailable => LogLevel::Info,
            IterationError::Smoothing(_) | IterationError::NoDecision => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

pub fn init(config: &Config) -> (Model, Vec<Effect>) {
    (
        Model::new(
            LabelSet::new(config.labels.iter().cloned()),
            config.window_depth,
            config.confidence_threshold,
        ),
        vec![Effect::CaptureFrame],
    )
}

pub fn transition(mut model: Model, event: Event) -> (Model, Vec<Effect>) {
    match event {
        Event::FrameCaptured(Ok(Some(frame))) => (model, vec![Effect::ClassifyFrame { frame }]),
        Event::FrameCaptured(Ok(None)) => recover(model, IterationError::FrameUnavailable),
        Event::FrameCaptured(Err(e)) => recover(model, IterationError::Capture(e.to_string())),

        Event::FrameClassified(Err(e)) => {
            recover(model, IterationError::Classifier(e.to_string()))
        }
        Event::FrameClassified(Ok(vector)) => {
            let smoothed = match model.window.push(vector) {
                Ok(Some(smoothed)) => smoothed,
                Ok(None) => {
                    model.status = Status::WarmingUp {
                        frames: model.window.len(),
                        depth: model.window.depth(),
                    };
                    return (model, vec![Effect::CaptureFrame]);
                }
                Err(e) => return recover(model, e.into()),
            };

            let Some(decision) = model.gate.evaluate(&smoothed) else {
                return recover(model, IterationError::NoDecision);
            };
            model.last_error = None;

            match model.debounce.evaluate(&decision) {
                DebounceOutcome::Uncertain => {
                    model.status = Status::Uncertain(decision);
                    (model, vec![Effect::CaptureFrame])
                }
                DebounceOutcome::Unchanged => {
                    model.status = Status::Steady(decision);
                    (model, vec![Effect::CaptureFrame])
                }
                DebounceOutcome::Send(sent) => {
                    let message = format!(
                        "Sending {} ({:.1}%)",
                        sent.label,
                        sent.confidence * 100.0
                    );
                    model.status = Status::Sending(sent.clone());
                    (
                        model,
                        vec![
                            Effect::Log {
                                level: LogLevel::Info,
                                message,
                            },
                            Effect::Notify(sent),
                        ],
                    )
                }
            }
        }

        Event::NotifyDone {
            sent,
            result: Ok(ack),
        } => {
            model.debounce.confirm(&sent);
            model.last_ack = match ack {
                Ack::Echo(reply) => Some(reply),
                Ack::None => None,
            };
            model.status = Status::Sent(sent);
            (model, vec![Effect::Alert, Effect::CaptureFrame])
        }
        Event::NotifyDone {
            sent,
            result: Err(source),
        } => recover(
            model,
            IterationError::Transport {
                label: sent.label,
                source,
            },
        ),

        Event::BackoffElapsed => (model, vec![Effect::CaptureFrame]),
    }
}

/// The one place iteration failures are turned into a next step.
fn recover(mut model: Model, error: IterationError) -> (Model, Vec<Effect>) {
    let log = Effect::Log {
        level: error.log_level(),
        message: error.to_string(),
    };

    match error.recovery() {
        Recovery::Skip => (model, vec![log, Effect::CaptureFrame]),
        Recovery::Retry => {
            model.last_error = Some(error.to_string());
            (model, vec![log, Effect::Backoff])
        }
    }
}
