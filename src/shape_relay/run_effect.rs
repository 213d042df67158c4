use super::core::{Effect, Event};
use super::main::ShapeRelay;
use std::time::{Duration, Instant};

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

impl ShapeRelay {
    /// Executes one effect and returns the event it produced, if any.
    pub fn run_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::CaptureFrame => Some(Event::FrameCaptured(self.device_camera.capture_frame())),
            Effect::ClassifyFrame { frame } => {
                Some(Event::FrameClassified(self.image_classifier.classify(&frame)))
            }
            Effect::Notify(sent) => {
                let result = self.notifier.notify(&sent.label);
                Some(Event::NotifyDone { sent, result })
            }
            Effect::Backoff => {
                self.sleep_unless_stopped(self.config.error_backoff);
                Some(Event::BackoffElapsed)
            }
            Effect::Alert => {
                if let Err(e) = self.render.alert() {
                    let _ = self.logger.warn(&format!("Display alert failed: {}", e));
                }
                None
            }
            Effect::Log { level, message } => {
                let _ = self.logger.log(level, &message);
                None
            }
        }
    }

    fn sleep_unless_stopped(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline || self.stop_requested() {
                return;
            }
            std::thread::sleep(STOP_POLL_INTERVAL.min(deadline - now));
        }
    }
}
