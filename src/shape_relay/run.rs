use super::core::{init, transition, Effect, Model};
use super::main::ShapeRelay;
use std::collections::VecDeque;
use std::sync::atomic::Ordering;

impl ShapeRelay {
    /// Runs until the stop flag is raised, then releases the serial session
    /// and the display. The flag is only checked between iterations.
    pub fn run(&mut self) -> Model {
        let (mut current_model, effects) = init(&self.config);
        let mut pending: VecDeque<Effect> = effects.into();

        if let Err(e) = self.render.init() {
            let _ = self.logger.warn(&format!("Display init failed: {}", e));
        }

        while let Some(effect) = pending.pop_front() {
            if matches!(effect, Effect::CaptureFrame) && self.stop_requested() {
                break;
            }

            let Some(event) = self.run_effect(effect) else {
                continue;
            };

            let (new_model, effects) = transition(current_model, event);
            current_model = new_model;

            if let Err(e) = self.render.render(&current_model) {
                let _ = self.logger.warn(&format!("Display update failed: {}", e));
            }

            pending.extend(effects);
        }

        self.shutdown();
        current_model
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    fn shutdown(&mut self) {
        let _ = self.logger.info("Stop requested, shutting down");
        self.notifier.close();
        if let Err(e) = self.render.render_stopped() {
            let _ = self.logger.warn(&format!("Display update failed: {}", e));
        }
    }
}
