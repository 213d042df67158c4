pub mod core;
pub mod debounce;
pub mod decision_gate;
pub mod main;
pub mod probability;
pub mod render;
pub mod run;
pub mod run_effect;
pub mod serial_notifier;
pub mod smoothing_window;

#[cfg(test)]
mod tests;
