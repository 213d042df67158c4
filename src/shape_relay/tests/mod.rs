mod debounce_test;
mod decision_gate_test;
mod smoothing_window_test;
