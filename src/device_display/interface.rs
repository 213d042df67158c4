use std::error::Error;

/// Operator-facing status panel with a fixed number of text lines.
pub trait DeviceDisplay: Send + Sync {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Write text to a specific line (0-based). Text longer than
    /// `chars_per_line` is truncated.
    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Draw the buffered lines if they changed since the last flush.
    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Short cue that a label was just sent to the device.
    fn alert(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn num_lines(&self) -> u8 {
        2
    }

    fn chars_per_line(&self) -> u8 {
        32
    }
}

pub(crate) fn fit_line(text: &str, width: u8) -> String {
    text.chars().take(width as usize).collect()
}
