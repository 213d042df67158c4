use std::error::Error;
use std::time::Duration;

/// An open, exclusively owned link to the microcontroller.
///
/// Every call is bounded by a timeout chosen when the session was opened,
/// except `read_line` which takes its own bound.
pub trait SerialSession: Send {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>>;
    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;
    /// Number of bytes waiting in the input buffer.
    fn bytes_available(&mut self) -> Result<u32, Box<dyn Error + Send + Sync>>;
    /// Reads up to and excluding the next `\n`. Returns `None` if nothing
    /// arrived before `timeout`.
    fn read_line(&mut self, timeout: Duration)
        -> Result<Option<String>, Box<dyn Error + Send + Sync>>;
    /// Releases the port. Calling it again is a no-op.
    fn close(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;
    fn is_open(&self) -> bool;
}
