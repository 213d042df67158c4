use crate::device_serial::interface::SerialSession;
use std::collections::VecDeque;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[allow(dead_code)]
#[derive(Debug, Default)]
struct FakeState {
    written: Vec<String>,
    replies: VecDeque<String>,
    failing_writes: usize,
    echo: bool,
    closed: bool,
    close_calls: usize,
}

/// In-memory serial link. Clones share the same state so a test can keep a
/// handle after giving the session to the relay.
#[derive(Debug, Clone, Default)]
pub struct SerialSessionFake {
    state: Arc<Mutex<FakeState>>,
}

impl SerialSessionFake {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies to every written line with the same line, like the firmware does.
    pub fn echoing() -> Self {
        let fake = Self::default();
        fake.with_state(|state| state.echo = true);
        fake
    }

    /// The next `count` writes fail with an I/O error.
    #[allow(dead_code)]
    pub fn fail_next_writes(&self, count: usize) {
        self.with_state(|state| state.failing_writes = count);
    }

    #[allow(dead_code)]
    pub fn queue_reply(&self, line: &str) {
        self.with_state(|state| state.replies.push_back(line.to_string()));
    }

    #[allow(dead_code)]
    pub fn written(&self) -> Vec<String> {
        self.with_state(|state| state.written.clone())
    }

    pub fn is_closed(&self) -> bool {
        self.with_state(|state| state.closed)
    }

    #[allow(dead_code)]
    pub fn close_calls(&self) -> usize {
        self.with_state(|state| state.close_calls)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut state)
    }
}

impl SerialSession for SerialSessionFake {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| -> Result<(), Box<dyn Error + Send + Sync>> {
            if state.closed {
                return Err("serial port is closed".into());
            }
            if state.failing_writes > 0 {
                state.failing_writes -= 1;
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "device disconnected",
                )));
            }
            let line = String::from_utf8_lossy(bytes).into_owned();
            if state.echo {
                state.replies.push_back(line.trim_end().to_string());
            }
            state.written.push(line);
            Ok(())
        })
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.with_state(|state| {
            state
                .replies
                .front()
                .map(|reply| reply.len() as u32 + 1)
                .unwrap_or(0)
        }))
    }

    fn read_line(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        Ok(self.with_state(|state| state.replies.pop_front()))
    }

    fn close(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_state(|state| {
            state.closed = true;
            state.close_calls += 1;
        });
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.is_closed()
    }
}
