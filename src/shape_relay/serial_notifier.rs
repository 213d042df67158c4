use crate::device_serial::interface::SerialSession;
use crate::library::logger::interface::Logger;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    /// The device answered within the grace period.
    Echo(String),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("serial session is closed")]
    Closed,
    #[error("serial write failed: {0}")]
    Write(String),
    #[error("serial flush failed: {0}")]
    Flush(String),
}

/// Writes label lines to the device and listens briefly for an echo.
///
/// Never retries. Whether a failed label is sent again is decided by the
/// caller through the debounce state.
pub struct SerialNotifier {
    session: Box<dyn SerialSession>,
    ack_grace_period: Duration,
    ack_read_timeout: Duration,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl SerialNotifier {
    pub fn new(
        session: Box<dyn SerialSession>,
        ack_grace_period: Duration,
        ack_read_timeout: Duration,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            session,
            ack_grace_period,
            ack_read_timeout,
            logger: logger.with_namespace("notifier"),
        }
    }

    pub fn notify(&mut self, label: &str) -> Result<Ack, TransportError> {
        if !self.session.is_open() {
            return Err(TransportError::Closed);
        }

        let line = format!("{}\n", label);
        self.session
            .write_all(line.as_bytes())
            .map_err(|e| TransportError::Write(e.to_string()))?;
        self.session
            .flush()
            .map_err(|e| TransportError::Flush(e.to_string()))?;

        Ok(self.read_ack())
    }

    /// Releases the session. Safe to call more than once.
    pub fn close(&mut self) {
        if let Err(e) = self.session.close() {
            let _ = self
                .logger
                .warn(&format!("Failed to close serial session: {}", e));
        }
    }

    fn read_ack(&mut self) -> Ack {
        if !self.ack_grace_period.is_zero() {
            std::thread::sleep(self.ack_grace_period);
        }

        match self.session.bytes_available() {
            Ok(0) => return Ack::None,
            Ok(_) => {}
            Err(e) => {
                let _ = self
                    .logger
                    .warn(&format!("Could not poll for device reply: {}", e));
                return Ack::None;
            }
        }

        match self.session.read_line(self.ack_read_timeout) {
            Ok(Some(reply)) => {
                let reply = reply.trim().to_string();
                if reply.is_empty() {
                    Ack::None
                } else {
                    let _ = self.logger.info(&format!("Device replied: {}", reply));
                    Ack::Echo(reply)
                }
            }
            Ok(None) => Ack::None,
            Err(e) => {
                let _ = self
                    .logger
                    .warn(&format!("Could not read device reply: {}", e));
                Ack::None
            }
        }
    }
}

impl Drop for SerialNotifier {
    fn drop(&mut self) {
        self.close();
    }
}
