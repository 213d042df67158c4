use crate::device_serial::interface::SerialSession;
use crate::library::logger::interface::Logger;
use serialport::SerialPort;
use std::error::Error;
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SerialPortConfig {
    pub port: String,
    pub baud_rate: u32,
    pub timeout: Duration,
    /// ESP32 boards reboot when the port opens; wait before the first write.
    pub settle_delay: Duration,
}

impl Default for SerialPortConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
            timeout: Duration::from_millis(100),
            settle_delay: Duration::from_secs(2),
        }
    }
}

pub struct SerialSessionPort {
    port: Option<Box<dyn SerialPort>>,
    name: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl SerialSessionPort {
    pub fn open(
        config: &SerialPortConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let logger = logger.with_namespace("serial");

        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.timeout)
            .open()
            .map_err(|e| format!("failed to open serial port {}: {}", config.port, e))?;

        std::thread::sleep(config.settle_delay);

        let _ = logger.info(&format!(
            "Connected to {} at {} baud",
            config.port, config.baud_rate
        ));

        Ok(Self {
            port: Some(port),
            name: config.port.clone(),
            logger,
        })
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, Box<dyn Error + Send + Sync>> {
        let name = self.name.clone();
        self.port
            .as_mut()
            .ok_or_else(|| format!("serial port {} is closed", name).into())
    }
}

impl SerialSession for SerialSessionPort {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.port()?.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.port()?.flush()?;
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.port()?.bytes_to_read()?)
    }

    fn read_line(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let port = self.port()?;
        let deadline = Instant::now() + timeout;
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        while Instant::now() < deadline {
            match port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => {
                    return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
                }
                Ok(_) => line.push(byte[0]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&line).into_owned()))
        }
    }

    fn close(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.port.take().is_some() {
            let _ = self.logger.info(&format!("Closed {}", self.name));
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

impl Drop for SerialSessionPort {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("Failed to close serial port during shutdown: {}", e);
        }
    }
}
