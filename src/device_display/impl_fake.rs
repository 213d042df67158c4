use crate::device_display::interface::{fit_line, DeviceDisplay};
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct FakeScreen {
    lines: [String; 2],
    frames: Vec<[String; 2]>,
    alerts: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DeviceDisplayFake {
    screen: Arc<Mutex<FakeScreen>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every distinct panel that was flushed, oldest first.
    pub fn frames(&self) -> Vec<[String; 2]> {
        self.screen
            .lock()
            .map(|screen| screen.frames.clone())
            .unwrap_or_default()
    }

    pub fn alerts(&self) -> usize {
        self.screen.lock().map(|screen| screen.alerts).unwrap_or(0)
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut screen = self.screen.lock().map_err(|_| "display lock poisoned")?;
        screen.lines = [String::new(), String::new()];
        Ok(())
    }

    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if line >= self.num_lines() {
            return Err("Invalid line number".into());
        }
        let text = fit_line(text, self.chars_per_line());
        let mut screen = self.screen.lock().map_err(|_| "display lock poisoned")?;
        screen.lines[line as usize] = text;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut screen = self.screen.lock().map_err(|_| "display lock poisoned")?;
        if screen.frames.last() != Some(&screen.lines) {
            let lines = screen.lines.clone();
            screen.frames.push(lines);
        }
        Ok(())
    }

    fn alert(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut screen = self.screen.lock().map_err(|_| "display lock poisoned")?;
        screen.alerts += 1;
        Ok(())
    }
}
