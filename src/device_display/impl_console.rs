use crate::device_display::interface::{fit_line, DeviceDisplay};
use std::error::Error;
use std::io::Write;

pub struct DeviceDisplayConsole {
    display_buffer: [String; 2],
    last_rendered: Option<[String; 2]>,
    bell_on_alert: bool,
}

impl DeviceDisplayConsole {
    pub fn new(bell_on_alert: bool) -> Self {
        Self {
            display_buffer: [String::new(), String::new()],
            last_rendered: None,
            bell_on_alert,
        }
    }

    fn render_display(&self) {
        let width = self.chars_per_line() as usize;
        println!("┌{}┐", "─".repeat(width));
        for row in &self.display_buffer {
            println!("│{:<width$}│", row, width = width);
        }
        println!("└{}┘", "─".repeat(width));
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.render_display();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.display_buffer = [String::new(), String::new()];
        Ok(())
    }

    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if line >= self.num_lines() {
            return Err("Invalid line number".into());
        }
        self.display_buffer[line as usize] = fit_line(text, self.chars_per_line());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.last_rendered.as_ref() == Some(&self.display_buffer) {
            return Ok(());
        }
        self.render_display();
        self.last_rendered = Some(self.display_buffer.clone());
        Ok(())
    }

    fn alert(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.bell_on_alert {
            let mut stdout = std::io::stdout();
            stdout.write_all(b"\x07")?;
            stdout.flush()?;
        }
        Ok(())
    }
}
