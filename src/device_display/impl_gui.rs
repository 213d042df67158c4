use crate::device_display::interface::{fit_line, DeviceDisplay};
use eframe::egui;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct GuiScreen {
    lines: [String; 2],
    pending: [String; 2],
    alert_until: Option<std::time::Instant>,
}

/// Status window. The relay thread writes through [`DeviceDisplay`]; the main
/// thread drives the window with [`DeviceDisplayGui::run_window`].
#[derive(Clone, Default)]
pub struct DeviceDisplayGui {
    screen: Arc<Mutex<GuiScreen>>,
}

struct DisplayWindow {
    screen: Arc<Mutex<GuiScreen>>,
    stop: Arc<AtomicBool>,
}

impl eframe::App for DisplayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
            self.stop.store(true, Ordering::SeqCst);
        }
        if self.stop.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let (lines, alerting) = match self.screen.lock() {
            Ok(screen) => (
                screen.lines.clone(),
                screen
                    .alert_until
                    .map(|until| until > std::time::Instant::now())
                    .unwrap_or(false),
            ),
            Err(_) => return,
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                let border_color = egui::Color32::from_rgb(100, 100, 100);
                let bg_color = if alerting {
                    egui::Color32::from_rgb(255, 230, 150)
                } else {
                    egui::Color32::from_rgb(200, 255, 200)
                };

                let rect = ui.available_rect_before_wrap();
                ui.painter().rect_filled(rect, 0.0, bg_color);
                ui.painter()
                    .rect_stroke(rect, 0.0, egui::Stroke::new(2.0, border_color));

                for line in lines.iter() {
                    ui.label(
                        egui::RichText::new(line)
                            .monospace()
                            .color(egui::Color32::BLACK)
                            .size(20.0),
                    );
                }

                ui.add_space(10.0);
                ui.label(egui::RichText::new("press q to stop").small());
            });
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the window closes. Pressing `q` or closing the window
    /// raises `stop`; a stop raised elsewhere closes the window.
    pub fn run_window(&self, stop: Arc<AtomicBool>) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([480.0, 200.0])
                .with_resizable(false),
            ..Default::default()
        };

        let window = DisplayWindow {
            screen: Arc::clone(&self.screen),
            stop: Arc::clone(&stop),
        };

        let result = eframe::run_native("Shape Relay", options, Box::new(|_cc| Box::new(window)));
        stop.store(true, Ordering::SeqCst);
        result.map_err(|e| format!("display window failed: {}", e).into())
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut screen = self.screen.lock().map_err(|_| "display lock poisoned")?;
        screen.pending = [String::new(), String::new()];
        Ok(())
    }

    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if line >= self.num_lines() {
            return Err("Invalid line number".into());
        }
        let text = fit_line(text, self.chars_per_line());
        let mut screen = self.screen.lock().map_err(|_| "display lock poisoned")?;
        screen.pending[line as usize] = text;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut screen = self.screen.lock().map_err(|_| "display lock poisoned")?;
        screen.lines = screen.pending.clone();
        Ok(())
    }

    fn alert(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut screen = self.screen.lock().map_err(|_| "display lock poisoned")?;
        screen.alert_until = Some(std::time::Instant::now() + Duration::from_millis(500));
        Ok(())
    }
}
