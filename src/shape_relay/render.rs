use super::core::{Model, Status};
use crate::device_display::interface::DeviceDisplay;

pub struct Render {
    device_display: Option<Box<dyn DeviceDisplay>>,
}

impl Render {
    pub fn new(device_display: Option<Box<dyn DeviceDisplay>>) -> Self {
        Self { device_display }
    }

    pub fn init(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match self.device_display.as_mut() {
            Some(display) => display.init(),
            None => Ok(()),
        }
    }

    pub fn render(&mut self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(device_display) = self.device_display.as_mut() else {
            return Ok(());
        };

        let [top, bottom] = lines(model);
        device_display.clear()?;
        device_display.write_line(0, &top)?;
        device_display.write_line(1, &bottom)?;
        device_display.flush()
    }

    pub fn alert(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match self.device_display.as_mut() {
            Some(display) => display.alert(),
            None => Ok(()),
        }
    }

    pub fn render_stopped(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(device_display) = self.device_display.as_mut() else {
            return Ok(());
        };
        device_display.clear()?;
        device_display.write_line(0, "Stopped")?;
        device_display.flush()
    }
}

pub fn lines(model: &Model) -> [String; 2] {
    let top = match &model.status {
        Status::WarmingUp { frames, depth } => format!("Warming up {}/{}", frames, depth),
        Status::Uncertain(decision) => format!(
            "uncertain ({} {})",
            decision.label,
            percent(decision.confidence)
        ),
        Status::Steady(decision) => format!("{} {}", decision.label, percent(decision.confidence)),
        Status::Sending(sent) => format!("Sending {}...", sent.label),
        Status::Sent(sent) => format!("Sent {} {}", sent.label, percent(sent.confidence)),
    };

    let bottom = match (&model.last_error, model.last_sent(), &model.last_ack) {
        (Some(error), _, _) => format!("Error: {}", error),
        (None, Some(label), Some(ack)) => format!("Device: {} (ack {})", label, ack),
        (None, Some(label), None) => format!("Device: {}", label),
        (None, None, _) => "Device: -".to_string(),
    };

    [top, bottom]
}

fn percent(confidence: f32) -> String {
    format!("{:.1}%", confidence * 100.0)
}
