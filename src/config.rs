use crate::device_camera::impl_http::HttpCameraConfig;
use crate::device_serial::impl_serialport::SerialPortConfig;
use crate::image_classifier::models::model_config::ModelConfig;
use chrono::Offset;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    Console,
    Gui,
    None,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub camera: HttpCameraConfig,
    pub model: ModelConfig,
    pub serial: SerialPortConfig,
    pub labels: Vec<String>,
    pub window_depth: usize,
    pub confidence_threshold: f32,
    pub ack_grace_period: Duration,
    pub error_backoff: Duration,
    pub display: DisplayKind,
    pub bell_on_send: bool,
    pub logger_timezone: chrono::FixedOffset,
    pub simulate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera: HttpCameraConfig::default(),
            model: ModelConfig::default(),
            serial: SerialPortConfig::default(),
            labels: ["Circle", "Triangle", "Square", "Error", "Empty"]
                .iter()
                .map(|label| label.to_string())
                .collect(),
            window_depth: 10,
            confidence_threshold: 0.7,
            ack_grace_period: Duration::from_millis(100),
            error_backoff: Duration::from_secs(1),
            display: DisplayKind::Console,
            bell_on_send: true,
            logger_timezone: utc(),
            simulate: false,
        }
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Classify a camera stream and relay stable label changes over serial"
)]
pub struct Args {
    /// TOML configuration file.
    #[arg(long, env = "SHAPE_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Snapshot URL of the camera.
    #[arg(long, env = "SHAPE_RELAY_CAMERA_URL")]
    pub camera_url: Option<String>,

    /// Path to the ONNX classifier.
    #[arg(long, env = "SHAPE_RELAY_MODEL")]
    pub model: Option<String>,

    /// Serial device, e.g. /dev/ttyUSB0 or COM5.
    #[arg(long, env = "SHAPE_RELAY_SERIAL_PORT")]
    pub serial_port: Option<String>,

    #[arg(long, env = "SHAPE_RELAY_BAUD_RATE")]
    pub baud_rate: Option<u32>,

    /// Comma separated labels, in model output order.
    #[arg(long, env = "SHAPE_RELAY_LABELS", value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// Number of frames averaged before a decision is made.
    #[arg(long, env = "SHAPE_RELAY_WINDOW_DEPTH")]
    pub window_depth: Option<usize>,

    /// Minimum averaged score required to send a label.
    #[arg(long, env = "SHAPE_RELAY_CONFIDENCE_THRESHOLD")]
    pub confidence_threshold: Option<f32>,

    #[arg(long, env = "SHAPE_RELAY_DISPLAY", value_enum)]
    pub display: Option<DisplayKind>,

    /// Run against a fake camera, a random classifier and a fake serial port.
    #[arg(long, env = "SHAPE_RELAY_SIMULATE")]
    pub simulate: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    labels: Option<Vec<String>>,
    window_depth: Option<usize>,
    confidence_threshold: Option<f32>,
    error_backoff_ms: Option<u64>,
    display: Option<DisplayKind>,
    bell_on_send: Option<bool>,
    utc_offset_minutes: Option<i32>,
    camera: Option<CameraConfigFile>,
    model: Option<ModelConfigFile>,
    serial: Option<SerialConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CameraConfigFile {
    url: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ModelConfigFile {
    path: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    channels: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SerialConfigFile {
    port: Option<String>,
    baud_rate: Option<u32>,
    timeout_ms: Option<u64>,
    settle_delay_ms: Option<u64>,
    ack_grace_ms: Option<u64>,
}

impl Config {
    /// Defaults, then the config file if one was given, then command line flags.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = args.config.as_deref() {
            config.apply_file(read_config_file(path)?)?;
        }
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file = toml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        let mut config = Self::default();
        config.apply_file(file)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        if let Some(labels) = file.labels {
            self.labels = trim_labels(&labels);
        }
        if let Some(depth) = file.window_depth {
            self.window_depth = depth;
        }
        if let Some(threshold) = file.confidence_threshold {
            self.confidence_threshold = threshold;
        }
        if let Some(ms) = file.error_backoff_ms {
            self.error_backoff = Duration::from_millis(ms);
        }
        if let Some(display) = file.display {
            self.display = display;
        }
        if let Some(bell) = file.bell_on_send {
            self.bell_on_send = bell;
        }
        if let Some(minutes) = file.utc_offset_minutes {
            self.logger_timezone = minutes
                .checked_mul(60)
                .and_then(chrono::FixedOffset::east_opt)
                .ok_or_else(|| {
                    ConfigError::Invalid(format!("utc_offset_minutes {} is out of range", minutes))
                })?;
        }
        if let Some(camera) = file.camera {
            if let Some(url) = camera.url {
                self.camera.url = url;
            }
            if let Some(ms) = camera.timeout_ms {
                self.camera.timeout = Duration::from_millis(ms);
            }
        }
        if let Some(model) = file.model {
            if let Some(path) = model.path {
                self.model.onnx_model_path = path;
            }
            if let Some(width) = model.width {
                self.model.input_shape.0 = width;
            }
            if let Some(height) = model.height {
                self.model.input_shape.1 = height;
            }
            if let Some(channels) = model.channels {
                self.model.channels = channels;
            }
        }
        if let Some(serial) = file.serial {
            if let Some(port) = serial.port {
                self.serial.port = port;
            }
            if let Some(baud_rate) = serial.baud_rate {
                self.serial.baud_rate = baud_rate;
            }
            if let Some(ms) = serial.timeout_ms {
                self.serial.timeout = Duration::from_millis(ms);
            }
            if let Some(ms) = serial.settle_delay_ms {
                self.serial.settle_delay = Duration::from_millis(ms);
            }
            if let Some(ms) = serial.ack_grace_ms {
                self.ack_grace_period = Duration::from_millis(ms);
            }
        }
        Ok(())
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(url) = &args.camera_url {
            self.camera.url = url.clone();
        }
        if let Some(model) = &args.model {
            self.model.onnx_model_path = model.clone();
        }
        if let Some(port) = &args.serial_port {
            self.serial.port = port.clone();
        }
        if let Some(baud_rate) = args.baud_rate {
            self.serial.baud_rate = baud_rate;
        }
        if let Some(labels) = &args.labels {
            self.labels = trim_labels(labels);
        }
        if let Some(depth) = args.window_depth {
            self.window_depth = depth;
        }
        if let Some(threshold) = args.confidence_threshold {
            self.confidence_threshold = threshold;
        }
        if let Some(display) = args.display {
            self.display = display;
        }
        if args.simulate {
            self.simulate = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_depth == 0 {
            return Err(ConfigError::Invalid(
                "window_depth must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "confidence_threshold {} must be within [0, 1]",
                self.confidence_threshold
            )));
        }
        if self.labels.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one label is required".to_string(),
            ));
        }
        for (index, label) in self.labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("label {} is empty", index)));
            }
            if label.contains('\n') || label.contains('\r') {
                return Err(ConfigError::Invalid(format!(
                    "label {:?} contains a line break",
                    label
                )));
            }
            if self.labels[..index].contains(label) {
                return Err(ConfigError::Invalid(format!(
                    "label {:?} is listed twice",
                    label
                )));
            }
        }
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::Invalid(
                "baud_rate must be greater than zero".to_string(),
            ));
        }
        let (width, height) = self.model.input_shape;
        if width == 0 || height == 0 {
            return Err(ConfigError::Invalid(
                "model input width and height must be greater than zero".to_string(),
            ));
        }
        if self.model.channels != 1 && self.model.channels != 3 {
            return Err(ConfigError::Invalid(format!(
                "model channels must be 1 or 3, got {}",
                self.model.channels
            )));
        }
        Ok(())
    }
}

fn trim_labels(labels: &[String]) -> Vec<String> {
    labels.iter().map(|label| label.trim().to_string()).collect()
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
