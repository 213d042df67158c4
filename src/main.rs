use clap::Parser;
use config::{Args, Config, DisplayKind};
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::impl_http::DeviceCameraHttp;
use device_camera::interface::DeviceCamera;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use device_display::interface::DeviceDisplay;
use device_serial::impl_fake::SerialSessionFake;
use device_serial::impl_serialport::SerialSessionPort;
use device_serial::interface::SerialSession;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract::ImageClassifierTract;
use image_classifier::interface::ImageClassifier;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use shape_relay::main::ShapeRelay;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod config;
#[cfg(test)]
mod config_test;
mod device_camera;
mod device_display;
mod device_serial;
mod image_classifier;
mod library;
mod shape_relay;

type Devices = (
    Arc<dyn DeviceCamera + Send + Sync>,
    Arc<dyn ImageClassifier + Send + Sync>,
    Box<dyn SerialSession>,
);

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            let logger = LoggerConsole::new(Config::default().logger_timezone);
            let _ = logger.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    match run(config, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = logger.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Errors returned here are reported once by `main`.
fn run(
    config: Config,
    logger: &Arc<dyn Logger + Send + Sync>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))?;
    }

    let (device_camera, image_classifier, serial_session) = open_devices(&config, logger)
        .map_err(|e| format!("Startup failed: {}", e))?;

    let _ = logger.info(&format!(
        "Watching {} with labels [{}], window {} frames, threshold {:.2}",
        config.camera.url,
        config.labels.join(", "),
        config.window_depth,
        config.confidence_threshold
    ));

    let gui = match config.display {
        DisplayKind::Gui => Some(DeviceDisplayGui::new()),
        DisplayKind::Console | DisplayKind::None => None,
    };
    let device_display: Option<Box<dyn DeviceDisplay>> = match (&gui, config.display) {
        (Some(gui), _) => Some(Box::new(gui.clone())),
        (None, DisplayKind::Console) => {
            Some(Box::new(DeviceDisplayConsole::new(config.bell_on_send)))
        }
        (None, _) => None,
    };

    let mut relay = ShapeRelay::new(
        config,
        Arc::clone(logger),
        device_camera,
        image_classifier,
        serial_session,
        device_display,
        Arc::clone(&stop),
    );

    match gui {
        Some(gui) => {
            let relay_thread = std::thread::spawn(move || {
                relay.run();
            });
            if let Err(e) = gui.run_window(Arc::clone(&stop)) {
                let _ = logger.warn(&e.to_string());
            }
            stop.store(true, Ordering::SeqCst);
            relay_thread
                .join()
                .map_err(|_| "relay thread panicked")?;
        }
        None => {
            relay.run();
        }
    }

    Ok(())
}

fn open_devices(
    config: &Config,
    logger: &Arc<dyn Logger + Send + Sync>,
) -> Result<Devices, Box<dyn std::error::Error + Send + Sync>> {
    if config.simulate {
        let _ = logger.info("Simulation mode: fake camera, random classifier, echoing serial");
        let device_camera: Arc<dyn DeviceCamera + Send + Sync> =
            Arc::new(DeviceCameraFake::new().with_frame_interval(Duration::from_millis(100)));
        let image_classifier: Arc<dyn ImageClassifier + Send + Sync> =
            Arc::new(ImageClassifierFake::random(config.labels.len()));
        let serial_session: Box<dyn SerialSession> = Box::new(SerialSessionFake::echoing());
        return Ok((device_camera, image_classifier, serial_session));
    }

    let serial_session: Box<dyn SerialSession> =
        Box::new(SerialSessionPort::open(&config.serial, Arc::clone(logger))?);

    let _ = logger.info(&format!("Loading model {}", config.model.onnx_model_path));
    let image_classifier: Arc<dyn ImageClassifier + Send + Sync> = Arc::new(
        ImageClassifierTract::new(config.model.clone(), config.labels.len())?,
    );

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> =
        Arc::new(DeviceCameraHttp::new(config.camera.clone()));

    Ok((device_camera, image_classifier, serial_session))
}
