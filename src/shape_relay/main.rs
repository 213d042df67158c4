use super::render::Render;
use super::serial_notifier::SerialNotifier;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_serial::interface::SerialSession;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// The capture → classify → smooth → decide → notify loop and the devices it
/// owns. Everything runs on the thread that calls `run`.
pub struct ShapeRelay {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    pub notifier: SerialNotifier,
    pub render: Render,
    pub stop: Arc<AtomicBool>,
}

impl ShapeRelay {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        serial_session: Box<dyn SerialSession>,
        device_display: Option<Box<dyn DeviceDisplay>>,
        stop: Arc<AtomicBool>,
    ) -> Self {
        let notifier = SerialNotifier::new(
            serial_session,
            config.ack_grace_period,
            config.serial.timeout,
            Arc::clone(&logger),
        );

        Self {
            logger: logger.with_namespace("relay"),
            config,
            device_camera,
            image_classifier,
            notifier,
            render: Render::new(device_display),
            stop,
        }
    }
}
