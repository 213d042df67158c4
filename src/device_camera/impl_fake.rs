use crate::device_camera::interface::DeviceCamera;
use image::DynamicImage;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum FakeCapture {
    Frame,
    Unavailable,
    #[allow(dead_code)]
    Fail(String),
}

/// Hands out blank frames. A script can be queued to simulate camera hiccups;
/// once it runs out every call returns a frame again, or raises the stop flag
/// if one was attached with [`DeviceCameraFake::stop_when_exhausted`].
pub struct DeviceCameraFake {
    script: Mutex<VecDeque<FakeCapture>>,
    stop_when_exhausted: Option<Arc<AtomicBool>>,
    frame_interval: Duration,
    width: u32,
    height: u32,
}

impl DeviceCameraFake {
    pub fn new() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn scripted(script: Vec<FakeCapture>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            stop_when_exhausted: None,
            frame_interval: Duration::ZERO,
            width: 100,
            height: 100,
        }
    }

    /// `count` good frames in a row.
    #[allow(dead_code)]
    pub fn frames(count: usize) -> Self {
        Self::scripted(vec![FakeCapture::Frame; count])
    }

    #[allow(dead_code)]
    pub fn stop_when_exhausted(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop_when_exhausted = Some(stop);
        self
    }

    /// Pace captures like a real camera would.
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn capture_frame(
        &self,
    ) -> Result<Option<DynamicImage>, Box<dyn std::error::Error + Send + Sync>> {
        if !self.frame_interval.is_zero() {
            std::thread::sleep(self.frame_interval);
        }

        let next = self
            .script
            .lock()
            .map_err(|_| "camera script lock poisoned")?
            .pop_front();

        let next = match (next, &self.stop_when_exhausted) {
            (Some(next), _) => next,
            (None, Some(stop)) => {
                stop.store(true, Ordering::SeqCst);
                FakeCapture::Unavailable
            }
            (None, None) => FakeCapture::Frame,
        };

        match next {
            FakeCapture::Frame => Ok(Some(DynamicImage::new_luma8(self.width, self.height))),
            FakeCapture::Unavailable => Ok(None),
            FakeCapture::Fail(message) => Err(message.into()),
        }
    }
}
