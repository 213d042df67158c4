use crate::device_camera::interface::DeviceCamera;
use image::DynamicImage;
use std::io::Read;
use std::time::Duration;

const MAX_FRAME_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HttpCameraConfig {
    /// Snapshot endpoint, e.g. the `/capture` route of an ESP32-CAM.
    pub url: String,
    pub timeout: Duration,
}

impl Default for HttpCameraConfig {
    fn default() -> Self {
        Self {
            url: "http://172.16.1.44/capture".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

pub struct DeviceCameraHttp {
    agent: ureq::Agent,
    config: HttpCameraConfig,
}

impl DeviceCameraHttp {
    pub fn new(config: HttpCameraConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { agent, config }
    }
}

impl DeviceCamera for DeviceCameraHttp {
    fn capture_frame(
        &self,
    ) -> Result<Option<DynamicImage>, Box<dyn std::error::Error + Send + Sync>> {
        let response = self
            .agent
            .get(&self.config.url)
            .call()
            .map_err(|e| format!("camera request to {} failed: {}", self.config.url, e))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_FRAME_BYTES)
            .read_to_end(&mut bytes)?;

        if bytes.is_empty() {
            return Ok(None);
        }

        Ok(image::load_from_memory(&bytes).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;
    use std::io::{BufRead, BufReader, Cursor, Write};
    use std::net::TcpListener;

    /// Answers a single request with `status` and `body`, returns the URL.
    fn serve_once(status: &str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/capture", listener.local_addr().unwrap());
        let status = status.to_string();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
        });

        url
    }

    fn camera(url: String) -> DeviceCameraHttp {
        DeviceCameraHttp::new(HttpCameraConfig {
            url,
            timeout: Duration::from_secs(2),
        })
    }

    #[test]
    fn test_empty_body_is_skipped() {
        let camera = camera(serve_once("200 OK", Vec::new()));

        assert!(camera.capture_frame().unwrap().is_none());
    }

    #[test]
    fn test_undecodable_body_is_skipped() {
        let camera = camera(serve_once("200 OK", b"garbage".to_vec()));

        assert!(camera.capture_frame().unwrap().is_none());
    }

    #[test]
    fn test_png_body_is_decoded() {
        let mut png = Vec::new();
        DynamicImage::new_luma8(8, 6)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let camera = camera(serve_once("200 OK", png));

        let frame = camera.capture_frame().unwrap().unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 6));
    }

    #[test]
    fn test_server_error_is_an_error() {
        let camera = camera(serve_once("500 Internal Server Error", Vec::new()));

        assert!(camera.capture_frame().is_err());
    }

    #[test]
    fn test_unreachable_camera_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/capture", listener.local_addr().unwrap());
        drop(listener);

        assert!(camera(url).capture_frame().is_err());
    }
}
