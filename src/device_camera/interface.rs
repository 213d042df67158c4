use image::DynamicImage;

pub trait DeviceCamera: Send + Sync {
    /// Grabs one frame. `Ok(None)` means the camera answered but produced
    /// nothing usable (empty or undecodable image); `Err` means the camera
    /// could not be reached at all.
    fn capture_frame(
        &self,
    ) -> Result<Option<DynamicImage>, Box<dyn std::error::Error + Send + Sync>>;
}
