use crate::image_classifier::models::model_config::ModelConfig;
use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

/// Grayscale, resize to the model input and scale to [0, 1].
///
/// The tensor is NHWC (`[1, height, width, channels]`). RGB models receive the
/// gray value replicated on every channel.
pub fn image_to_input_tensor(
    image: &DynamicImage,
    config: &ModelConfig,
) -> Result<Tensor, Box<dyn std::error::Error + Send + Sync>> {
    let (width, height) = config.input_shape;
    if width == 0 || height == 0 {
        return Err("model input shape must be non-zero".into());
    }
    if config.channels != 1 && config.channels != 3 {
        return Err(format!("unsupported channel count {}", config.channels).into());
    }

    let gray = image.to_luma8();
    let resized = imageops::resize(&gray, width, height, imageops::FilterType::Triangle);

    let tensor = tract_ndarray::Array4::from_shape_fn(
        (1, height as usize, width as usize, config.channels as usize),
        |(_, y, x, _)| resized.get_pixel(x as u32, y as u32)[0] as f32 / 255.0,
    );

    Ok(tensor.into_tensor())
}
