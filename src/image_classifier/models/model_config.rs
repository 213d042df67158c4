#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: String,
    /// (width, height) of the model input.
    pub input_shape: (u32, u32),
    /// 1 for grayscale models, 3 for RGB models.
    pub channels: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            onnx_model_path: "model.onnx".to_string(),
            input_shape: (96, 96),
            channels: 1,
        }
    }
}
