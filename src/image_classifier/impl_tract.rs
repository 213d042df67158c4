use crate::image_classifier::interface::ImageClassifier;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tract::image::image_to_input_tensor;
use crate::shape_relay::probability::ProbabilityVector;
use image::DynamicImage;
use tract_onnx::prelude::*;

pub struct ImageClassifierTract {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    config: ModelConfig,
    num_labels: usize,
}

impl ImageClassifierTract {
    /// Loads the model and runs one warm-up inference to check that it emits
    /// exactly one score per label.
    pub fn new(
        config: ModelConfig,
        num_labels: usize,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let (width, height) = config.input_shape;
        let input_shape = tvec!(
            1,
            height as usize,
            width as usize,
            config.channels as usize
        );

        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .map_err(|e| format!("failed to load model {}: {}", config.onnx_model_path, e))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), input_shape.clone()),
            )?
            .into_optimized()?
            .into_runnable()?;

        let classifier = Self {
            model,
            config,
            num_labels,
        };

        let warmup = Tensor::zero::<f32>(&input_shape)?;
        let scores = classifier.run(warmup)?;
        if scores.len() != num_labels {
            return Err(format!(
                "model emits {} scores but {} labels are configured",
                scores.len(),
                num_labels
            )
            .into());
        }

        Ok(classifier)
    }

    fn run(&self, input: Tensor) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        let outputs = self.model.run(tvec!(input.into()))?;
        let output = outputs.first().ok_or("model produced no outputs")?;
        let scores = output.to_array_view::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}

impl ImageClassifier for ImageClassifierTract {
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<ProbabilityVector, Box<dyn std::error::Error + Send + Sync>> {
        let input = image_to_input_tensor(image, &self.config)?;
        let scores = self.run(input)?;

        if scores.len() != self.num_labels {
            return Err(format!(
                "model emitted {} scores, expected {}",
                scores.len(),
                self.num_labels
            )
            .into());
        }

        Ok(ProbabilityVector::new(scores))
    }
}
