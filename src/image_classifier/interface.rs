use crate::shape_relay::probability::ProbabilityVector;
use image::DynamicImage;

pub trait ImageClassifier: Send + Sync {
    /// Scores one frame. The vector has one entry per configured label.
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<ProbabilityVector, Box<dyn std::error::Error + Send + Sync>>;
}
