use crate::image_classifier::interface::ImageClassifier;
use crate::shape_relay::probability::ProbabilityVector;
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::collections::VecDeque;
use std::sync::Mutex;

enum Mode {
    #[allow(dead_code)]
    Scripted(Mutex<VecDeque<Result<Vec<f32>, String>>>),
    Random(Mutex<RandomScene>),
}

/// The label the simulated scene currently shows and how many more frames it
/// stays in view.
struct RandomScene {
    num_labels: usize,
    dominant: usize,
    frames_left: u32,
}

pub struct ImageClassifierFake {
    mode: Mode,
}

impl ImageClassifierFake {
    /// Returns the queued results in order, then fails once the queue is empty.
    #[allow(dead_code)]
    pub fn scripted(script: Vec<Result<Vec<f32>, String>>) -> Self {
        Self {
            mode: Mode::Scripted(Mutex::new(script.into())),
        }
    }

    /// Noisy scores where one label dominates for a few seconds at a time.
    pub fn random(num_labels: usize) -> Self {
        Self {
            mode: Mode::Random(Mutex::new(RandomScene {
                num_labels: num_labels.max(1),
                dominant: 0,
                frames_left: 0,
            })),
        }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        _image: &DynamicImage,
    ) -> Result<ProbabilityVector, Box<dyn std::error::Error + Send + Sync>> {
        match &self.mode {
            Mode::Scripted(script) => {
                let next = script
                    .lock()
                    .map_err(|_| "classifier script lock poisoned")?
                    .pop_front()
                    .ok_or("classifier script exhausted")?;
                Ok(ProbabilityVector::new(next?))
            }
            Mode::Random(scene) => {
                let mut scene = scene.lock().map_err(|_| "classifier lock poisoned")?;
                let mut rng = rand::rng();

                if scene.frames_left == 0 {
                    let index_dist =
                        Uniform::new(0, scene.num_labels).map_err(|e| e.to_string())?;
                    let duration_dist = Uniform::new(20u32, 60).map_err(|e| e.to_string())?;
                    scene.dominant = index_dist.sample(&mut rng);
                    scene.frames_left = duration_dist.sample(&mut rng);
                }
                scene.frames_left -= 1;

                let noise_dist = Uniform::new(0.0f32, 1.0).map_err(|e| e.to_string())?;
                let mut scores: Vec<f32> = (0..scene.num_labels)
                    .map(|_| noise_dist.sample(&mut rng) * 0.3)
                    .collect();
                scores[scene.dominant] += 0.5 + noise_dist.sample(&mut rng) * 0.5;

                let total: f32 = scores.iter().sum();
                scores.iter_mut().for_each(|score| *score /= total);

                Ok(ProbabilityVector::new(scores))
            }
        }
    }
}
