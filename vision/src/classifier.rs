use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{ModelLoadError, Tensor, VisionError, INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH};

const INPUT_LEN: usize = INPUT_HEIGHT as usize * INPUT_WIDTH as usize * INPUT_CHANNELS;

/// Trained steering model: one preprocessed tensor in, one score out.
pub trait Model: Send + Sync {
    fn predict(&self, input: &Tensor) -> Result<f32, VisionError>;
}

/// Holds the model loaded at start-up for the lifetime of the process.
pub struct Classifier {
    model: Box<dyn Model>,
}

impl Classifier {
    pub fn new(model: impl Model + 'static) -> Self {
        Self { model: Box::new(model) }
    }

    /// Load a [`LinearModel`] artifact from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        LinearModel::load(path).map(Self::new)
    }

    /// Score one tensor of shape (66, 200, 3).
    pub fn score(&self, input: &Tensor) -> Result<f32, VisionError> {
        let expected = (INPUT_HEIGHT as usize, INPUT_WIDTH as usize, INPUT_CHANNELS);
        if input.dim() != expected {
            return Err(VisionError::Model(format!(
                "input shape {:?} does not match {expected:?}",
                input.dim()
            )));
        }
        self.model.predict(input)
    }
}

/// Linear regression over the flattened tensor, stored as JSON:
/// `{"bias": 3.0, "weights": [...]}` with weights in height, width, channel
/// order.
#[derive(Clone, Debug, Deserialize)]
pub struct LinearModel {
    bias: f32,
    weights: Vec<f32>,
}

impl LinearModel {
    pub fn new(bias: f32, weights: Vec<f32>) -> Result<Self, ModelLoadError> {
        let model = Self { bias, weights };
        model.check()?;
        Ok(model)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            ModelLoadError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        model.check()?;
        log::info!("loaded linear model from {}", path.display());
        Ok(model)
    }

    fn check(&self) -> Result<(), ModelLoadError> {
        if self.weights.len() != INPUT_LEN {
            return Err(ModelLoadError::Shape {
                expected: INPUT_LEN,
                found: self.weights.len(),
            });
        }
        Ok(())
    }
}

impl Model for LinearModel {
    fn predict(&self, input: &Tensor) -> Result<f32, VisionError> {
        let dot: f32 = input.iter().zip(&self.weights).map(|(x, w)| x * w).sum();
        Ok(self.bias + dot)
    }
}
