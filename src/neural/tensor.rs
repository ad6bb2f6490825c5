//! Minimal dense tensor exchanged with the inference runtime

use serde::{Deserialize, Serialize};

use crate::error::{RaveError, Result};

/// Row-major `f32` tensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(RaveError::InferenceFailed {
                reason: format!(
                    "shape {:?} needs {} values, got {}",
                    shape,
                    expected,
                    data.len()
                ),
            });
        }
        Ok(Self { shape, data })
    }

    /// Batched single-channel audio: shape `[1, 1, N]`
    pub fn from_audio(samples: &[f32]) -> Self {
        Self {
            shape: vec![1, 1, samples.len()],
            data: samples.to_vec(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn dim(&self) -> usize {
        self.shape.len()
    }

    /// Drop the leading batch dimension of a 3-D tensor of batch size 1
    pub fn squeeze_batch(self) -> Self {
        if self.dim() == 3 && self.shape[0] == 1 {
            Self {
                shape: self.shape[1..].to_vec(),
                data: self.data,
            }
        } else {
            self
        }
    }

    /// Collapse to one mono channel
    ///
    /// The last axis is time; every other axis is treated as a channel and
    /// averaged.
    pub fn into_mono(self) -> Vec<f32> {
        let frames = self.shape.last().copied().unwrap_or(0);
        if frames == 0 {
            return Vec::new();
        }
        let channels = self.data.len() / frames;
        if channels <= 1 {
            return self.data;
        }

        (0..frames)
            .map(|t| (0..channels).map(|c| self.data[c * frames + t]).sum::<f32>() / channels as f32)
            .collect()
    }

    /// Elementwise map, keeping the shape
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            shape: self.shape.clone(),
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}
