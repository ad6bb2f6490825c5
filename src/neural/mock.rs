//! Mock inference runtime
//!
//! Stands in for the external ML runtime in tests and in the CLI. The mock
//! "resynthesis" is a fixed gain so outputs are easy to verify, and every
//! entry point counts its calls so tests can check the probe order.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::model::{InferenceError, InferenceModel, ModelLoader, ModelOutput};
use super::tensor::Tensor;
use crate::error::{RaveError, Result};

/// Gain applied by the mock resynthesis
pub const MOCK_GAIN: f32 = 0.5;

/// Which entry points a mock model exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MockConvention {
    /// `forward` returning audio only
    Modern,
    /// `forward` returning an `(audio, latent)` pair
    ModernWithLatent,
    /// Only `encode` / `decode`
    Legacy,
    /// No usable entry point
    Unsupported,
    /// `forward` exists but always fails
    Broken,
}

/// Configurable fake checkpoint
#[derive(Debug)]
pub struct MockModel {
    name: String,
    convention: MockConvention,
    forward_calls: AtomicUsize,
    encode_calls: AtomicUsize,
    decode_calls: AtomicUsize,
}

impl MockModel {
    pub fn new(name: &str, convention: MockConvention) -> Self {
        Self {
            name: name.to_string(),
            convention,
            forward_calls: AtomicUsize::new(0),
            encode_calls: AtomicUsize::new(0),
            decode_calls: AtomicUsize::new(0),
        }
    }

    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }
}

impl InferenceModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, input: &Tensor) -> std::result::Result<ModelOutput, InferenceError> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        match self.convention {
            MockConvention::Modern => Ok(ModelOutput::Audio(input.map(|v| v * MOCK_GAIN))),
            MockConvention::ModernWithLatent => Ok(ModelOutput::AudioWithLatent(
                input.map(|v| v * MOCK_GAIN),
                Tensor::from_audio(&[0.0; 8]),
            )),
            MockConvention::Broken => Err(InferenceError::Failed {
                reason: "mock forward exploded".to_string(),
            }),
            MockConvention::Legacy | MockConvention::Unsupported => {
                Err(InferenceError::unsupported("forward"))
            }
        }
    }

    fn encode(&self, input: &Tensor) -> std::result::Result<Tensor, InferenceError> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        match self.convention {
            MockConvention::Legacy => Ok(input.clone()),
            _ => Err(InferenceError::unsupported("encode")),
        }
    }

    fn decode(&self, latent: &Tensor) -> std::result::Result<Tensor, InferenceError> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        match self.convention {
            MockConvention::Legacy => Ok(latent.map(|v| v * MOCK_GAIN)),
            _ => Err(InferenceError::unsupported("decode")),
        }
    }
}

/// Loader handing out [`MockModel`]s for existing checkpoint files
#[derive(Debug, Clone, Copy)]
pub struct MockLoader {
    pub convention: MockConvention,
}

impl MockLoader {
    pub fn new(convention: MockConvention) -> Self {
        Self { convention }
    }
}

impl ModelLoader for MockLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn InferenceModel>> {
        if !path.is_file() {
            return Err(RaveError::ModelNotFound {
                model: path.display().to_string(),
            });
        }
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mock".to_string());
        Ok(Box::new(MockModel::new(&name, self.convention)))
    }
}
