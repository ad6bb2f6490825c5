//! Inference model contract and calling-convention probe
//!
//! Timbre-transfer checkpoints come in two generations. Newer ones expose a
//! single `forward` call that returns the resynthesized audio (sometimes
//! paired with its latent code); older ones only expose `encode` and
//! `decode`. The runtime signals a missing entry point with
//! [`InferenceError::Unsupported`], and only that signal moves the probe on
//! to the next convention.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::tensor::Tensor;
use crate::error::{RaveError, Result};

/// Errors reported by the inference runtime
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// The model does not expose this entry point
    #[error("interface '{interface}' is not supported by this model")]
    Unsupported { interface: String },

    /// The entry point exists but the call failed
    #[error("{reason}")]
    Failed { reason: String },
}

impl InferenceError {
    pub fn unsupported(interface: &str) -> Self {
        InferenceError::Unsupported {
            interface: interface.to_string(),
        }
    }
}

/// What `forward` returns
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Audio(Tensor),
    /// `(audio, latent)` pair; only the audio is used
    AudioWithLatent(Tensor, Tensor),
}

impl ModelOutput {
    pub fn into_audio(self) -> Tensor {
        match self {
            ModelOutput::Audio(audio) => audio,
            ModelOutput::AudioWithLatent(audio, _) => audio,
        }
    }
}

/// Calling convention a model was run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallingConvention {
    /// Single `forward` call
    Forward,
    /// Legacy `encode` then `decode`
    EncodeDecode,
}

/// A loaded inference graph
///
/// Every entry point defaults to `Unsupported`, so a runtime binding only
/// implements the ones its checkpoint actually has.
pub trait InferenceModel: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    fn forward(&self, input: &Tensor) -> std::result::Result<ModelOutput, InferenceError> {
        let _ = input;
        Err(InferenceError::unsupported("forward"))
    }

    fn encode(&self, input: &Tensor) -> std::result::Result<Tensor, InferenceError> {
        let _ = input;
        Err(InferenceError::unsupported("encode"))
    }

    fn decode(&self, latent: &Tensor) -> std::result::Result<Tensor, InferenceError> {
        let _ = latent;
        Err(InferenceError::unsupported("decode"))
    }
}

/// Loads serialized inference graphs
pub trait ModelLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn InferenceModel>>;
}

/// Resynthesized audio and how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Resynthesis {
    pub audio: Tensor,
    pub convention: CallingConvention,
}

/// Run a model, probing `forward` first and the legacy pair second
///
/// # Errors
/// * `InferenceFailed` - An entry point exists but failed
/// * `IncompatibleModel` - Neither convention is supported
#[instrument(skip_all, fields(model = %model.name()))]
pub fn resynthesize(model: &dyn InferenceModel, input: &Tensor) -> Result<Resynthesis> {
    match model.forward(input) {
        Ok(output) => {
            info!("forward call succeeded");
            return Ok(Resynthesis {
                audio: output.into_audio(),
                convention: CallingConvention::Forward,
            });
        }
        Err(InferenceError::Unsupported { interface }) => {
            warn!("{} unsupported, trying legacy encode/decode", interface);
        }
        Err(InferenceError::Failed { reason }) => {
            return Err(RaveError::InferenceFailed { reason });
        }
    }

    let audio = model
        .encode(input)
        .and_then(|latent| model.decode(&latent))
        .map_err(|err| match err {
            InferenceError::Unsupported { .. } => RaveError::IncompatibleModel {
                model: model.name().to_string(),
            },
            InferenceError::Failed { reason } => RaveError::InferenceFailed { reason },
        })?;

    info!("legacy encode/decode succeeded");
    Ok(Resynthesis {
        audio,
        convention: CallingConvention::EncodeDecode,
    })
}
