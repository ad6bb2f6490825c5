//! Noise gate
//!
//! Hard, stateless gate: samples whose magnitude is at or below the
//! threshold are zeroed, everything else passes unchanged.

use crate::dsp::effect::{map_samples, Effect};
use crate::engine::Waveform;
use crate::error::{RaveError, Result};
use crate::impl_effect_common;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Gate threshold used by the darbouka model
pub const DARBOUKA_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseGate {
    /// Linear amplitude threshold (inclusive)
    pub threshold: f32,
}

impl NoiseGate {
    pub fn new(threshold: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RaveError::Transform {
                effect: "gate".to_string(),
                reason: format!("threshold must be within 0 to 1, got {}", threshold),
            });
        }
        Ok(Self { threshold })
    }
}

impl Default for NoiseGate {
    fn default() -> Self {
        Self {
            threshold: DARBOUKA_THRESHOLD,
        }
    }
}

impl Effect for NoiseGate {
    fn process(&self, input: &Waveform) -> Result<Waveform> {
        Ok(map_samples(input, |x| {
            if x.abs() > self.threshold {
                x
            } else {
                0.0
            }
        }))
    }

    fn get_params(&self) -> Value {
        json!({ "threshold": self.threshold })
    }

    impl_effect_common!(NoiseGate, "gate", "Noise Gate");
}
