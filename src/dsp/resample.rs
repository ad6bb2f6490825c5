//! Length-changing effects
//!
//! [`Resample`] reads the input at a fixed fractional step with truncated
//! indices (nearest-lower sample, no interpolation). A step above 1 shortens
//! the signal and raises its pitch, a step below 1 lengthens and lowers it.
//!
//! [`Stretch`] linearly interpolates the input onto a longer grid that spans
//! the same index domain, so the first and last samples are kept exactly.

use crate::dsp::effect::Effect;
use crate::engine::Waveform;
use crate::error::{RaveError, Result};
use crate::impl_effect_common;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Read step of the speech model (about +20% speed)
pub const SPEECH_STEP: f64 = 1.2;

/// Read step of the cats model
pub const CATS_STEP: f64 = 0.7;

/// Length factor of the dogs model
pub const DOGS_FACTOR: f64 = 1.5;

// ============================================================================
// Resample
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resample {
    pub step: f64,
}

impl Resample {
    pub fn new(step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(RaveError::Transform {
                effect: "resample".to_string(),
                reason: format!("step must be positive, got {}", step),
            });
        }
        Ok(Self { step })
    }

    /// Source indices read for an input of length `len`
    ///
    /// Positions `0, step, 2*step, ...` strictly below `len`, truncated and
    /// clamped to the last valid index.
    pub fn indices(&self, len: usize) -> Vec<usize> {
        if len == 0 {
            return Vec::new();
        }

        let limit = len as f64;
        let last = len - 1;
        (0_u64..)
            .map(|k| k as f64 * self.step)
            .take_while(|&pos| pos < limit)
            .map(|pos| (pos as usize).min(last))
            .collect()
    }
}

impl Effect for Resample {
    fn process(&self, input: &Waveform) -> Result<Waveform> {
        Ok(input.with_samples(
            self.indices(input.len())
                .into_iter()
                .map(|i| input.samples[i])
                .collect(),
        ))
    }

    fn get_params(&self) -> Value {
        json!({ "step": self.step })
    }

    impl_effect_common!(Resample, "resample", "Resample");
}

// ============================================================================
// Stretch
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stretch {
    pub factor: f64,
}

impl Stretch {
    pub fn new(factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(RaveError::Transform {
                effect: "stretch".to_string(),
                reason: format!("factor must be positive, got {}", factor),
            });
        }
        Ok(Self { factor })
    }

    /// Output length for an input of length `len` (truncated)
    pub fn output_len(&self, len: usize) -> usize {
        (len as f64 * self.factor) as usize
    }

    fn interpolate(samples: &[f32], pos: f64) -> f32 {
        let last = samples.len() - 1;
        let idx = pos.floor() as usize;
        if idx >= last {
            return samples[last];
        }
        let frac = (pos - idx as f64) as f32;
        samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
    }
}

impl Effect for Stretch {
    fn process(&self, input: &Waveform) -> Result<Waveform> {
        let n = input.len();
        let m = self.output_len(n);
        if n == 0 || m == 0 {
            return Ok(input.with_samples(Vec::new()));
        }
        if m == 1 {
            return Ok(input.with_samples(vec![input.samples[0]]));
        }

        let span = (n - 1) as f64;
        let denom = (m - 1) as f64;
        let output = (0..m)
            .map(|j| Self::interpolate(&input.samples, j as f64 * span / denom))
            .collect();

        Ok(input.with_samples(output))
    }

    fn get_params(&self) -> Value {
        json!({ "factor": self.factor })
    }

    impl_effect_common!(Stretch, "stretch", "Time Stretch");
}
