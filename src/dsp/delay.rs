//! Single-tap echo
//!
//! Adds one attenuated, delayed copy of the input on top of itself. There is
//! no feedback path: the delayed copy is read from the unprocessed input.

use crate::dsp::effect::Effect;
use crate::engine::Waveform;
use crate::error::{RaveError, Result};
use crate::impl_effect_common;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Echo delay used by the jazz model (50 ms)
pub const JAZZ_DELAY_SECS: f64 = 0.05;

/// Echo gain used by the jazz model
pub const JAZZ_ECHO_GAIN: f32 = 0.3;

/// Feed-forward echo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub delay_secs: f64,
    pub gain: f32,
}

impl Echo {
    pub fn new(delay_secs: f64, gain: f32) -> Result<Self> {
        if !delay_secs.is_finite() || delay_secs < 0.0 {
            return Err(RaveError::Transform {
                effect: "delay".to_string(),
                reason: format!("delay must be non-negative, got {}s", delay_secs),
            });
        }
        if !gain.is_finite() {
            return Err(RaveError::Transform {
                effect: "delay".to_string(),
                reason: format!("gain must be finite, got {}", gain),
            });
        }
        Ok(Self { delay_secs, gain })
    }

    /// Delay length in samples at the given rate
    pub fn delay_samples(&self, sample_rate: u32) -> usize {
        (self.delay_secs * sample_rate as f64).round() as usize
    }
}

impl Default for Echo {
    fn default() -> Self {
        Self {
            delay_secs: JAZZ_DELAY_SECS,
            gain: JAZZ_ECHO_GAIN,
        }
    }
}

impl Effect for Echo {
    fn process(&self, input: &Waveform) -> Result<Waveform> {
        let delay = self.delay_samples(input.sample_rate);
        let mut output = input.samples.clone();

        // Inputs no longer than the delay pass through untouched
        if input.len() > delay {
            for (out, &dry) in output[delay..].iter_mut().zip(&input.samples) {
                *out += self.gain * dry;
            }
        }

        Ok(input.with_samples(output))
    }

    fn get_params(&self) -> Value {
        json!({ "delay_secs": self.delay_secs, "gain": self.gain })
    }

    impl_effect_common!(Echo, "delay", "Echo");
}
