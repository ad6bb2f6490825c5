//! Soft-clip saturation
//!
//! `y = tanh(x * drive) * level`. Peaks are compressed smoothly and the
//! output can never exceed `level` in magnitude.

use crate::dsp::effect::{map_samples, Effect};
use crate::engine::Waveform;
use crate::error::{RaveError, Result};
use crate::impl_effect_common;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Drive used by the jazz model
pub const JAZZ_DRIVE: f32 = 1.5;

/// Output level used by the jazz model
pub const JAZZ_LEVEL: f32 = 0.8;

/// Hyperbolic tangent waveshaper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftClip {
    /// Input gain before the waveshaper
    pub drive: f32,
    /// Output gain after the waveshaper
    pub level: f32,
}

impl SoftClip {
    pub fn new(drive: f32, level: f32) -> Result<Self> {
        if !drive.is_finite() || drive <= 0.0 {
            return Err(RaveError::Transform {
                effect: "saturation".to_string(),
                reason: format!("drive must be positive, got {}", drive),
            });
        }
        if !level.is_finite() {
            return Err(RaveError::Transform {
                effect: "saturation".to_string(),
                reason: format!("level must be finite, got {}", level),
            });
        }
        Ok(Self { drive, level })
    }

    #[inline]
    pub fn shape(&self, x: f32) -> f32 {
        (x * self.drive).tanh() * self.level
    }
}

impl Default for SoftClip {
    fn default() -> Self {
        Self {
            drive: JAZZ_DRIVE,
            level: JAZZ_LEVEL,
        }
    }
}

impl Effect for SoftClip {
    fn process(&self, input: &Waveform) -> Result<Waveform> {
        Ok(map_samples(input, |x| self.shape(x)))
    }

    fn get_params(&self) -> Value {
        json!({ "drive": self.drive, "level": self.level })
    }

    impl_effect_common!(SoftClip, "saturation", "Soft Clip");
}
