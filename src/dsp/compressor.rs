//! Square-root compressor
//!
//! `y = sign(x) * sqrt(|x|)`: quiet samples are lifted more than loud ones,
//! which flattens the dynamic range without any envelope state. Magnitudes
//! within [0, 1] stay within [0, 1].

use crate::dsp::effect::{map_samples, Effect};
use crate::engine::Waveform;
use crate::error::Result;
use crate::impl_effect_common;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootCompressor;

impl RootCompressor {
    #[inline]
    pub fn shape(x: f32) -> f32 {
        if x == 0.0 {
            0.0
        } else {
            x.signum() * x.abs().sqrt()
        }
    }
}

impl Effect for RootCompressor {
    fn process(&self, input: &Waveform) -> Result<Waveform> {
        Ok(map_samples(input, Self::shape))
    }

    fn get_params(&self) -> Value {
        json!({ "curve": "sqrt" })
    }

    impl_effect_common!(RootCompressor, "compressor", "Root Compressor");
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shape_is_odd() {
        assert_relative_eq!(RootCompressor::shape(0.25), 0.5);
        assert_relative_eq!(RootCompressor::shape(-0.25), -0.5);
        assert_eq!(RootCompressor::shape(0.0), 0.0);
        assert_eq!(RootCompressor::shape(1.0), 1.0);
    }

    #[test]
    fn test_lifts_quiet_samples() {
        let out = RootCompressor
            .process(&Waveform::new(vec![0.04, 0.81], 8000))
            .unwrap();
        assert_relative_eq!(out.samples[0], 0.2, epsilon = 1e-6);
        assert_relative_eq!(out.samples[1], 0.9, epsilon = 1e-6);
    }
}
