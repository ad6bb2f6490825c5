//! Effect chain
//!
//! Effects run in insertion order (index 0 first), each one consuming the
//! previous output. Any effect that produces NaN or infinite samples stops
//! the chain with `DspOverflow`.

use super::Effect;
use crate::engine::Waveform;
use crate::error::Result;

/// Ordered list of effects applied to one waveform
#[derive(Clone, Default)]
pub struct EffectChain {
    effects: Vec<Box<dyn Effect>>,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Builder-style append
    pub fn with(mut self, effect: impl Effect + 'static) -> Self {
        self.effects.push(Box::new(effect));
        self
    }

    /// Process the entire chain
    pub fn process(&self, input: &Waveform) -> Result<Waveform> {
        let mut current = input.clone();
        for effect in &self.effects {
            current = effect.process(&current)?;
            current.ensure_finite(effect.effect_type())?;
        }
        Ok(current)
    }

    /// Get the number of effects in the chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Describe the chain as JSON
    pub fn to_json(&self) -> serde_json::Value {
        let effects: Vec<serde_json::Value> = self
            .effects
            .iter()
            .map(|e| {
                serde_json::json!({
                    "type": e.effect_type(),
                    "name": e.display_name(),
                    "params": e.get_params(),
                })
            })
            .collect();

        serde_json::json!({ "effects": effects })
    }
}

impl std::fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.effects.iter().map(|e| e.effect_type()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{Echo, NoiseGate, RootCompressor, SoftClip};
    use crate::error::RaveError;
    use crate::impl_effect_common;
    use serde_json::{json, Value};

    #[derive(Clone)]
    struct Explode;

    impl Effect for Explode {
        fn process(&self, input: &Waveform) -> Result<Waveform> {
            Ok(input.with_samples(vec![f32::INFINITY; input.len()]))
        }

        fn get_params(&self) -> Value {
            json!({})
        }

        impl_effect_common!(Explode, "explode", "Explode");
    }

    #[test]
    fn test_chain_new() {
        let chain = EffectChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_empty_chain_passthrough() {
        let wave = Waveform::new(vec![0.1, -0.2, 0.3], 8000);
        assert_eq!(EffectChain::new().process(&wave).unwrap(), wave);
    }

    #[test]
    fn test_chain_runs_in_order() {
        // gate first zeroes 0.09, then sqrt lifts 0.25 to 0.5
        let chain = EffectChain::new()
            .with(NoiseGate::default())
            .with(RootCompressor);
        let out = chain
            .process(&Waveform::new(vec![0.09, 0.25], 8000))
            .unwrap();
        assert_eq!(out.samples, vec![0.0, 0.5]);
    }

    #[test]
    fn test_non_finite_output_is_rejected() {
        let chain = EffectChain::new().with(SoftClip::default()).with(Explode);
        match chain.process(&Waveform::new(vec![0.5], 8000)) {
            Err(RaveError::DspOverflow { effect }) => assert_eq!(effect, "explode"),
            other => panic!("Expected DspOverflow, got: {:?}", other),
        }
    }

    #[test]
    fn test_to_json_lists_effects() {
        let chain = EffectChain::new()
            .with(SoftClip::default())
            .with(Echo::default());
        let json = chain.to_json();
        assert_eq!(json["effects"][0]["type"], "saturation");
        assert_eq!(json["effects"][1]["type"], "delay");
        assert_eq!(json["effects"][1]["params"]["gain"], json!(0.3_f32));
    }
}
