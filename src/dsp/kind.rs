//! Effect selection
//!
//! Every demo model maps to one [`EffectKind`]. The kind is resolved once
//! from the free-text model name and then drives the whole transform.
//!
//! Resolution is a case-insensitive substring match against a fixed token
//! table. When a name contains tokens of several kinds, the first row of
//! [`SELECTOR_TOKENS`] that matches wins, so `"jazz darbouka"` is Jazz.

use serde::{Deserialize, Serialize};

use super::{
    EffectChain, Echo, NoiseGate, Resample, RootCompressor, SoftClip, Stretch, CATS_STEP,
    DOGS_FACTOR, SPEECH_STEP,
};
use crate::engine::Waveform;
use crate::error::Result;

/// The closed set of demo transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Soft clipping followed by a 50 ms echo
    Jazz,
    /// Sub-sampling at step 1.2 (faster, higher)
    Speech,
    /// Noise gate followed by square-root compression
    Darbouka,
    /// Sub-sampling at step 0.7 (slower, lower)
    Cats,
    /// Linear-interpolation stretch to 1.5x length
    Dogs,
    /// Pass-through
    Identity,
}

/// Selector tokens in precedence order
pub const SELECTOR_TOKENS: &[(&str, EffectKind)] = &[
    ("jazz", EffectKind::Jazz),
    ("parole", EffectKind::Speech),
    ("vctk", EffectKind::Speech),
    ("darbouka", EffectKind::Darbouka),
    ("chat", EffectKind::Cats),
    ("cats", EffectKind::Cats),
    ("chien", EffectKind::Dogs),
    ("dogs", EffectKind::Dogs),
];

impl EffectKind {
    /// Resolve a model name to an effect kind
    pub fn resolve(selector: &str) -> Self {
        let name = selector.to_lowercase();
        SELECTOR_TOKENS
            .iter()
            .find(|(token, _)| name.contains(token))
            .map(|&(_, kind)| kind)
            .unwrap_or(EffectKind::Identity)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Jazz => "jazz",
            EffectKind::Speech => "speech",
            EffectKind::Darbouka => "darbouka",
            EffectKind::Cats => "cats",
            EffectKind::Dogs => "dogs",
            EffectKind::Identity => "identity",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EffectKind::Jazz => "Soft clipping with a short echo",
            EffectKind::Speech => "Pitch up by sub-sampling",
            EffectKind::Darbouka => "Noise gate with square-root compression",
            EffectKind::Cats => "Pitch down by sub-sampling",
            EffectKind::Dogs => "Time stretch to 1.5x length",
            EffectKind::Identity => "No transformation",
        }
    }

    /// Build the effect chain for this kind
    pub fn chain(&self) -> Result<EffectChain> {
        let chain = EffectChain::new();
        Ok(match self {
            EffectKind::Jazz => chain.with(SoftClip::default()).with(Echo::default()),
            EffectKind::Speech => chain.with(Resample::new(SPEECH_STEP)?),
            EffectKind::Darbouka => chain.with(NoiseGate::default()).with(RootCompressor),
            EffectKind::Cats => chain.with(Resample::new(CATS_STEP)?),
            EffectKind::Dogs => chain.with(Stretch::new(DOGS_FACTOR)?),
            EffectKind::Identity => chain,
        })
    }

    /// Transform a waveform and clip the result to [-1, 1]
    pub fn apply(&self, waveform: &Waveform) -> Result<Waveform> {
        let mut output = self.chain()?.process(waveform)?;
        output.clamp();
        Ok(output)
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Resolve `selector` and apply the matching transform
///
/// The output is clipped to [-1, 1] and ready for 16-bit quantization.
pub fn apply_effect(waveform: &Waveform, selector: &str) -> Result<Waveform> {
    EffectKind::resolve(selector).apply(waveform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case("Jazz", EffectKind::Jazz)]
    #[test_case("JAZZ.ts", EffectKind::Jazz)]
    #[test_case("Parole", EffectKind::Speech)]
    #[test_case("Vctk", EffectKind::Speech)]
    #[test_case("Darbouka", EffectKind::Darbouka)]
    #[test_case("Chats", EffectKind::Cats)]
    #[test_case("cats_v2", EffectKind::Cats)]
    #[test_case("Chiens", EffectKind::Dogs)]
    #[test_case("DOGS", EffectKind::Dogs)]
    #[test_case("vintage", EffectKind::Identity)]
    #[test_case("", EffectKind::Identity)]
    fn test_resolve(selector: &str, expected: EffectKind) {
        assert_eq!(EffectKind::resolve(selector), expected);
    }

    #[test]
    fn test_precedence_is_table_order() {
        assert_eq!(EffectKind::resolve("darbouka-jazz"), EffectKind::Jazz);
        assert_eq!(EffectKind::resolve("chiens et chats"), EffectKind::Cats);
        assert_eq!(EffectKind::resolve("vctk darbouka"), EffectKind::Speech);
    }

    #[test]
    fn test_identity_has_empty_chain() {
        assert!(EffectKind::Identity.chain().unwrap().is_empty());
        assert_eq!(EffectKind::Jazz.chain().unwrap().len(), 2);
    }

    #[test]
    fn test_jazz_echo_reads_saturated_signal() {
        // 40 Hz puts the echo tap at 2 samples
        let wave = Waveform::new(vec![0.5, 0.0, 0.0, 0.0], 40);
        let out = apply_effect(&wave, "Jazz").unwrap();

        let saturated = (0.75_f32).tanh() * 0.8;
        assert_relative_eq!(out.samples[0], saturated, epsilon = 1e-6);
        assert_eq!(out.samples[1], 0.0);
        assert_relative_eq!(out.samples[2], 0.3 * saturated, epsilon = 1e-6);
        // an echo of the raw input would be 0.15
        assert!((out.samples[2] - 0.15).abs() > 1e-3);
        assert_eq!(out.samples[3], 0.0);
    }

    #[test]
    fn test_identity_returns_input() {
        let wave = Waveform::new(vec![0.5, -0.25, 0.0], 8000);
        assert_eq!(apply_effect(&wave, "unknown").unwrap(), wave);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&EffectKind::Dogs).unwrap(), "\"dogs\"");
        assert_eq!(EffectKind::Speech.to_string(), "speech");
    }
}
