//! Demo effects engine
//!
//! Small whole-buffer transforms selected by model name. All effects
//! implement the `Effect` trait and are composed with `EffectChain`;
//! `EffectKind` maps a model name to its chain.

mod chain;
mod compressor;
mod delay;
mod effect;
mod gate;
mod kind;
mod resample;
mod saturation;

pub use chain::EffectChain;
pub use compressor::RootCompressor;
pub use delay::{Echo, JAZZ_DELAY_SECS, JAZZ_ECHO_GAIN};
pub use effect::Effect;
pub use gate::{NoiseGate, DARBOUKA_THRESHOLD};
pub use kind::{apply_effect, EffectKind, SELECTOR_TOKENS};
pub use resample::{Resample, Stretch, CATS_STEP, DOGS_FACTOR, SPEECH_STEP};
pub use saturation::{SoftClip, JAZZ_DRIVE, JAZZ_LEVEL};
