//! ravefx - demo timbre effects and neural resynthesis
//!
//! ravefx turns an uploaded recording into a "transformed" one:
//! 1. Demo effects - a deterministic DSP stand-in per model name (jazz
//!    saturation and echo, sped-up speech, gated percussion, pitched cats
//!    and slowed dogs)
//! 2. Neural resynthesis - encode/decode through an external inference
//!    runtime, with a forward-then-legacy calling-convention probe
//!
//! # Architecture
//!
//! - `engine`: WAV decode/encode and the never-fail file processor
//! - `dsp`: effect primitives, chains and the model-to-effect selector
//! - `neural`: inference traits, catalog and offline pipeline
//! - `service`: upload/status/download handlers for a web front end

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod neural;
pub mod service;

pub use error::{RaveError, Result};
