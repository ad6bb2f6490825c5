//! Effect trait definition
//!
//! Effects are whole-buffer transforms: each one takes a waveform and
//! returns a new one, possibly of a different length.

use crate::engine::Waveform;
use crate::error::Result;
use serde_json::Value;

/// Base trait for all demo effects
pub trait Effect: Send + Sync {
    /// Transform a whole waveform
    fn process(&self, input: &Waveform) -> Result<Waveform>;

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str;

    /// Get human-readable display name
    fn display_name(&self) -> &str;

    /// Get all parameters as JSON
    fn get_params(&self) -> Value;

    /// Clone the effect into a boxed trait object
    fn box_clone(&self) -> Box<dyn Effect>;
}

impl Clone for Box<dyn Effect> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

impl std::fmt::Debug for dyn Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("type", &self.effect_type())
            .field("params", &self.get_params())
            .finish()
    }
}

/// Helper macro to implement common Effect trait methods
#[macro_export]
macro_rules! impl_effect_common {
    ($type:ty, $effect_type:expr, $display_name:expr) => {
        fn effect_type(&self) -> &'static str {
            $effect_type
        }

        fn display_name(&self) -> &str {
            $display_name
        }

        fn box_clone(&self) -> Box<dyn Effect> {
            Box::new(self.clone())
        }
    };
}

/// Apply a per-sample function, keeping the sample rate
pub(crate) fn map_samples(input: &Waveform, f: impl Fn(f32) -> f32) -> Waveform {
    input.with_samples(input.samples.iter().map(|&x| f(x)).collect())
}
