//! Waveform buffer
//!
//! Mono `f32` sample storage shared by the effect engine and the neural
//! pipeline. Samples are nominally in [-1, 1]; effects may leave them
//! outside that range until the final clamp.

use crate::error::{RaveError, Result};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert linear amplitude to decibels
///
/// Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Average interleaved frames down to one channel
///
/// A trailing partial frame is dropped.
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

// ============================================================================
// Waveform
// ============================================================================

/// A mono waveform with its sample rate
///
/// # Example
///
/// ```
/// use ravefx::engine::Waveform;
///
/// let wave = Waveform::new(vec![0.0, 0.5, -0.5], 44100);
/// assert_eq!(wave.len(), 3);
/// assert_eq!(wave.peak(), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    /// Sample rate in Hz, inherited from the source file
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// All-zero waveform of the given length
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Build a waveform from signed 16-bit samples (`v / 32768`)
    pub fn from_i16(samples: &[i16], sample_rate: u32) -> Self {
        Self::new(
            samples.iter().map(|&v| v as f32 / 32768.0).collect(),
            sample_rate,
        )
    }

    /// Same sample rate, new samples
    pub fn with_samples(&self, samples: Vec<f32>) -> Self {
        Self::new(samples, self.sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Absolute peak value (0.0 for an empty waveform)
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
    }

    /// RMS level in dB, -inf for silence or empty input
    pub fn rms_db(&self) -> f32 {
        if self.samples.is_empty() {
            return f32::NEG_INFINITY;
        }
        let sum_squares: f64 = self.samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        linear_to_db((sum_squares / self.samples.len() as f64).sqrt() as f32)
    }

    /// Check that every sample is finite
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }

    /// Hard clip every sample to [-1, 1]
    pub fn clamp(&mut self) {
        for sample in &mut self.samples {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }

    /// Scale so the absolute peak equals `target`
    ///
    /// Silent waveforms are left untouched.
    pub fn normalize_peak(&mut self, target: f32) {
        let peak = self.peak();
        if peak > 0.0 {
            let gain = target / peak;
            for sample in &mut self.samples {
                *sample *= gain;
            }
        }
    }

    /// Quantize to signed 16-bit
    ///
    /// Clips to [-1, 1] first, then scales by 32768 and rounds, saturating
    /// at `i16::MAX`. A waveform built with [`Waveform::from_i16`] round-trips
    /// exactly.
    pub fn to_i16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * 32768.0).round().clamp(-32768.0, 32767.0) as i16)
            .collect()
    }

    /// Fail with `DspOverflow` if any sample is NaN or infinite
    pub fn ensure_finite(&self, effect: &str) -> Result<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(RaveError::DspOverflow {
                effect: effect.to_string(),
            })
        }
    }
}

impl Default for Waveform {
    fn default() -> Self {
        Self::new(Vec::new(), 44100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_to_db() {
        assert_relative_eq!(linear_to_db(1.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(linear_to_db(0.5), -6.0206, epsilon = 1e-3);
        assert_eq!(linear_to_db(0.0), f32::NEG_INFINITY);
    }

    #[test]
    fn test_downmix_stereo() {
        let interleaved = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&interleaved, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_mono_is_copy() {
        let samples = [0.1, 0.2];
        assert_eq!(downmix(&samples, 1), vec![0.1, 0.2]);
    }

    #[test]
    fn test_i16_round_trip_is_exact() {
        let raw: Vec<i16> = vec![i16::MIN, -12345, -1, 0, 1, 12345, i16::MAX];
        let wave = Waveform::from_i16(&raw, 8000);
        assert_eq!(wave.to_i16(), raw);
    }

    #[test]
    fn test_to_i16_clips_out_of_range() {
        let wave = Waveform::new(vec![1.7, -3.0, 1.0], 8000);
        assert_eq!(wave.to_i16(), vec![i16::MAX, i16::MIN, i16::MAX]);
    }

    #[test]
    fn test_clamp_and_peak() {
        let mut wave = Waveform::new(vec![0.2, -1.5, 2.0], 8000);
        wave.clamp();
        assert_eq!(wave.samples, vec![0.2, -1.0, 1.0]);
        assert_eq!(wave.peak(), 1.0);
    }

    #[test]
    fn test_normalize_peak_with_headroom() {
        let mut wave = Waveform::new(vec![0.25, -0.5], 48000);
        wave.normalize_peak(0.95);
        assert_relative_eq!(wave.peak(), 0.95, epsilon = 1e-6);
        assert_relative_eq!(wave.samples[0], 0.475, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_silence_is_noop() {
        let mut wave = Waveform::silence(4, 48000);
        wave.normalize_peak(0.95);
        assert!(wave.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_rms_empty() {
        assert_eq!(Waveform::default().rms_db(), f32::NEG_INFINITY);
    }

    #[test]
    fn test_ensure_finite() {
        let wave = Waveform::new(vec![0.0, f32::NAN], 8000);
        assert!(matches!(
            wave.ensure_finite("gain"),
            Err(RaveError::DspOverflow { .. })
        ));
    }
}
