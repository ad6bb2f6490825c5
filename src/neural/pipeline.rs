//! Offline neural resynthesis
//!
//! load checkpoint -> load audio (mono, 48 kHz, peak 1.0) -> resynthesize ->
//! save (peak 0.95, 16-bit PCM).

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use super::model::{resynthesize, CallingConvention, ModelLoader};
use super::tensor::Tensor;
use crate::config::NEURAL_SAMPLE_RATE;
use crate::engine::io::{encode_mono, read_as_f32, resample_linear, PcmSpec};
use crate::engine::{downmix, Waveform};
use crate::error::Result;

/// Peak level of saved output, leaving a little headroom
pub const OUTPUT_PEAK: f32 = 0.95;

/// Summary of one neural run
#[derive(Debug, Clone, Serialize)]
pub struct NeuralReport {
    pub model: String,
    pub convention: CallingConvention,
    pub input_samples: usize,
    pub output_samples: usize,
    pub sample_rate: u32,
    pub elapsed_ms: u64,
}

/// Runs checkpoints through a [`ModelLoader`]
pub struct NeuralPipeline<L: ModelLoader> {
    loader: L,
    sample_rate: u32,
}

impl<L: ModelLoader> NeuralPipeline<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            sample_rate: NEURAL_SAMPLE_RATE,
        }
    }

    /// Override the model sample rate (default 48 kHz)
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Load any WAV as mono at the model rate, peak-normalized to 1.0
    pub fn load_audio(&self, path: &Path) -> Result<Waveform> {
        let (interleaved, spec) = read_as_f32(path)?;
        debug!(
            "loaded {}: {} Hz, {} channels",
            path.display(),
            spec.sample_rate,
            spec.channels
        );

        let mono = downmix(&interleaved, spec.channels as usize);
        let resampled = resample_linear(&mono, spec.sample_rate, self.sample_rate);

        let mut waveform = Waveform::new(resampled, self.sample_rate);
        waveform.normalize_peak(1.0);
        Ok(waveform)
    }

    /// Save with `OUTPUT_PEAK` headroom as mono 16-bit PCM
    pub fn save_audio(&self, waveform: &Waveform, path: &Path) -> Result<PcmSpec> {
        let mut output = waveform.clone();
        output.normalize_peak(OUTPUT_PEAK);

        let spec = PcmSpec {
            frames: output.len() as u32,
            ..PcmSpec::mono16(output.sample_rate)
        };
        encode_mono(path, &output, &spec)?;
        Ok(spec)
    }

    /// Resynthesize `input` with the checkpoint at `model_path`
    pub fn run(&self, input: &Path, output: &Path, model_path: &Path) -> Result<NeuralReport> {
        let start = Instant::now();

        info!("loading model {}", model_path.display());
        let model = self.loader.load(model_path)?;

        let waveform = self.load_audio(input)?;
        let result = resynthesize(model.as_ref(), &Tensor::from_audio(&waveform.samples))?;

        let samples = result.audio.squeeze_batch().into_mono();
        let resynthesized = Waveform::new(samples, self.sample_rate);
        self.save_audio(&resynthesized, output)?;

        info!(
            "resynthesized {} -> {} samples via {:?}",
            waveform.len(),
            resynthesized.len(),
            result.convention
        );

        Ok(NeuralReport {
            model: model.name().to_string(),
            convention: result.convention,
            input_samples: waveform.len(),
            output_samples: resynthesized.len(),
            sample_rate: self.sample_rate,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}
