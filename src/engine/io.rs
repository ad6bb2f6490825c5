//! Audio file I/O for RaveFX
//!
//! The demo path reads and writes 16-bit PCM WAV, keeping the source header
//! parameters so the output matches the input container. The neural path
//! accepts any PCM or float WAV and converts it to `f32`.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use serde::Serialize;

use crate::engine::buffer::Waveform;
use crate::error::{RaveError, Result};

/// Header parameters of a PCM container
///
/// `frames` is informational on write: the writer derives the frame count
/// from the samples it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PcmSpec {
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_rate: u32,
    pub frames: u32,
}

impl PcmSpec {
    /// Mono 16-bit parameters at the given rate
    pub fn mono16(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            bits_per_sample: 16,
            sample_rate,
            frames: 0,
        }
    }

    fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }
}

// ============================================================================
// 16-bit PCM (demo path)
// ============================================================================

/// Read interleaved 16-bit samples and the container parameters
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `Decode` - If the header or sample data is malformed
/// * `UnsupportedFormat` - If the file is not 16-bit integer PCM
pub fn read_pcm16(path: &Path) -> Result<(Vec<i16>, PcmSpec)> {
    let reader = open_reader(path)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(RaveError::UnsupportedFormat {
            format: format!(
                "{}-bit {:?} audio (only 16-bit PCM supported)",
                spec.bits_per_sample, spec.sample_format
            ),
        });
    }

    let frames = reader.duration();
    let samples = reader
        .into_samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, _>>()
        .map_err(|e| RaveError::decode("Failed to read 16-bit samples", e))?;

    Ok((
        samples,
        PcmSpec {
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            sample_rate: spec.sample_rate,
            frames,
        },
    ))
}

/// Write interleaved 16-bit samples with the given container parameters
pub fn write_pcm16(path: &Path, samples: &[i16], spec: &PcmSpec) -> Result<()> {
    let mut writer = WavWriter::create(path, spec.wav_spec())
        .map_err(|e| RaveError::encode(format!("Failed to create {}", path.display()), e))?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| RaveError::encode("Failed to write sample", e))?;
    }

    writer
        .finalize()
        .map_err(|e| RaveError::encode("Failed to finalize WAV", e))
}

/// Decode a mono 16-bit WAV into a normalized waveform
///
/// Multi-channel input is rejected with `UnsupportedChannelLayout`.
pub fn decode_mono(path: &Path) -> Result<(Waveform, PcmSpec)> {
    let (samples, spec) = read_pcm16(path)?;
    if spec.channels != 1 {
        return Err(RaveError::UnsupportedChannelLayout {
            channels: spec.channels,
        });
    }
    Ok((Waveform::from_i16(&samples, spec.sample_rate), spec))
}

/// Encode a waveform with the source container parameters
pub fn encode_mono(path: &Path, waveform: &Waveform, spec: &PcmSpec) -> Result<()> {
    write_pcm16(path, &waveform.to_i16(), spec)
}

// ============================================================================
// Generic decode (neural path)
// ============================================================================

/// Read any supported WAV as interleaved `f32` plus its spec
pub fn read_as_f32(path: &Path) -> Result<(Vec<f32>, WavSpec)> {
    let reader = open_reader(path)?;
    let spec = reader.spec();
    let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    Ok((samples, spec))
}

/// Resample with linear interpolation
///
/// TODO: replace with a windowed sinc resampler; linear interpolation aliases
/// when downsampling.
pub fn resample_linear(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if samples.is_empty() || source_rate == target_rate || source_rate == 0 {
        return samples.to_vec();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).ceil() as usize;

    (0..target_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let src_idx = src_pos.floor() as usize;
            let frac = (src_pos - src_idx as f64) as f32;

            if src_idx + 1 < source_len {
                samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
            } else if src_idx < source_len {
                samples[src_idx]
            } else {
                0.0
            }
        })
        .collect()
}

// ============================================================================
// Test tones
// ============================================================================

/// Generate a mono sine tone
pub fn generate_test_tone(
    frequency: f32,
    duration_secs: f32,
    sample_rate: u32,
    amplitude: f32,
) -> Waveform {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;

    Waveform::new(
        (0..num_samples)
            .map(|i| amplitude * (angular_freq * i as f32).sin())
            .collect(),
        sample_rate,
    )
}

/// Write a tone as mono 16-bit PCM
pub fn write_test_tone(path: &Path, tone: &Waveform) -> Result<PcmSpec> {
    let spec = PcmSpec {
        frames: tone.len() as u32,
        ..PcmSpec::mono16(tone.sample_rate)
    };
    encode_mono(path, tone, &spec)?;
    Ok(spec)
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn open_reader(path: &Path) -> Result<WavReader<std::io::BufReader<std::fs::File>>> {
    if !path.exists() {
        return Err(RaveError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    WavReader::open(path).map_err(|e| RaveError::decode("Failed to open WAV file", e))
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| RaveError::decode("Failed to read float samples", e)),
        SampleFormat::Int => {
            let scale = match bits_per_sample {
                8 => 128.0,
                16 => 32768.0,
                24 => 8388608.0,
                32 => 2147483648.0,
                _ => {
                    return Err(RaveError::UnsupportedFormat {
                        format: format!("{}-bit integer audio", bits_per_sample),
                    })
                }
            };
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| {
                    RaveError::decode(format!("Failed to read {}-bit samples", bits_per_sample), e)
                })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
