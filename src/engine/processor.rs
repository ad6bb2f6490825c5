//! File-level demo processing
//!
//! Decodes a mono 16-bit WAV, applies the effect selected by the model name
//! and writes the result with the source header. If any step fails the
//! input file is copied to the output unchanged: callers always get a
//! playable file back.

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::dsp::EffectKind;
use crate::engine::io::{decode_mono, encode_mono};
use crate::error::{ErrorStage, Result};

/// What ended up in the output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProcessOutcome {
    /// The transformed waveform was written
    Transformed {
        input_samples: usize,
        output_samples: usize,
    },
    /// The input was copied byte-for-byte after a failure
    FallbackCopy {
        stage: ErrorStage,
        error_code: String,
        reason: String,
        suggestions: Vec<String>,
    },
}

/// Summary of one processed file
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub model: String,
    pub kind: EffectKind,
    #[serde(flatten)]
    pub outcome: ProcessOutcome,
    pub elapsed_ms: u64,
    /// Hex SHA-256 of the written output file
    pub output_sha256: String,
}

impl ProcessReport {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ProcessOutcome::FallbackCopy { .. })
    }
}

/// Transform `input` into `output` with the effect selected by `model`
///
/// Decode, transform and encode failures are absorbed by copying the input.
/// Only a failure of the copy itself (or of hashing the output) is returned.
pub fn process_file(input: &Path, output: &Path, model: &str) -> Result<ProcessReport> {
    let start = Instant::now();
    let kind = EffectKind::resolve(model);
    info!("Effect: {} ({}) for model '{}'", kind, kind.description(), model);

    let outcome = match transform_file(input, output, kind) {
        Ok((input_samples, output_samples)) => {
            info!(
                "Effect applied: {} -> {} samples",
                input_samples, output_samples
            );
            ProcessOutcome::Transformed {
                input_samples,
                output_samples,
            }
        }
        Err(err) => {
            warn!(
                "Effect '{}' failed at {:?} on {}: {} - copying input unchanged",
                kind,
                err.stage(),
                input.display(),
                err
            );
            fs::copy(input, output)?;
            ProcessOutcome::FallbackCopy {
                stage: err.stage(),
                error_code: err.error_code().to_string(),
                reason: err.to_string(),
                suggestions: err
                    .recovery_suggestions()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }
        }
    };

    let output_sha256 = sha256_file(output)?;
    debug!("Wrote {} (sha256 {})", output.display(), output_sha256);

    Ok(ProcessReport {
        model: model.to_string(),
        kind,
        outcome,
        elapsed_ms: start.elapsed().as_millis() as u64,
        output_sha256,
    })
}

/// Model name for a checkpoint path: its file stem
///
/// `models/Jazz.ts` becomes `Jazz`; a bare name is returned as-is.
pub fn model_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Hex SHA-256 digest of a file's contents
pub fn sha256_file(path: &Path) -> Result<String> {
    let content = fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&content)))
}

fn transform_file(input: &Path, output: &Path, kind: EffectKind) -> Result<(usize, usize)> {
    let (waveform, spec) = decode_mono(input)?;
    debug!(
        "Decoded {}: {} frames at {} Hz",
        input.display(),
        spec.frames,
        spec.sample_rate
    );

    let transformed = kind.apply(&waveform)?;
    encode_mono(output, &transformed, &spec)?;

    Ok((waveform.len(), transformed.len()))
}
