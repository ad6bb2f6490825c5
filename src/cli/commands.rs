//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::Config;
use crate::engine::{
    generate_test_tone, model_name_from_path, process_file, write_test_tone, ProcessOutcome,
};
use crate::neural::{
    discover_checkpoints, MockConvention, MockLoader, ModelCatalog, NeuralPipeline,
};
use crate::service::DemoService;

/// Amplitude of generated test tones
pub const TONE_AMPLITUDE: f32 = 0.5;

/// Apply the demo effect selected by `model`.
pub fn apply(input: &Path, output: &Path, model: &Path) -> Result<()> {
    let model_name = model_name_from_path(model);
    info!("Applying '{}' to {}", model_name, input.display());

    let report = process_file(input, output, &model_name)
        .with_context(|| format!("failed to process {}", input.display()))?;

    match &report.outcome {
        ProcessOutcome::Transformed {
            input_samples,
            output_samples,
        } => {
            println!(
                "Applied {} ({}): {} -> {} samples",
                report.kind,
                report.kind.description(),
                input_samples,
                output_samples
            );
        }
        ProcessOutcome::FallbackCopy {
            error_code,
            reason,
            suggestions,
            ..
        } => {
            warn!("Fallback copy [{}]: {}", error_code, reason);
            println!("Effect failed, copied input unchanged ({})", error_code);
            for suggestion in suggestions {
                println!("  - {}", suggestion);
            }
        }
    }
    println!("Output: {} (sha256 {})", output.display(), report.output_sha256);

    Ok(())
}

/// Resynthesize through the mock runtime.
pub fn infer(input: &Path, output: &Path, model: &Path, mock: MockConvention) -> Result<()> {
    info!("Running {} with {:?} runtime", model.display(), mock);

    let config = Config::from_env();
    let pipeline =
        NeuralPipeline::new(MockLoader::new(mock)).with_sample_rate(config.neural_sample_rate);
    let report = pipeline
        .run(input, output, model)
        .with_context(|| format!("inference with {} failed", model.display()))?;

    println!(
        "{}: {} -> {} samples at {} Hz via {:?} ({} ms)",
        report.model,
        report.input_samples,
        report.output_samples,
        report.sample_rate,
        report.convention,
        report.elapsed_ms
    );
    println!("Output: {}", output.display());

    Ok(())
}

/// Print the catalog and installed checkpoints.
pub fn models(dir: Option<&Path>) -> Result<()> {
    let config = Config::from_env();
    let models_dir = dir.unwrap_or(config.models_dir.as_path());
    let catalog = ModelCatalog::with_defaults();

    println!("Catalog:");
    for entry in catalog.entries() {
        let upstream = entry.upstream.unwrap_or("-");
        println!(
            "  {:<10} {:<12} effect={:<9} upstream={}",
            entry.name,
            entry.checkpoint,
            entry.effect(),
            upstream
        );
    }

    let installed = discover_checkpoints(models_dir)
        .with_context(|| format!("cannot scan {}", models_dir.display()))?;

    println!("\nInstalled in {}:", models_dir.display());
    if installed.is_empty() {
        println!("  (none)");
    }
    for model in &installed {
        println!(
            "  {:<10} {:.1} MB",
            model.name,
            model.size_bytes as f64 / (1024.0 * 1024.0)
        );
    }

    Ok(())
}

/// Write a test tone.
pub fn tone(output: &Path, freq: f32, secs: f32, rate: u32) -> Result<()> {
    info!("Writing {} Hz tone ({} s @ {} Hz)", freq, secs, rate);

    let waveform = generate_test_tone(freq, secs, rate, TONE_AMPLITUDE);
    let spec = write_test_tone(output, &waveform)
        .with_context(|| format!("cannot write {}", output.display()))?;

    println!("Wrote {} ({} frames)", output.display(), spec.frames);

    Ok(())
}

/// Run a service clean pass over the configured directories.
pub fn clean() -> Result<()> {
    let service = DemoService::new(Config::from_env()).context("cannot prepare directories")?;
    let response = service.clean().context("clean failed")?;

    println!("{}", response.msg);

    Ok(())
}
