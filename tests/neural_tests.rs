//! Neural pipeline tests against the mock runtime.

use std::fs;

use approx::assert_relative_eq;
use tempfile::tempdir;

use ravefx::engine::{generate_test_tone, read_pcm16, write_test_tone};
use ravefx::neural::{
    resynthesize, CallingConvention, MockConvention, MockLoader, MockModel, ModelCatalog,
    ModelLoader, NeuralPipeline, Tensor, MOCK_GAIN,
};
use ravefx::RaveError;

#[test]
fn test_probe_prefers_forward() {
    let model = MockModel::new("Jazz", MockConvention::ModernWithLatent);
    let input = Tensor::from_audio(&[0.2, -0.4, 0.6]);

    let result = resynthesize(&model, &input).unwrap();

    assert_eq!(result.convention, CallingConvention::Forward);
    assert_eq!(model.forward_calls(), 1);
    assert_eq!(model.encode_calls(), 0);
    assert_relative_eq!(result.audio.data()[2], 0.6 * MOCK_GAIN, epsilon = 1e-6);
}

#[test]
fn test_probe_falls_back_only_on_unsupported() {
    let legacy = MockModel::new("Vctk", MockConvention::Legacy);
    let input = Tensor::from_audio(&[0.5; 16]);
    let result = resynthesize(&legacy, &input).unwrap();
    assert_eq!(result.convention, CallingConvention::EncodeDecode);
    assert_eq!(legacy.forward_calls(), 1);
    assert_eq!(legacy.decode_calls(), 1);

    let broken = MockModel::new("Broken", MockConvention::Broken);
    let err = resynthesize(&broken, &input).unwrap_err();
    assert!(matches!(err, RaveError::InferenceFailed { .. }));
    assert_eq!(broken.encode_calls(), 0);
}

#[test]
fn test_loader_requires_checkpoint_file() {
    let dir = tempdir().unwrap();
    let loader = MockLoader::new(MockConvention::Modern);
    assert!(matches!(
        loader.load(&dir.path().join("Jazz.ts")),
        Err(RaveError::ModelNotFound { .. })
    ));
}

#[test]
fn test_catalog_checkpoint_through_pipeline() {
    let dir = tempdir().unwrap();
    let models_dir = dir.path().join("models");
    fs::create_dir_all(&models_dir).unwrap();
    fs::write(models_dir.join("Darbouka.ts"), b"graph").unwrap();

    let input = dir.path().join("beat.wav");
    let output = dir.path().join("beat_rave.wav");
    // 44.1 kHz input gets resampled to the model rate
    write_test_tone(&input, &generate_test_tone(220.0, 0.5, 44100, 0.25)).unwrap();

    let checkpoint = ModelCatalog::with_defaults()
        .checkpoint_path(&models_dir, "darbouka")
        .unwrap();
    let pipeline = NeuralPipeline::new(MockLoader::new(MockConvention::Modern));
    let report = pipeline.run(&input, &output, &checkpoint).unwrap();

    assert_eq!(report.model, "Darbouka");
    assert_eq!(report.sample_rate, 48000);
    assert!((report.input_samples as i64 - 24000).abs() <= 1);

    let (samples, spec) = read_pcm16(&output).unwrap();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(samples.len(), report.output_samples);
}
