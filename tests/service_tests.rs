//! Service Tests
//!
//! Request handling over real upload/output directories.

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::{tempdir, TempDir};

use ravefx::config::Config;
use ravefx::dsp::EffectKind;
use ravefx::engine::{generate_test_tone, write_test_tone};
use ravefx::service::{DemoService, ServiceError, StatusKind, UploadPart};

fn setup() -> (TempDir, DemoService) {
    let dir = tempdir().unwrap();
    let service = DemoService::new(Config::with_base_dir(dir.path())).unwrap();
    (dir, service)
}

fn tone_bytes(dir: &TempDir) -> Vec<u8> {
    let path = dir.path().join("tone.wav");
    write_test_tone(&path, &generate_test_tone(440.0, 0.25, 22050, 0.5)).unwrap();
    fs::read(path).unwrap()
}

fn touch_output(service: &DemoService, name: &str, age_secs: u64) {
    let path = service.config().output_dir.join(name);
    fs::write(&path, b"RIFF").unwrap();
    let mtime = SystemTime::now() - Duration::from_secs(age_secs);
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

#[test]
fn test_root_and_models() {
    let (_dir, service) = setup();
    assert!(service.root().contains("success"));
    assert_eq!(
        service.list_models(),
        vec!["Jazz", "Parole", "Darbouka", "Chats", "Chiens"]
    );
}

#[test]
fn test_upload_with_selected_model() {
    let (dir, service) = setup();
    service.select_model("Darbouka");

    let response = service
        .upload(&[UploadPart::new("file", "take.wav", tone_bytes(&dir))], None)
        .unwrap();

    assert_eq!(response.status, "ok");
    assert_eq!(response.model, "Darbouka");
    assert_eq!(response.effect, EffectKind::Darbouka);
    assert!(!response.fallback);

    let status = service.status(&response.process_id);
    assert_eq!(status.status, StatusKind::Completed);
    assert_eq!(status.progress, Some(100));
}

#[test]
fn test_upload_fallback_still_answers_ok() {
    let (_dir, service) = setup();
    let bytes = b"not audio at all".to_vec();

    let response = service
        .upload(&[UploadPart::new("audio", "junk.wav", bytes.clone())], Some("Jazz"))
        .unwrap();

    assert_eq!(response.status, "ok");
    assert!(response.fallback);
    assert!(!response.suggestions.is_empty());
    let output = service.config().output_dir.join(&response.output_file);
    assert_eq!(fs::read(output).unwrap(), bytes);
}

#[test]
fn test_upload_without_parts_is_bad_request() {
    let (_dir, service) = setup();
    let err = service.upload(&[], None).unwrap_err();

    assert!(matches!(err, ServiceError::NoFile));
    assert_eq!(err.status_code(), 400);
    assert_eq!(
        err.to_json(),
        json!({ "status": "error", "msg": "No audio file found in request" })
    );
}

#[test]
fn test_upload_over_limit_is_payload_too_large() {
    let dir = tempdir().unwrap();
    let mut config = Config::with_base_dir(dir.path());
    config.max_upload_bytes = 1024;
    let service = DemoService::new(config).unwrap();

    let err = service
        .upload(&[UploadPart::new("audio", "big.wav", vec![0; 2048])], None)
        .unwrap_err();
    assert_eq!(err.status_code(), 413);
    assert_eq!(fs::read_dir(&service.config().output_dir).unwrap().count(), 0);
}

#[test]
fn test_status_of_unknown_id() {
    let (_dir, service) = setup();
    let json = serde_json::to_value(service.status("nope")).unwrap();
    assert_eq!(json, json!({ "status": "unknown" }));
}

#[test]
fn test_download_picks_newest_output() {
    let (_dir, service) = setup();
    let err = service.download().unwrap_err();
    assert_eq!(err.status_code(), 404);

    touch_output(&service, "transformed_old.wav", 300);
    touch_output(&service, "transformed_new.wav", 10);
    touch_output(&service, "notes.txt", 0);

    let file = service.download().unwrap();
    assert_eq!(
        file.path,
        service.config().output_dir.join("transformed_new.wav")
    );
    assert_eq!(file.mime_type, "audio/wav");
}

#[test]
fn test_clean_keeps_newest_outputs() {
    let (_dir, service) = setup();
    for i in 0..8 {
        touch_output(&service, &format!("transformed_{}.wav", i), 100 - i * 10);
    }
    fs::write(service.config().upload_dir.join("stale_upload.wav"), b"x").unwrap();

    let response = service.clean().unwrap();
    assert_eq!(response.removed_uploads, 1);
    assert_eq!(response.removed_outputs, 3);

    let mut kept: Vec<String> = fs::read_dir(&service.config().output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    kept.sort();
    assert_eq!(
        kept,
        vec![
            "transformed_3.wav",
            "transformed_4.wav",
            "transformed_5.wav",
            "transformed_6.wav",
            "transformed_7.wav"
        ]
    );
    assert_eq!(fs::read_dir(&service.config().upload_dir).unwrap().count(), 0);
}

#[test]
fn test_clean_counts_every_output_file() {
    let (_dir, service) = setup();
    touch_output(&service, "transformed_a.wav", 500);
    touch_output(&service, "leftover.tmp", 400);
    for i in 0..5 {
        touch_output(&service, &format!("transformed_{}.wav", i), 50 - i * 10);
    }

    let response = service.clean().unwrap();
    assert_eq!(response.removed_outputs, 2);
    assert!(!service.config().output_dir.join("leftover.tmp").exists());
    assert!(!service.config().output_dir.join("transformed_a.wav").exists());
    assert_eq!(fs::read_dir(&service.config().output_dir).unwrap().count(), 5);
}

#[test]
fn test_clean_drops_finished_statuses() {
    let (dir, service) = setup();
    let done = service
        .upload(&[UploadPart::new("audio", "t.wav", tone_bytes(&dir))], None)
        .unwrap();
    let failed = service.upload(&[], None).unwrap_err();
    assert_eq!(failed.status_code(), 400);
    assert_eq!(service.status(&done.process_id).status, StatusKind::Completed);

    let response = service.clean().unwrap();
    assert_eq!(response.pruned_statuses, 2);
    assert_eq!(service.status(&done.process_id).status, StatusKind::Unknown);
}

#[test]
fn test_info_lists_installed_checkpoints() {
    let (_dir, service) = setup();
    fs::create_dir_all(&service.config().models_dir).unwrap();
    fs::write(service.config().models_dir.join("Jazz.ts"), b"graph").unwrap();

    let info = service.info().unwrap();
    assert_eq!(info.server, "ravefx");
    assert_eq!(info.selected_model, "Jazz");
    assert_eq!(info.available_models, vec!["Jazz".to_string()]);
}

#[test]
fn test_concurrent_uploads_use_their_own_model() {
    let (dir, service) = setup();
    let service = Arc::new(service);
    let bytes = tone_bytes(&dir);

    let handles: Vec<_> = ["Parole", "Chiens", "Chats", "Jazz"]
        .into_iter()
        .map(|model| {
            let service = Arc::clone(&service);
            let bytes = bytes.clone();
            thread::spawn(move || {
                service.select_model("Darbouka");
                let response = service
                    .upload(&[UploadPart::new("audio", "t.wav", bytes)], Some(model))
                    .unwrap();
                (model, response.effect)
            })
        })
        .collect();

    for handle in handles {
        let (model, effect) = handle.join().unwrap();
        assert_eq!(effect, EffectKind::resolve(model));
    }
}
