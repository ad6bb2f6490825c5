//! Request handlers for the demo service
//!
//! Transport-agnostic: a web layer parses the multipart body into
//! [`UploadPart`]s, calls these handlers, and turns [`ServiceError`] into a
//! status code with [`ServiceError::status_code`]. One [`DemoService`] can be
//! shared across worker threads.

mod error;
mod status;

pub use error::{ServiceError, ServiceResult};
pub use status::{
    ProcessingStatus, StatusKind, StatusTable, PROGRESS_DONE, PROGRESS_PREPARED, PROGRESS_SAVED,
};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::Config;
use crate::dsp::EffectKind;
use crate::engine::{process_file, ProcessOutcome};
use crate::error::RaveError;
use crate::neural::{discover_checkpoints, ModelCatalog};

/// Name reported by `root` and `info`
pub const SERVER_NAME: &str = "ravefx";

/// Field names searched for the audio part, in order
pub const UPLOAD_FIELDS: [&str; 2] = ["audio", "file"];

/// One part of a multipart upload
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub field: String,
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadPart {
    pub fn new(field: &str, filename: &str, data: Vec<u8>) -> Self {
        Self {
            field: field.to_string(),
            filename: filename.to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectResponse {
    pub status: &'static str,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub msg: String,
    pub process_id: String,
    pub output_file: String,
    pub model: String,
    pub effect: EffectKind,
    /// True when the input was returned unchanged
    pub fallback: bool,
    /// Recovery hints when `fallback` is set
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// File to stream back from `download`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    pub path: PathBuf,
    pub download_name: &'static str,
    pub mime_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanResponse {
    pub status: &'static str,
    pub msg: String,
    pub removed_uploads: usize,
    pub removed_outputs: usize,
    /// Finished status records dropped from the table
    pub pruned_statuses: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub server: &'static str,
    pub version: &'static str,
    pub selected_model: String,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub models_dir: PathBuf,
    /// Checkpoints found in the models directory
    pub available_models: Vec<String>,
}

/// Shared state behind the HTTP routes
pub struct DemoService {
    config: Config,
    catalog: ModelCatalog,
    statuses: StatusTable,
    selected_model: RwLock<String>,
}

impl DemoService {
    /// Create the service and its upload/output directories
    pub fn new(config: Config) -> crate::error::Result<Self> {
        config.ensure_dirs()?;
        let selected_model = RwLock::new(config.default_model.clone());
        Ok(Self {
            config,
            catalog: ModelCatalog::with_defaults(),
            statuses: StatusTable::new(),
            selected_model,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> String {
        format!("Connection success: {} is running", SERVER_NAME)
    }

    pub fn list_models(&self) -> Vec<&'static str> {
        self.catalog.names()
    }

    /// Currently selected model
    pub fn selected_model(&self) -> String {
        self.selected_model
            .read()
            .map(|m| m.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Set the process-wide model; the last call wins
    ///
    /// Unknown names are accepted and resolve to the identity effect.
    pub fn select_model(&self, name: &str) -> SelectResponse {
        let mut selected = self
            .selected_model
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *selected = name.to_string();
        info!("Selected model: {}", name);

        SelectResponse {
            status: "ok",
            model: name.to_string(),
        }
    }

    /// Save, transform and clean up one uploaded file
    ///
    /// # Errors
    ///
    /// `NoFile` when the request carries no parts, `PayloadTooLarge` above
    /// the configured limit, `Engine` when the upload cannot be stored or
    /// the fallback copy itself fails. Effect failures are not errors: the
    /// output is then a copy of the input and `fallback` is set.
    pub fn upload(
        &self,
        parts: &[UploadPart],
        model_override: Option<&str>,
    ) -> ServiceResult<UploadResponse> {
        // Resolve once so a concurrent select_model cannot change this request
        let model = model_override
            .map(str::to_string)
            .unwrap_or_else(|| self.selected_model());

        let pid = Uuid::new_v4().simple().to_string();
        self.statuses.start(&pid);

        let result = self.process_upload(&pid, parts, &model);
        if result.is_err() {
            self.statuses.fail(&pid);
        }
        result
    }

    fn process_upload(
        &self,
        pid: &str,
        parts: &[UploadPart],
        model: &str,
    ) -> ServiceResult<UploadResponse> {
        let part = select_part(parts).ok_or(ServiceError::NoFile)?;

        let size = part.data.len() as u64;
        if size > self.config.max_upload_bytes {
            return Err(ServiceError::PayloadTooLarge {
                size,
                limit: self.config.max_upload_bytes,
            });
        }

        let upload_path = self
            .config
            .upload_dir
            .join(format!("{}_{}", pid, safe_basename(&part.filename)));
        fs::write(&upload_path, &part.data)?;
        self.statuses.set_progress(pid, PROGRESS_SAVED);
        info!("Saved upload {} ({} bytes)", upload_path.display(), size);

        let output_file = format!("transformed_{}.wav", pid);
        let output_path = self.config.output_dir.join(&output_file);
        self.statuses.set_progress(pid, PROGRESS_PREPARED);

        let processed = process_file(&upload_path, &output_path, model);
        if let Err(e) = fs::remove_file(&upload_path) {
            warn!("Could not remove upload {}: {}", upload_path.display(), e);
        }
        let report = processed?;

        self.statuses.complete(pid);

        let (msg, suggestions) = match &report.outcome {
            ProcessOutcome::FallbackCopy { suggestions, .. } => (
                "Effect failed, input returned unchanged".to_string(),
                suggestions.clone(),
            ),
            ProcessOutcome::Transformed { .. } => {
                (format!("Transformed with {}", report.kind), Vec::new())
            }
        };

        Ok(UploadResponse {
            status: "ok",
            msg,
            process_id: pid.to_string(),
            output_file,
            model: report.model.clone(),
            effect: report.kind,
            fallback: report.is_fallback(),
            suggestions,
        })
    }

    pub fn status(&self, pid: &str) -> ProcessingStatus {
        self.statuses.get(pid)
    }

    /// Most recently written output file
    pub fn download(&self) -> ServiceResult<DownloadFile> {
        let path = list_files_by_age(&self.config.output_dir, Some("wav"))?
            .into_iter()
            .next()
            .ok_or(ServiceError::NoOutput)?;
        Ok(DownloadFile {
            path,
            download_name: "transformed.wav",
            mime_type: "audio/wav",
        })
    }

    /// Empty the upload directory, keep the newest outputs and drop
    /// finished status records
    ///
    /// Every file in the output directory counts towards the retention
    /// limit, not only `.wav` files. Files that cannot be removed are logged
    /// and skipped.
    pub fn clean(&self) -> ServiceResult<CleanResponse> {
        let mut removed_uploads = 0;
        if self.config.upload_dir.is_dir() {
            for entry in WalkDir::new(&self.config.upload_dir)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if remove_logged(entry.path()) {
                    removed_uploads += 1;
                }
            }
        }

        let outputs = list_files_by_age(&self.config.output_dir, None)?;
        let removed_outputs = outputs
            .iter()
            .skip(self.config.keep_outputs)
            .filter(|path| remove_logged(path))
            .count();
        let pruned_statuses = self.statuses.prune_finished();

        info!(
            "Cleaned {} uploads, {} outputs and {} status records",
            removed_uploads, removed_outputs, pruned_statuses
        );

        Ok(CleanResponse {
            status: "ok",
            msg: format!(
                "Removed {} uploads and {} old outputs",
                removed_uploads, removed_outputs
            ),
            removed_uploads,
            removed_outputs,
            pruned_statuses,
        })
    }

    pub fn info(&self) -> ServiceResult<ServerInfo> {
        let available_models = discover_checkpoints(&self.config.models_dir)?
            .into_iter()
            .map(|m| m.name)
            .collect();

        Ok(ServerInfo {
            server: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            selected_model: self.selected_model(),
            upload_dir: self.config.upload_dir.clone(),
            output_dir: self.config.output_dir.clone(),
            models_dir: self.config.models_dir.clone(),
            available_models,
        })
    }
}

/// Part named `audio`, else `file`, else the first one
fn select_part(parts: &[UploadPart]) -> Option<&UploadPart> {
    UPLOAD_FIELDS
        .iter()
        .find_map(|field| parts.iter().find(|p| p.field == *field))
        .or_else(|| parts.first())
}

/// Last path component of a client-supplied name
fn safe_basename(filename: &str) -> String {
    filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("upload.wav")
        .to_string()
}

/// Files directly inside `dir`, newest first, optionally filtered by extension
fn list_files_by_age(dir: &Path, extension: Option<&str>) -> ServiceResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| RaveError::Io(e.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if extension.is_some() && path.extension().and_then(|e| e.to_str()) != extension {
            continue;
        }
        let modified = entry
            .metadata()
            .map_err(|e| RaveError::Io(e.into()))?
            .modified()?;
        files.push((modified, path.to_path_buf()));
    }

    files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

fn remove_logged(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not remove {}: {}", path.display(), e);
            false
        }
    }
}
