//! Model catalog
//!
//! The demo models offered to clients, the checkpoint file each one maps
//! to, and where pretrained upstream checkpoints can be fetched from.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::dsp::EffectKind;
use crate::error::{RaveError, Result};

/// File extension of serialized inference graphs
pub const CHECKPOINT_EXTENSION: &str = "ts";

/// One entry in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Name shown to clients
    pub name: &'static str,
    /// Checkpoint file name inside the models directory
    pub checkpoint: &'static str,
    /// Name of the pretrained upstream checkpoint, if one exists
    pub upstream: Option<&'static str>,
    pub url: Option<&'static str>,
}

impl CatalogEntry {
    /// Demo effect applied when this model is selected
    pub fn effect(&self) -> EffectKind {
        EffectKind::resolve(self.name)
    }
}

/// A checkpoint found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledModel {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Catalog of demo models
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    entries: Vec<CatalogEntry>,
}

impl ModelCatalog {
    /// Catalog with the five demo models
    pub fn with_defaults() -> Self {
        Self {
            entries: vec![
                CatalogEntry {
                    name: "Jazz",
                    checkpoint: "Jazz.ts",
                    upstream: Some("vintage"),
                    url: Some(
                        "https://github.com/acids-ircam/RAVE/releases/download/v2.3.0/vintage.ts",
                    ),
                },
                CatalogEntry {
                    name: "Parole",
                    checkpoint: "Vctk.ts",
                    upstream: Some("VCTK"),
                    url: Some(
                        "https://github.com/acids-ircam/RAVE/releases/download/v2.3.0/VCTK.ts",
                    ),
                },
                CatalogEntry {
                    name: "Darbouka",
                    checkpoint: "Darbouka.ts",
                    upstream: Some("percussion"),
                    url: Some(
                        "https://github.com/acids-ircam/RAVE/releases/download/v2.3.0/percussion.ts",
                    ),
                },
                // No pretrained upstream: these have to be trained locally
                CatalogEntry {
                    name: "Chats",
                    checkpoint: "Chats.ts",
                    upstream: None,
                    url: None,
                },
                CatalogEntry {
                    name: "Chiens",
                    checkpoint: "Chiens.ts",
                    upstream: None,
                    url: None,
                },
            ],
        }
    }

    /// Model names in display order
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Path of the checkpoint for `name`, which must exist on disk
    pub fn checkpoint_path(&self, models_dir: &Path, name: &str) -> Result<PathBuf> {
        let entry = self.get(name).ok_or_else(|| RaveError::ModelNotFound {
            model: name.to_string(),
        })?;

        let path = models_dir.join(entry.checkpoint);
        if path.is_file() {
            Ok(path)
        } else {
            Err(RaveError::ModelNotFound {
                model: path.display().to_string(),
            })
        }
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// List `*.ts` checkpoints directly inside `models_dir`, sorted by name
///
/// A missing directory yields an empty list.
pub fn discover_checkpoints(models_dir: &Path) -> Result<Vec<InstalledModel>> {
    if !models_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(models_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| RaveError::Io(e.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(CHECKPOINT_EXTENSION)
        {
            continue;
        }

        let size_bytes = entry.metadata().map_err(|e| RaveError::Io(e.into()))?.len();
        found.push(InstalledModel {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            size_bytes,
        });
    }

    found.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(found)
}
