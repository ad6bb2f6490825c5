//! Service configuration
//!
//! Directory layout and limits for the upload/transform/download service.
//! Values come from defaults under a base directory and can be overridden
//! with `RAVEFX_*` environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// Model selected when nothing else has been chosen
pub const DEFAULT_MODEL: &str = "Jazz";

/// Maximum accepted upload size (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Number of newest output files kept by a clean pass
pub const DEFAULT_KEEP_OUTPUTS: usize = 5;

/// Sample rate the neural models were trained at
pub const NEURAL_SAMPLE_RATE: u32 = 48000;

/// Runtime configuration
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Where uploaded files are staged before processing
    pub upload_dir: PathBuf,
    /// Where transformed files are written
    pub output_dir: PathBuf,
    /// Where neural checkpoints (`*.ts`) live
    pub models_dir: PathBuf,
    /// Model used when a request does not name one
    pub default_model: String,
    pub max_upload_bytes: u64,
    pub keep_outputs: usize,
    pub neural_sample_rate: u32,
}

impl Config {
    /// Default layout rooted at `base`
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            upload_dir: base.join("uploads"),
            output_dir: base.join("outputs"),
            models_dir: base.join("models"),
            default_model: DEFAULT_MODEL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            keep_outputs: DEFAULT_KEEP_OUTPUTS,
            neural_sample_rate: NEURAL_SAMPLE_RATE,
        }
    }

    /// Build a configuration from the environment
    ///
    /// Unparseable numeric overrides are ignored and the default is kept.
    pub fn from_env() -> Self {
        let base = env::var("RAVEFX_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let mut config = Self::with_base_dir(&base);

        if let Ok(dir) = env::var("RAVEFX_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("RAVEFX_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("RAVEFX_MODELS_DIR") {
            config.models_dir = PathBuf::from(dir);
        }
        if let Ok(model) = env::var("RAVEFX_DEFAULT_MODEL") {
            config.default_model = model;
        }
        if let Some(bytes) = env::var("RAVEFX_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.max_upload_bytes = bytes;
        }
        if let Some(keep) = env::var("RAVEFX_KEEP_OUTPUTS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.keep_outputs = keep;
        }

        config
    }

    /// Create the upload and output directories if missing
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.upload_dir)?;
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_base_dir(Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_under_base_dir() {
        let config = Config::with_base_dir(Path::new("/srv/rave"));
        assert_eq!(config.upload_dir, PathBuf::from("/srv/rave/uploads"));
        assert_eq!(config.output_dir, PathBuf::from("/srv/rave/outputs"));
        assert_eq!(config.default_model, "Jazz");
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.keep_outputs, 5);
    }

    #[test]
    fn test_ensure_dirs_creates_layout() {
        let dir = tempdir().unwrap();
        let config = Config::with_base_dir(dir.path());
        config.ensure_dirs().unwrap();
        assert!(config.upload_dir.is_dir());
        assert!(config.output_dir.is_dir());
    }
}
