//! Error handling for RaveFX
//!
//! Errors fall into three families: decode (the input container), transform
//! (an effect branch) and encode (the output container), plus the neural
//! inference errors and ambient I/O.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for RaveFX operations
pub type Result<T> = std::result::Result<T, RaveError>;

/// Main error type for RaveFX operations
#[derive(Error, Debug)]
pub enum RaveError {
    // Decode Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to decode audio: {reason}")]
    Decode {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Transform Errors
    #[error("Effect '{effect}' failed: {reason}")]
    Transform { effect: String, reason: String },

    #[error("Unsupported channel layout: {channels} channels (only mono is supported)")]
    UnsupportedChannelLayout { channels: u16 },

    #[error("DSP overflow: effect '{effect}' produced invalid audio (NaN/Inf)")]
    DspOverflow { effect: String },

    // Encode Errors
    #[error("Failed to encode audio: {reason}")]
    Encode {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Neural Errors
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    #[error("Incompatible model: {model} supports neither forward nor encode/decode")]
    IncompatibleModel { model: String },

    #[error("Inference failed: {reason}")]
    InferenceFailed { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Which stage of the pipeline an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStage {
    Decode,
    Transform,
    Encode,
    Inference,
    Io,
}

impl RaveError {
    /// Wrap a hound error raised while reading a container
    pub fn decode(reason: impl Into<String>, err: hound::Error) -> Self {
        RaveError::Decode {
            reason: reason.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Wrap a hound error raised while writing a container
    pub fn encode(reason: impl Into<String>, err: hound::Error) -> Self {
        RaveError::Encode {
            reason: reason.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            RaveError::FileNotFound { .. } => "FILE_NOT_FOUND",
            RaveError::Decode { .. } => "DECODE_ERROR",
            RaveError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            RaveError::Transform { .. } => "TRANSFORM_ERROR",
            RaveError::UnsupportedChannelLayout { .. } => "UNSUPPORTED_CHANNEL_LAYOUT",
            RaveError::DspOverflow { .. } => "DSP_OVERFLOW",
            RaveError::Encode { .. } => "ENCODE_ERROR",
            RaveError::ModelNotFound { .. } => "MODEL_NOT_FOUND",
            RaveError::IncompatibleModel { .. } => "INCOMPATIBLE_MODEL",
            RaveError::InferenceFailed { .. } => "INFERENCE_FAILED",
            RaveError::Io(_) => "IO_ERROR",
            RaveError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Pipeline stage the error came from
    pub fn stage(&self) -> ErrorStage {
        match self {
            RaveError::FileNotFound { .. }
            | RaveError::Decode { .. }
            | RaveError::UnsupportedFormat { .. } => ErrorStage::Decode,
            RaveError::Transform { .. }
            | RaveError::UnsupportedChannelLayout { .. }
            | RaveError::DspOverflow { .. } => ErrorStage::Transform,
            RaveError::Encode { .. } => ErrorStage::Encode,
            RaveError::ModelNotFound { .. }
            | RaveError::IncompatibleModel { .. }
            | RaveError::InferenceFailed { .. } => ErrorStage::Inference,
            RaveError::Io(_) | RaveError::Serialization(_) => ErrorStage::Io,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Transform errors are always absorbed by the fallback copy.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.stage(), ErrorStage::Transform)
            || matches!(
                self,
                RaveError::FileNotFound { .. } | RaveError::UnsupportedFormat { .. }
            )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RaveError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the upload completed before processing",
            ],
            RaveError::Decode { .. } => vec![
                "Try converting the file to 16-bit PCM WAV first",
                "The file may be corrupted - try re-exporting from source",
            ],
            RaveError::UnsupportedFormat { .. } => {
                vec!["Convert to 16-bit PCM WAV", "Supported formats: WAV (PCM or float)"]
            }
            RaveError::UnsupportedChannelLayout { .. } => {
                vec!["Downmix the recording to mono before uploading"]
            }
            RaveError::DspOverflow { .. } => vec![
                "The input may contain invalid samples",
                "The original file has been returned unmodified",
            ],
            RaveError::ModelNotFound { .. } => vec![
                "The requested checkpoint is not installed",
                "Place the .ts checkpoint in the models directory",
            ],
            RaveError::IncompatibleModel { .. } => vec![
                "Re-export the model with a supported runtime version",
                "Use the demo effects instead",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = RaveError::FileNotFound {
            path: "test.wav".to_string(),
            source: None,
        };
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
        assert_eq!(err.stage(), ErrorStage::Decode);
    }

    #[test]
    fn test_transform_errors_are_recoverable() {
        let err = RaveError::UnsupportedChannelLayout { channels: 2 };
        assert!(err.is_recoverable());
        assert!(!err.recovery_suggestions().is_empty());

        let err = RaveError::Encode {
            reason: "disk full".to_string(),
            source: None,
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.stage(), ErrorStage::Encode);
    }

    #[test]
    fn test_display_includes_context() {
        let err = RaveError::Transform {
            effect: "echo".to_string(),
            reason: "bad delay".to_string(),
        };
        assert_eq!(err.to_string(), "Effect 'echo' failed: bad delay");
    }
}
