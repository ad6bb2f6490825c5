//! Request-level errors and their status codes

use serde_json::{json, Value};
use thiserror::Error;

use crate::error::RaveError;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("No audio file found in request")]
    NoFile,

    #[error("Upload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("No transformed file available")]
    NoOutput,

    #[error(transparent)]
    Engine(#[from] RaveError),
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Engine(RaveError::Io(err))
    }
}

impl ServiceError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NoFile => 400,
            ServiceError::PayloadTooLarge { .. } => 413,
            ServiceError::NoOutput => 404,
            ServiceError::Engine(_) => 500,
        }
    }

    /// JSON body sent with the status code
    ///
    /// Engine errors also carry their code and recovery hints.
    pub fn to_json(&self) -> Value {
        match self {
            ServiceError::Engine(err) => json!({
                "status": "error",
                "msg": self.to_string(),
                "code": err.error_code(),
                "recoverable": err.is_recoverable(),
                "suggestions": err.recovery_suggestions(),
            }),
            _ => json!({ "status": "error", "msg": self.to_string() }),
        }
    }
}
