//! Error types for capture reading, feature extraction, model inference and prediction.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to open or read a capture file as a whole.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to open capture: {0}")]
    Io(#[from] std::io::Error),

    #[error("unreadable capture: {0}")]
    Format(#[from] pcap_file::PcapError),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Pcap file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File must be a .pcap or .pcapng")]
    BadFormat(PathBuf),

    #[error("{}: {source}", .path.display())]
    Capture {
        path: PathBuf,
        #[source]
        source: CaptureError,
    },
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid model metadata {}: {reason}", .path.display())]
    Metadata { path: PathBuf, reason: String },

    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("model produced no output")]
    EmptyOutput,
}

/// Everything the inference entrypoint can fail with, grouped the way callers report it.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("{0}")]
    Internal(String),
}

/// Coarse classification used by the HTTP boundary and the CLI exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadRequest,
    NotFound,
    Internal,
}

impl PredictError {
    pub fn class(&self) -> ErrorClass {
        match self {
            PredictError::InvalidInput(_) | PredictError::Extract(ExtractError::BadFormat(_)) => {
                ErrorClass::BadRequest
            }
            PredictError::Extract(ExtractError::NotFound(_)) => ErrorClass::NotFound,
            PredictError::Extract(ExtractError::Capture { .. })
            | PredictError::Model(_)
            | PredictError::Internal(_) => ErrorClass::Internal,
        }
    }
}
