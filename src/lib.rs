//! PCAP threat detector: packet capture to a single UNSW-NB15 style feature row,
//! classified by a pre-trained binary model.
//!
//! Modular structure:
//! - [`capture`]: pcap / pcapng reading and frame decoding
//! - [`flow`]: bidirectional flow reconstruction
//! - [`features`]: per-flow features, categorical encoding, single-row reduction
//! - [`model`]: classifier boundary and ONNX inference
//! - [`detector`]: inference entrypoint (path → verdict)
//! - [`verdict`]: prediction and complaint verdicts
//! - [`api`]: HTTP boundary
//! - [`logging`]: Structured JSON logging

pub mod api;
pub mod capture;
pub mod config;
pub mod detector;
pub mod error;
pub mod features;
pub mod flow;
pub mod logging;
pub mod model;
pub mod verdict;

pub use config::ServiceConfig;
pub use detector::{CapturePrediction, Detector};
pub use error::{CaptureError, ExtractError, ModelError, PredictError};
pub use features::{extract_features, FeatureRow, FEATURE_COLUMNS};
pub use flow::{FlowKey, FlowRecord, FlowTable};
pub use logging::StructuredLogger;
pub use model::{Classifier, OnnxClassifier};
pub use verdict::ThreatVerdict;
