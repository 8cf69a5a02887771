//! Inference entrypoint: capture path → feature row → classifier verdict.
//!
//! `Detector` is built once at startup and shared read-only by every request.

use crate::config::ServiceConfig;
use crate::error::PredictError;
use crate::features::{extract_features, FeatureRow};
use crate::model::{classify, Classifier, OnnxClassifier};
use crate::verdict::ThreatVerdict;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one capture prediction.
#[derive(Debug, Clone, Serialize)]
pub struct CapturePrediction {
    pub path: PathBuf,
    pub verdict: ThreatVerdict,
    pub features: FeatureRow,
}

pub struct Detector {
    config: ServiceConfig,
    /// Loaded classifier, or the reason it could not be loaded
    model: Result<Arc<dyn Classifier>, String>,
}

impl Detector {
    pub fn new(config: ServiceConfig, model: Arc<dyn Classifier>) -> Self {
        Self {
            config,
            model: Ok(model),
        }
    }

    /// Build from configuration, loading the ONNX classifier. A model that fails to
    /// load is logged and reported on every capture prediction instead of aborting startup.
    pub fn load(config: ServiceConfig) -> Self {
        let model = match OnnxClassifier::load(&config.model) {
            Ok(m) => Ok(Arc::new(m) as Arc<dyn Classifier>),
            Err(e) => {
                warn!(path = %config.model.path.display(), error = %e, "classifier unavailable; capture predictions disabled");
                Err(e.to_string())
            }
        };
        Self { config, model }
    }

    /// Detector without a classifier; capture predictions fail with `reason`.
    pub fn without_model(config: ServiceConfig, reason: impl Into<String>) -> Self {
        Self {
            config,
            model: Err(reason.into()),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn has_model(&self) -> bool {
        self.model.is_ok()
    }

    pub fn resolve_path(&self, raw: &str) -> Result<PathBuf, PredictError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PredictError::InvalidInput(
                "file_path is required and must be a string".to_string(),
            ));
        }
        Ok(self.config.resolve_capture_path(trimmed))
    }

    /// Resolve and extract without classifying.
    pub fn extract(&self, raw: &str) -> Result<(PathBuf, FeatureRow), PredictError> {
        let path = self.resolve_path(raw)?;
        let row = extract_features(&path)?;
        Ok((path, row))
    }

    pub fn predict_capture(&self, raw: &str) -> Result<CapturePrediction, PredictError> {
        let (path, features) = self.extract(raw)?;
        let model = self
            .model
            .as_ref()
            .map_err(|reason| PredictError::Internal(reason.clone()))?;
        let prediction = classify(model.as_ref(), &features)?;
        let verdict = ThreatVerdict::from_prediction(prediction);
        info!(
            path = %path.display(),
            prediction,
            is_threat = verdict.is_threat,
            "capture classified"
        );
        Ok(CapturePrediction {
            path,
            verdict,
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorClass, ModelError};

    struct Always(u8);

    impl Classifier for Always {
        fn predict(&self, _row: &[f64]) -> Result<u8, ModelError> {
            Ok(self.0)
        }
    }

    fn config_in(dir: &std::path::Path) -> ServiceConfig {
        ServiceConfig {
            base_dir: Some(dir.to_path_buf()),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn blank_path_is_invalid_input() {
        let d = Detector::new(ServiceConfig::default(), Arc::new(Always(0)));
        let err = d.predict_capture("   ").unwrap_err();
        assert_eq!(err.class(), ErrorClass::BadRequest);
    }

    #[test]
    fn relative_path_resolves_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let d = Detector::new(config_in(dir.path()), Arc::new(Always(0)));
        let err = d.predict_capture("missing.pcap").unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
        assert!(err.to_string().contains(&dir.path().join("missing.pcap").display().to_string()));
    }

    #[test]
    fn missing_model_fails_after_extraction() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
        let d = Detector::without_model(config_in(dir.path()), "Model not found: m.onnx");
        // format errors still win over the missing model
        assert_eq!(d.predict_capture("a.txt").unwrap_err().class(), ErrorClass::BadRequest);
        assert!(!d.has_model());
    }
}
