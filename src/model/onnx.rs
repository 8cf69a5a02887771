//! ONNX Runtime classifier. Input: [1, n] f32, output 0: int64 label or f32 score.
//! Uses `ort`; the optional JSON sidecar carries the column order the model was fitted on.

use super::Classifier;
use crate::config::ModelConfig;
use crate::error::ModelError;
use ndarray::{Array2, CowArray};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Sidecar written next to the exported model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub feature_columns: Vec<String>,
}

impl ModelMetadata {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let data = std::fs::read_to_string(path).map_err(|e| ModelError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&data).map_err(|e| ModelError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

pub struct OnnxClassifier {
    session: ort::Session,
    feature_names: Option<Vec<String>>,
    _env: Arc<ort::Environment>,
}

fn runtime(e: impl std::fmt::Display) -> ModelError {
    ModelError::Runtime(e.to_string())
}

impl OnnxClassifier {
    /// Load the model artifact. A missing sidecar is not an error; the model then
    /// receives rows in `FEATURE_COLUMNS` order.
    pub fn load(config: &ModelConfig) -> Result<Self, ModelError> {
        if !config.path.is_file() {
            return Err(ModelError::NotFound(config.path.clone()));
        }

        let feature_names = match &config.metadata_path {
            Some(p) if p.is_file() => Some(ModelMetadata::load(p)?.feature_columns),
            Some(p) => {
                tracing::warn!(path = %p.display(), "model metadata not found; using default column order");
                None
            }
            None => None,
        };

        let env = ort::Environment::builder()
            .with_name("pcap-threat-detector")
            .build()
            .map_err(runtime)?
            .into_arc();
        let session = ort::SessionBuilder::new(&env)
            .map_err(runtime)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level1)
            .map_err(runtime)?
            .with_model_from_file(&config.path)
            .map_err(runtime)?;

        tracing::info!(
            path = %config.path.display(),
            columns = feature_names.as_ref().map(|c| c.len()),
            "classifier loaded"
        );
        Ok(Self {
            session,
            feature_names,
            _env: env,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, row: &[f64]) -> Result<u8, ModelError> {
        let input: Vec<f32> = row.iter().map(|&v| v as f32).collect();
        let arr = Array2::from_shape_vec((1, input.len()), input).map_err(runtime)?;
        let arr = CowArray::from(arr.into_dyn());
        let value = ort::Value::from_array(self.session.allocator(), &arr).map_err(runtime)?;

        let outputs = self.session.run(vec![value]).map_err(runtime)?;
        let out = outputs.first().ok_or(ModelError::EmptyOutput)?;

        if let Ok(labels) = out.try_extract::<i64>() {
            let label = labels.view().iter().next().copied().ok_or(ModelError::EmptyOutput)?;
            return Ok(u8::from(label != 0));
        }
        let scores = out.try_extract::<f32>().map_err(runtime)?;
        let score = scores.view().iter().next().copied().ok_or(ModelError::EmptyOutput)?;
        Ok(u8::from(score >= 0.5))
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}
