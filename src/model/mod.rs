//! Binary classifier boundary and its ONNX implementation.

mod onnx;

pub use onnx::{ModelMetadata, OnnxClassifier};

use crate::error::ModelError;
use crate::features::{FeatureRow, FEATURE_COLUMNS};

/// A trained binary classifier over one feature row.
pub trait Classifier: Send + Sync {
    /// Returns 0 (benign) or 1 (threat). `row` is laid out per [`Classifier::feature_names`]
    /// when that is set, otherwise in `FEATURE_COLUMNS` order.
    fn predict(&self, row: &[f64]) -> Result<u8, ModelError>;

    /// Ordered input columns the model was fitted on, when it knows them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Reindex `row` to the classifier's input columns and run it.
pub fn classify(model: &dyn Classifier, row: &FeatureRow) -> Result<u8, ModelError> {
    let input = match model.feature_names() {
        Some(names) if !names.is_empty() => row.select(names),
        _ => row.select(&FEATURE_COLUMNS),
    };
    let label = model.predict(&input)?;
    Ok(u8::from(label != 0))
}
