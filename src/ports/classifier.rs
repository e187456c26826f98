//! Classifier port: Trait for the trained risk model.
//!
//! The model is opaque to the pipeline; it only sees a finished,
//! canonically ordered feature vector.

use crate::domain::FeatureVector;

/// Error raised by a classifier implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("Feature mismatch: model expects {expected:?}, got {actual:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Classifier returned invalid label {0} (expected 0 or 1)")]
    InvalidLabel(u8),

    #[error("Classifier returned invalid probability {0} (expected [0, 1])")]
    InvalidProbability(f64),

    #[error("Classifier failed: {0}")]
    Failed(String),
}

/// Trait for binary risk classifiers.
///
/// Implementations must be stateless per call so one instance can serve
/// concurrent requests.
pub trait Classifier: Send + Sync {
    /// Predict the class label (0 = no disease, 1 = disease present).
    ///
    /// # Errors
    /// Returns `ClassifierError` if the vector does not fit the model.
    fn predict(&self, features: &FeatureVector) -> Result<u8, ClassifierError>;

    /// Probability of the positive class.
    ///
    /// # Errors
    /// Returns `ClassifierError` if the vector does not fit the model.
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError>;

    /// Column order the model was trained on, if it records one.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}
