//! Scaler port: Trait for the persisted feature scaler.

/// Error raised when a scaler cannot transform its input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalerError {
    #[error("Shape mismatch: scaler fitted on {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Column mismatch: scaler fitted on {expected:?}, got {actual:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Invalid scaler parameters: {0}")]
    InvalidParameters(String),
}

/// Affine transform over the numeric sub-vector.
pub trait FeatureScaler: Send + Sync {
    /// Transform `values`, which hold the named `columns` in order.
    ///
    /// # Errors
    /// Returns `ScalerError` if the input does not match what the scaler
    /// was fitted on. Callers treat any error as "leave unscaled".
    fn transform(&self, columns: &[&str], values: &[f64]) -> Result<Vec<f64>, ScalerError>;
}
