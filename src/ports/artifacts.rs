//! Artifact port: Trait for loading the trained artifacts.
//!
//! Loading happens once at startup; the pipeline itself never does I/O.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::CanonicalFeatureList;
use crate::ports::{Classifier, FeatureScaler};

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Required artifact missing: {0}")]
    Missing(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {name} artifact: {reason}")]
    Invalid { name: String, reason: String },

    #[error("Integrity check failed: {0}")]
    Integrity(String),
}

/// Source of the feature list, scaler and classifier.
pub trait ArtifactStore {
    /// Concrete classifier produced by this store.
    type Model: Classifier;

    /// Load the trained column order, if one was shipped.
    ///
    /// # Errors
    /// Returns `ArtifactError` if the artifact exists but is unusable.
    fn load_feature_columns(&self) -> Result<Option<CanonicalFeatureList>, ArtifactError>;

    /// Load the feature scaler, if one was shipped.
    ///
    /// # Errors
    /// Returns `ArtifactError` if the artifact exists but is unusable.
    fn load_scaler(&self) -> Result<Option<Arc<dyn FeatureScaler>>, ArtifactError>;

    /// Load the classifier. It is always required.
    ///
    /// # Errors
    /// Returns `ArtifactError::Missing` if absent, or another variant if unusable.
    fn load_classifier(&self) -> Result<Self::Model, ArtifactError>;
}
