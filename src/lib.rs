//! # Cardiorisk
//!
//! Heart disease risk screening from a thirteen-question questionnaire.
//!
//! This crate provides:
//! - Typed questionnaire answers with an explicit "I don't know" option
//! - A feature pipeline that reproduces the training-time schema
//! - Artifact loading (feature list, scaler, model) with optional integrity checks
//! - Logistic-regression inference producing a probability and a risk message
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (answers, features, diagnosis)
//! - `pipeline`: Pure stages turning answers into the classifier input
//! - `ports`: Trait definitions for the scaler, classifier and artifact store
//! - `adapters`: Concrete implementations (JSON artifacts, logistic model)
//! - `application`: The prediction use case
//! - `config`: Environment-driven settings

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod pipeline;
pub mod ports;

pub use application::PredictionService;
pub use config::Settings;
pub use domain::{Diagnosis, RawAnswers, RiskLevel, DISCLAIMER};
pub use pipeline::{FeaturePipeline, PreparedFeatures};

/// Result type for Cardiorisk operations
pub type Result<T> = std::result::Result<T, CardioError>;

/// Main error type for Cardiorisk
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error("Invalid answers: {0}")]
    Input(#[from] domain::InvalidAnswers),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ports::ArtifactError),

    #[error("Prediction failed: {0}")]
    Classifier(#[from] ports::ClassifierError),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<domain::InputError> for CardioError {
    fn from(err: domain::InputError) -> Self {
        Self::Input(domain::InvalidAnswers(vec![err]))
    }
}
