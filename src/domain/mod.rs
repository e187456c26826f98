//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! Categorical answers carry their training codes; rows and vectors
//! describe each stage of the feature pipeline.

pub mod answers;
mod diagnosis;
mod features;
mod field;
pub mod form;

pub use answers::{Answer, Categorical, InputError, InvalidAnswers, RawAnswers};
pub use diagnosis::{Diagnosis, DiagnosisResult, RiskLevel, DISCLAIMER};
pub use features::{
    CanonicalFeatureList, EncodedRow, ExpandedRow, FeatureListError, FeatureVector, ImputedRow,
    ScalingOutcome, DEFAULT_FEATURE_COLUMNS,
};
pub use field::{Field, FIELD_COUNT};
pub use form::{AnswerForm, FormValue};
