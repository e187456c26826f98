//! Feature pipeline: questionnaire answers to classifier input.
//!
//! Stages run strictly forward:
//! 1. `encode` - labels to training codes (missing marker for unknown)
//! 2. `impute` - fallback constants for missing codes
//! 3. `onehot` - drop-first indicator columns for `cp`, `restecg`, `slope`, `thal`
//! 4. `align` - reindex onto the trained column order, zero-filling gaps
//! 5. `scale` - persisted affine transform on numeric columns, if available
//! 6. `sanitize` - non-finite values to 0
//!
//! The pipeline holds only read-only configuration and can be shared
//! between threads.

mod align;
mod encode;
mod impute;
pub mod onehot;
mod sanitize;
pub mod scale;

use std::sync::Arc;

use crate::domain::{
    CanonicalFeatureList, Field, FeatureVector, InvalidAnswers, RawAnswers, ScalingOutcome,
};
use crate::ports::FeatureScaler;

pub use align::align;
pub use encode::encode;
pub use impute::impute;
pub use onehot::expand;
pub use sanitize::sanitize;
pub use scale::apply_scaler;

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFeatures {
    /// Finite vector in canonical order
    pub vector: FeatureVector,
    /// Fields filled from fallbacks
    pub imputed: Vec<Field>,
    /// Which scaling branch was taken
    pub scaling: ScalingOutcome,
    /// Entries replaced by the sanitizer
    pub sanitized: usize,
}

/// Configured feature pipeline.
#[derive(Clone)]
pub struct FeaturePipeline {
    schema: CanonicalFeatureList,
    scaler: Option<Arc<dyn FeatureScaler>>,
}

impl FeaturePipeline {
    /// Create a pipeline for a trained schema and optional scaler.
    pub fn new(schema: CanonicalFeatureList, scaler: Option<Arc<dyn FeatureScaler>>) -> Self {
        Self { schema, scaler }
    }

    #[must_use]
    pub fn schema(&self) -> &CanonicalFeatureList {
        &self.schema
    }

    #[must_use]
    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    /// Run every stage on one set of answers.
    ///
    /// # Errors
    /// Returns `InvalidAnswers` if a numeric answer is outside its bounds.
    pub fn prepare(&self, answers: &RawAnswers) -> Result<PreparedFeatures, InvalidAnswers> {
        answers.validate()?;

        let encoded = encode(answers);
        let imputed = impute(&encoded);
        let expanded = expand(&imputed);
        tracing::debug!("Expanded row has {} column(s)", expanded.len());

        let mut vector = align(&expanded, &self.schema);
        let scaling = apply_scaler(&mut vector, self.scaler.as_deref());
        let sanitized = sanitize(&mut vector);

        Ok(PreparedFeatures {
            vector,
            imputed: imputed.imputed().to_vec(),
            scaling,
            sanitized,
        })
    }
}

impl std::fmt::Debug for FeaturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturePipeline")
            .field("schema", &self.schema)
            .field("scaler", &self.scaler.is_some())
            .finish()
    }
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::new(CanonicalFeatureList::default(), None)
    }
}
