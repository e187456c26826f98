//! Logistic regression adapter: Implementation of Classifier.
//!
//! Scores the canonical feature vector with coefficients exported by the
//! training pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::{CanonicalFeatureList, FeatureVector};
use crate::ports::{ArtifactError, Classifier, ClassifierError};

fn default_threshold() -> f64 {
    0.5
}

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Probability at or above which the positive label is returned.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticModel {
    /// Parse and validate exported JSON.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` for malformed JSON or parameters.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let model: Self = serde_json::from_str(json).map_err(|e| ArtifactError::Invalid {
            name: "model".into(),
            reason: e.to_string(),
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Basic sanity checks on the exported parameters.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let invalid = |reason: String| ArtifactError::Invalid {
            name: "model".into(),
            reason,
        };

        let n = self.feature_names.len();
        if n == 0 || self.coefficients.len() != n {
            return Err(invalid(format!(
                "{} feature names but {} coefficients",
                n,
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(invalid("non-finite coefficient".into()));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(invalid(format!(
                "threshold {} outside (0, 1)",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Check that the model was trained on exactly this schema.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` if names or order differ.
    pub fn check_schema(&self, schema: &CanonicalFeatureList) -> Result<(), ArtifactError> {
        if self.feature_names.as_slice() != schema.columns() {
            return Err(ArtifactError::Invalid {
                name: "model".into(),
                reason: format!(
                    "model features {:?} do not match feature list {:?}",
                    self.feature_names,
                    schema.columns()
                ),
            });
        }
        Ok(())
    }

    fn logit(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        if features.columns() != self.feature_names.as_slice() {
            return Err(ClassifierError::FeatureMismatch {
                expected: self.feature_names.clone(),
                actual: features.columns().to_vec(),
            });
        }

        Ok(self
            .coefficients
            .iter()
            .zip(features.values())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for LogisticModel {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ClassifierError> {
        let p = self.predict_probability(features)?;
        Ok(u8::from(p >= self.threshold))
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        let p = sigmoid(self.logit(features)?);
        if !p.is_finite() {
            return Err(ClassifierError::InvalidProbability(p));
        }
        Ok(p)
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpandedRow;
    use crate::pipeline::align;

    fn schema() -> CanonicalFeatureList {
        CanonicalFeatureList::new(vec!["age".into(), "cp_3".into()]).expect("valid schema")
    }

    fn model() -> LogisticModel {
        LogisticModel {
            feature_names: vec!["age".into(), "cp_3".into()],
            coefficients: vec![0.1, 2.0],
            intercept: -6.0,
            threshold: 0.5,
        }
    }

    fn vector(age: f64, cp_3: f64) -> FeatureVector {
        let mut row = ExpandedRow::default();
        row.insert("age", age);
        row.insert("cp_3", cp_3);
        align(&row, &schema())
    }

    #[test]
    fn test_probability_and_label() {
        let model = model();

        let p = model
            .predict_probability(&vector(60.0, 0.0))
            .expect("Should score");
        assert!((p - 0.5).abs() < 1e-12);
        assert_eq!(model.predict(&vector(60.0, 0.0)).expect("Should score"), 1);
        assert_eq!(model.predict(&vector(40.0, 0.0)).expect("Should score"), 0);

        let high = model
            .predict_probability(&vector(60.0, 1.0))
            .expect("Should score");
        assert!(high > 0.85 && high < 1.0);
    }

    #[test]
    fn test_feature_mismatch() {
        let other = CanonicalFeatureList::new(vec!["cp_3".into(), "age".into()])
            .expect("valid schema");
        let v = align(&ExpandedRow::default(), &other);

        let err = model().predict(&v).expect_err("must fail");
        assert!(matches!(err, ClassifierError::FeatureMismatch { .. }));
        assert!(model().check_schema(&other).is_err());
        assert!(model().check_schema(&schema()).is_ok());
    }

    #[test]
    fn test_from_json_validates() {
        let ok = LogisticModel::from_json(
            r#"{"feature_names": ["age"], "coefficients": [0.05], "intercept": -2.7}"#,
        )
        .expect("Should parse");
        assert!((ok.threshold - 0.5).abs() < f64::EPSILON);

        assert!(LogisticModel::from_json(
            r#"{"feature_names": ["age", "sex"], "coefficients": [0.05], "intercept": 0.0}"#
        )
        .is_err());
        assert!(LogisticModel::from_json(
            r#"{"feature_names": ["age"], "coefficients": [0.05], "intercept": 0.0, "threshold": 1.5}"#
        )
        .is_err());
    }
}
