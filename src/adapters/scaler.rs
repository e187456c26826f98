//! Affine scaler adapter: Implementation of FeatureScaler.
//!
//! Reads the parameters exported by the training pipeline. Both supported
//! scaler kinds reduce to `y = x * slope + offset` per column:
//!
//! - `standard`: `(x - mean) / scale`
//! - `min_max`: `x * scale + min`

use serde::{Deserialize, Serialize};

use crate::ports::{FeatureScaler, ScalerError};

/// Scaler parameters as exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerParams {
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
    },
    MinMax {
        min: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
    },
}

/// Per-column affine transform.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineScaler {
    slope: Vec<f64>,
    offset: Vec<f64>,
    feature_names: Option<Vec<String>>,
}

impl AffineScaler {
    /// Build a scaler from exported parameters.
    ///
    /// # Errors
    /// Returns `ScalerError::InvalidParameters` for mismatched lengths,
    /// non-finite values, or a zero standard deviation.
    pub fn from_params(params: ScalerParams) -> Result<Self, ScalerError> {
        let (slope, offset, feature_names) = match params {
            ScalerParams::Standard {
                mean,
                scale,
                feature_names,
            } => {
                check_lengths(mean.len(), scale.len(), feature_names.as_deref())?;
                if let Some(i) = scale.iter().position(|s| *s == 0.0) {
                    return Err(ScalerError::InvalidParameters(format!(
                        "zero scale for column {i}"
                    )));
                }
                let slope: Vec<f64> = scale.iter().map(|s| 1.0 / s).collect();
                let offset = mean.iter().zip(&scale).map(|(m, s)| -m / s).collect();
                (slope, offset, feature_names)
            }
            ScalerParams::MinMax {
                min,
                scale,
                feature_names,
            } => {
                check_lengths(min.len(), scale.len(), feature_names.as_deref())?;
                (scale, min, feature_names)
            }
        };

        if slope.iter().chain(&offset).any(|v| !v.is_finite()) {
            return Err(ScalerError::InvalidParameters(
                "non-finite scaler parameter".into(),
            ));
        }

        Ok(Self {
            slope,
            offset,
            feature_names,
        })
    }

    /// Parse and validate exported JSON.
    ///
    /// # Errors
    /// Returns `ScalerError::InvalidParameters` for malformed JSON or parameters.
    pub fn from_json(json: &str) -> Result<Self, ScalerError> {
        let params: ScalerParams = serde_json::from_str(json)
            .map_err(|e| ScalerError::InvalidParameters(e.to_string()))?;
        Self::from_params(params)
    }

    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.slope.len()
    }
}

fn check_lengths(a: usize, b: usize, names: Option<&[String]>) -> Result<(), ScalerError> {
    if a == 0 || a != b || names.is_some_and(|n| n.len() != a) {
        return Err(ScalerError::InvalidParameters(
            "scaler parameter lengths are empty or inconsistent".into(),
        ));
    }
    Ok(())
}

impl FeatureScaler for AffineScaler {
    fn transform(&self, columns: &[&str], values: &[f64]) -> Result<Vec<f64>, ScalerError> {
        if values.len() != self.n_features() {
            return Err(ScalerError::ShapeMismatch {
                expected: self.n_features(),
                actual: values.len(),
            });
        }

        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(columns.iter().copied()) {
                return Err(ScalerError::ColumnMismatch {
                    expected: names.clone(),
                    actual: columns.iter().map(|c| (*c).to_string()).collect(),
                });
            }
        }

        Ok(values
            .iter()
            .zip(self.slope.iter().zip(&self.offset))
            .map(|(x, (a, b))| x * a + b)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaler() {
        let scaler = AffineScaler::from_json(
            r#"{"kind": "standard", "mean": [50.0, 200.0], "scale": [10.0, 40.0]}"#,
        )
        .expect("Should parse");

        let out = scaler
            .transform(&["age", "chol"], &[60.0, 180.0])
            .expect("Should transform");
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_scaler() {
        let scaler = AffineScaler::from_params(ScalerParams::MinMax {
            min: vec![-0.25],
            scale: vec![0.0125],
            feature_names: None,
        })
        .expect("Should build");

        let out = scaler.transform(&["age"], &[60.0]).expect("Should transform");
        assert!((out[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let scaler = AffineScaler::from_json(
            r#"{"kind": "standard", "mean": [1.0, 2.0], "scale": [1.0, 1.0]}"#,
        )
        .expect("Should parse");

        let err = scaler.transform(&["age"], &[1.0]).expect_err("must fail");
        assert_eq!(
            err,
            ScalerError::ShapeMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_column_mismatch() {
        let scaler = AffineScaler::from_json(
            r#"{"kind": "standard", "mean": [1.0, 2.0], "scale": [1.0, 1.0],
                "feature_names": ["age", "chol"]}"#,
        )
        .expect("Should parse");

        assert!(scaler.transform(&["age", "chol"], &[1.0, 2.0]).is_ok());
        let err = scaler
            .transform(&["chol", "age"], &[1.0, 2.0])
            .expect_err("must fail");
        assert!(matches!(err, ScalerError::ColumnMismatch { .. }));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(AffineScaler::from_json(r#"{"kind": "standard", "mean": [1.0], "scale": [0.0]}"#)
            .is_err());
        assert!(AffineScaler::from_json(r#"{"kind": "standard", "mean": [1.0], "scale": []}"#)
            .is_err());
        assert!(AffineScaler::from_json(r#"{"kind": "robust", "center": [1.0]}"#).is_err());
    }
}
