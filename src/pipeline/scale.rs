//! Scaler applier: affine transform on the numeric columns only.

use crate::domain::{FeatureVector, ScalingOutcome};
use crate::ports::{FeatureScaler, ScalerError};

/// Columns the scaler was fitted on, in fitting order. Indicator columns
/// are never scaled.
pub const SCALED_COLUMNS: [&str; 9] = [
    "age", "sex", "trestbps", "chol", "fbs", "thalach", "exang", "oldpeak", "ca",
];

/// Scale the numeric columns of `vector` in place.
///
/// The update is all-or-nothing: on any scaler failure the vector is left
/// untouched and the failure is reported in the outcome instead of
/// aborting the request.
pub fn apply_scaler(
    vector: &mut FeatureVector,
    scaler: Option<&dyn FeatureScaler>,
) -> ScalingOutcome {
    let Some(scaler) = scaler else {
        return ScalingOutcome::Absent;
    };

    let (columns, positions): (Vec<&str>, Vec<usize>) = SCALED_COLUMNS
        .iter()
        .filter_map(|c| {
            vector
                .columns()
                .iter()
                .position(|v| v == c)
                .map(|i| (*c, i))
        })
        .unzip();

    if positions.is_empty() {
        tracing::debug!("No scalable columns in the feature list");
        return ScalingOutcome::Applied { columns: 0 };
    }

    let input: Vec<f64> = positions.iter().map(|&i| vector.values()[i]).collect();

    let scaled = scaler.transform(&columns, &input).and_then(|out| {
        if out.len() == input.len() {
            Ok(out)
        } else {
            Err(ScalerError::ShapeMismatch {
                expected: input.len(),
                actual: out.len(),
            })
        }
    });

    match scaled {
        Ok(out) => {
            let values = vector.values_mut();
            for (&i, v) in positions.iter().zip(out) {
                values[i] = v;
            }
            ScalingOutcome::Applied {
                columns: positions.len(),
            }
        }
        Err(e) => {
            tracing::warn!("Scaler transform failed, continuing unscaled: {e}");
            ScalingOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CanonicalFeatureList, ExpandedRow};
    use crate::pipeline::align;

    /// Doubles every value.
    struct Doubler;

    impl FeatureScaler for Doubler {
        fn transform(&self, _columns: &[&str], values: &[f64]) -> Result<Vec<f64>, ScalerError> {
            Ok(values.iter().map(|v| v * 2.0).collect())
        }
    }

    /// Returns the wrong number of values.
    struct Truncating;

    impl FeatureScaler for Truncating {
        fn transform(&self, _columns: &[&str], values: &[f64]) -> Result<Vec<f64>, ScalerError> {
            Ok(values[1..].to_vec())
        }
    }

    fn vector() -> FeatureVector {
        let mut row = ExpandedRow::default();
        for (i, column) in SCALED_COLUMNS.iter().enumerate() {
            row.insert(*column, i as f64 + 1.0);
        }
        row.insert("cp_2", 1.0);
        align(&row, &CanonicalFeatureList::default())
    }

    #[test]
    fn test_absent_scaler_is_identity() {
        let mut v = vector();
        let before = v.clone();
        assert_eq!(apply_scaler(&mut v, None), ScalingOutcome::Absent);
        assert_eq!(v, before);
    }

    #[test]
    fn test_scaler_touches_numeric_columns_only() {
        let mut v = vector();
        let outcome = apply_scaler(&mut v, Some(&Doubler));

        assert_eq!(outcome, ScalingOutcome::Applied { columns: 9 });
        assert_eq!(v.get("age"), Some(2.0));
        assert_eq!(v.get("ca"), Some(18.0));
        assert_eq!(v.get("cp_2"), Some(1.0));
        assert_eq!(v.get("cp_1"), Some(0.0));
    }

    #[test]
    fn test_failed_scaler_leaves_vector_unscaled() {
        let mut v = vector();
        let before = v.clone();
        let outcome = apply_scaler(&mut v, Some(&Truncating));

        assert!(matches!(outcome, ScalingOutcome::Failed { .. }));
        assert_eq!(v, before);
    }

    #[test]
    fn test_scaler_skipped_without_numeric_columns() {
        let schema = CanonicalFeatureList::new(vec!["cp_1".into()]).expect("valid schema");
        let mut v = align(&ExpandedRow::default(), &schema);
        assert_eq!(
            apply_scaler(&mut v, Some(&Doubler)),
            ScalingOutcome::Applied { columns: 0 }
        );
    }
}
