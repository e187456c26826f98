//! Sanitizer: last gate before the classifier.

use crate::domain::FeatureVector;

/// Replace NaN and infinite entries with 0.
///
/// Returns the number of entries replaced.
pub fn sanitize(vector: &mut FeatureVector) -> usize {
    let mut replaced = 0;
    for value in vector.values_mut() {
        if !value.is_finite() {
            *value = 0.0;
            replaced += 1;
        }
    }

    if replaced > 0 {
        tracing::warn!("Replaced {replaced} non-finite feature value(s) with 0");
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CanonicalFeatureList, ExpandedRow};
    use crate::pipeline::align;

    #[test]
    fn test_sanitize_replaces_non_finite() {
        let mut row = ExpandedRow::default();
        row.insert("age", f64::NAN);
        row.insert("chol", f64::INFINITY);
        row.insert("oldpeak", f64::NEG_INFINITY);
        row.insert("thalach", 150.0);
        let mut vector = align(&row, &CanonicalFeatureList::default());

        assert_eq!(sanitize(&mut vector), 3);
        assert!(vector.is_finite());
        assert_eq!(vector.get("age"), Some(0.0));
        assert_eq!(vector.get("thalach"), Some(150.0));
        assert_eq!(sanitize(&mut vector), 0);
    }
}
