//! Schema aligner: reindex an expanded row onto the trained column order.

use crate::domain::{CanonicalFeatureList, ExpandedRow, FeatureVector};

/// Produce one value per canonical column, in canonical order.
///
/// Columns the row lacks are filled with 0. Columns the schema lacks are
/// dropped.
#[must_use]
pub fn align(row: &ExpandedRow, schema: &CanonicalFeatureList) -> FeatureVector {
    let values: Vec<f64> = schema
        .columns()
        .iter()
        .map(|column| row.get(column).unwrap_or(0.0))
        .collect();

    let dropped: Vec<&str> = row.columns().filter(|c| !schema.contains(c)).collect();
    if !dropped.is_empty() {
        tracing::warn!(
            "Dropping {} column(s) not in the trained feature list: {:?}",
            dropped.len(),
            dropped
        );
    }

    FeatureVector::new(schema, values)
}
