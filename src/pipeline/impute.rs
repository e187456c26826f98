//! Imputer: replace missing codes with per-field fallbacks.

use crate::domain::{EncodedRow, Field, ImputedRow, FIELD_COUNT};

/// Fill every missing value from [`Field::fallback`].
///
/// Runs on coded values, before one-hot expansion, so an imputed
/// categorical expands exactly like an answered one.
#[must_use]
pub fn impute(row: &EncodedRow) -> ImputedRow {
    let mut values = [0.0; FIELD_COUNT];
    let mut imputed = Vec::new();

    for field in Field::ALL {
        values[field.index()] = match row.get(field) {
            Some(v) => v,
            None => {
                imputed.push(field);
                field.fallback()
            }
        };
    }

    if !imputed.is_empty() {
        tracing::debug!("Imputed {} field(s): {:?}", imputed.len(), imputed);
    }

    ImputedRow::new(values, imputed)
}
