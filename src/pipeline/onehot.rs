//! One-hot expander with drop-first semantics.
//!
//! Works on a single row: at most one indicator per field is produced, for
//! the row's own category, and only when that category is not the
//! reference. Indicators for other categories are left for the schema
//! aligner to zero-fill.

use crate::domain::{ExpandedRow, Field, ImputedRow};

/// How a category code is rendered in its indicator column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFormat {
    /// `cp_1`
    Integer,
    /// `thal_6.0`; the column was float-typed when the model was trained.
    Float,
}

/// A categorical field that is one-hot expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneHotColumn {
    pub field: Field,
    /// Lowest code, dropped from the indicators.
    pub reference: u8,
    pub format: CodeFormat,
}

/// Expanded fields, in training order.
pub const ONE_HOT_COLUMNS: [OneHotColumn; 4] = [
    OneHotColumn {
        field: Field::Cp,
        reference: 0,
        format: CodeFormat::Integer,
    },
    OneHotColumn {
        field: Field::Restecg,
        reference: 0,
        format: CodeFormat::Integer,
    },
    OneHotColumn {
        field: Field::Slope,
        reference: 0,
        format: CodeFormat::Integer,
    },
    OneHotColumn {
        field: Field::Thal,
        reference: 3,
        format: CodeFormat::Float,
    },
];

impl OneHotColumn {
    /// Indicator column name for a code, e.g. `cp_3` or `thal_7.0`.
    #[must_use]
    pub fn indicator(&self, code: f64) -> String {
        match self.format {
            CodeFormat::Integer => format!("{}_{}", self.field.name(), code as i64),
            CodeFormat::Float => format!("{}_{:.1}", self.field.name(), code),
        }
    }

    fn is_reference(&self, code: f64) -> bool {
        code == f64::from(self.reference)
    }
}

/// Whether a field is replaced by indicator columns.
#[must_use]
pub fn is_one_hot(field: Field) -> bool {
    ONE_HOT_COLUMNS.iter().any(|c| c.field == field)
}

/// Expand the designated categorical fields; other fields pass through.
#[must_use]
pub fn expand(row: &ImputedRow) -> ExpandedRow {
    let mut expanded = ExpandedRow::default();

    for field in Field::ALL {
        if !is_one_hot(field) {
            expanded.insert(field.name(), row.get(field));
        }
    }

    for column in &ONE_HOT_COLUMNS {
        let code = row.get(column.field);
        if !column.is_reference(code) {
            expanded.insert(column.indicator(code), 1.0);
        }
    }

    expanded
}
