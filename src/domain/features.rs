//! Intermediate rows and the final feature vector.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::field::{Field, FIELD_COUNT};

/// Columns the classifier was trained on, when no feature list artifact is
/// shipped: the numeric fields followed by the drop-first one-hot indicators.
pub const DEFAULT_FEATURE_COLUMNS: [&str; 18] = [
    "age",
    "sex",
    "trestbps",
    "chol",
    "fbs",
    "thalach",
    "exang",
    "oldpeak",
    "ca",
    "cp_1",
    "cp_2",
    "cp_3",
    "restecg_1",
    "restecg_2",
    "slope_1",
    "slope_2",
    "thal_6.0",
    "thal_7.0",
];

/// Answers translated to training codes; `None` marks a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EncodedRow {
    values: [Option<f64>; FIELD_COUNT],
}

impl EncodedRow {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<f64> {
        self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, value: Option<f64>) {
        self.values[field.index()] = value;
    }

    /// Fields currently holding the missing marker.
    pub fn missing(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|f| self.get(*f).is_none())
    }
}

/// Encoded row with every missing value replaced by its fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedRow {
    values: [f64; FIELD_COUNT],
    imputed: Vec<Field>,
}

impl ImputedRow {
    pub(crate) fn new(values: [f64; FIELD_COUNT], imputed: Vec<Field>) -> Self {
        Self { values, imputed }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> f64 {
        self.values[field.index()]
    }

    /// Fields that were filled from the fallback table.
    #[must_use]
    pub fn imputed(&self) -> &[Field] {
        &self.imputed
    }
}

/// Row after one-hot expansion, keyed by column name.
///
/// Only columns with a value are present: indicators for categories the
/// row does not have are absent, not zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedRow {
    columns: BTreeMap<String, f64>,
}

impl ExpandedRow {
    pub fn insert(&mut self, column: impl Into<String>, value: f64) {
        self.columns.insert(column.into(), value);
    }

    pub fn remove(&mut self, column: &str) -> Option<f64> {
        self.columns.remove(column)
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns.get(column).copied()
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Error for a malformed feature list.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureListError {
    #[error("feature list is empty")]
    Empty,

    #[error("duplicate feature column {0:?}")]
    Duplicate(String),
}

/// Ordered column schema the classifier was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CanonicalFeatureList {
    columns: Vec<String>,
}

impl CanonicalFeatureList {
    /// Build a list, rejecting empty or duplicated schemas.
    ///
    /// # Errors
    /// Returns `FeatureListError` if the list is empty or has duplicates.
    pub fn new(columns: Vec<String>) -> Result<Self, FeatureListError> {
        if columns.is_empty() {
            return Err(FeatureListError::Empty);
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(FeatureListError::Duplicate(column.clone()));
            }
        }
        Ok(Self { columns })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }
}

impl Default for CanonicalFeatureList {
    fn default() -> Self {
        Self {
            columns: DEFAULT_FEATURE_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for CanonicalFeatureList {
    type Error = FeatureListError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<CanonicalFeatureList> for Vec<String> {
    fn from(list: CanonicalFeatureList) -> Self {
        list.columns
    }
}

/// Model input: one value per canonical column, in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Pair canonical columns with values.
    ///
    /// Lengths must match; the aligner is the only producer.
    pub(crate) fn new(schema: &CanonicalFeatureList, values: Vec<f64>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self {
            columns: schema.columns().to_vec(),
            values,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Value of a named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// Which scaling branch a request took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScalingOutcome {
    /// Scaler present and applied to this many columns.
    Applied { columns: usize },
    /// Scaler present but the transform failed; values left unscaled.
    Failed { reason: String },
    /// No scaler configured.
    Absent,
}

impl std::fmt::Display for ScalingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied { columns } => write!(f, "scaled ({columns} columns)"),
            Self::Failed { reason } => write!(f, "unscaled (scaler failed: {reason})"),
            Self::Absent => write!(f, "unscaled (no scaler)"),
        }
    }
}
