//! Input field catalogue.
//!
//! The thirteen questionnaire fields in the order the training data
//! stored them, with their numeric bounds and imputation fallbacks.

use serde::{Deserialize, Serialize};

/// Number of questionnaire fields.
pub const FIELD_COUNT: usize = 13;

/// One questionnaire field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Age,
    Sex,
    Cp,
    Trestbps,
    Chol,
    Fbs,
    Restecg,
    Thalach,
    Exang,
    Oldpeak,
    Slope,
    Ca,
    Thal,
}

impl Field {
    /// All fields, in training column order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Age,
        Field::Sex,
        Field::Cp,
        Field::Trestbps,
        Field::Chol,
        Field::Fbs,
        Field::Restecg,
        Field::Thalach,
        Field::Exang,
        Field::Oldpeak,
        Field::Slope,
        Field::Ca,
        Field::Thal,
    ];

    /// Column name used by the training data.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::Cp => "cp",
            Self::Trestbps => "trestbps",
            Self::Chol => "chol",
            Self::Fbs => "fbs",
            Self::Restecg => "restecg",
            Self::Thalach => "thalach",
            Self::Exang => "exang",
            Self::Oldpeak => "oldpeak",
            Self::Slope => "slope",
            Self::Ca => "ca",
            Self::Thal => "thal",
        }
    }

    /// Position of this field in [`Field::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Substitute for a missing answer.
    ///
    /// Approximates the training-set central tendency. Note that `cp` falls
    /// back to 1 (atypical angina) and `thal` to 3 (normal), both of which are
    /// real category codes, so imputed rows one-hot expand like answered ones.
    #[must_use]
    pub fn fallback(self) -> f64 {
        match self {
            Self::Age => 54.0,
            Self::Sex => 1.0,
            Self::Cp => 1.0,
            Self::Trestbps => 120.0,
            Self::Chol => 240.0,
            Self::Fbs => 0.0,
            Self::Restecg => 0.0,
            Self::Thalach => 150.0,
            Self::Exang => 0.0,
            Self::Oldpeak => 1.0,
            Self::Slope => 1.0,
            Self::Ca => 0.0,
            Self::Thal => 3.0,
        }
    }

    /// Inclusive bounds for free numeric fields, `None` for enumerated ones.
    #[must_use]
    pub fn bounds(self) -> Option<(f64, f64)> {
        match self {
            Self::Age => Some((20.0, 100.0)),
            Self::Trestbps => Some((80.0, 200.0)),
            Self::Chol => Some((100.0, 600.0)),
            Self::Thalach => Some((60.0, 210.0)),
            Self::Oldpeak => Some((0.0, 6.0)),
            _ => None,
        }
    }

    /// Whether answers for this field must be whole numbers.
    #[must_use]
    pub fn is_integer(self) -> bool {
        !matches!(self, Self::Oldpeak)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_fallbacks_are_total_and_in_bounds() {
        for field in Field::ALL {
            let fallback = field.fallback();
            assert!(fallback.is_finite(), "{field} fallback not finite");
            if let Some((lo, hi)) = field.bounds() {
                assert!((lo..=hi).contains(&fallback), "{field} fallback out of range");
            }
        }
        assert!((Field::Cp.fallback() - 1.0).abs() < f64::EPSILON);
        assert!((Field::Thal.fallback() - 3.0).abs() < f64::EPSILON);
    }
}
