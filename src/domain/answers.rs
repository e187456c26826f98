//! Questionnaire answers and their trained category codes.
//!
//! Every enumerated answer carries the integer code the classifier was
//! trained on. The codes are arbitrary (e.g. `thal` uses 3/6/7), so they live
//! next to the labels where a schema change is visible in review.

use crate::domain::Field;

/// Error raised while turning user input into typed answers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// A label outside the field's enumeration: the UI and the training
    /// schema disagree.
    #[error("Unrecognised label {label:?} for field {field}")]
    UnknownLabel { field: Field, label: String },

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} expects a number, got {value:?}")]
    NotANumber { field: Field, value: String },

    #[error("{field} expects a whole number, got {value}")]
    NotAnInteger { field: Field, value: f64 },
}

/// All problems found in one set of answers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", describe(.0))]
pub struct InvalidAnswers(pub Vec<InputError>);

fn describe(errors: &[InputError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// An enumerated answer with a fixed training code.
pub trait Categorical: Copy + Sized + 'static {
    /// Every category, lowest code first.
    const VARIANTS: &'static [Self];

    /// Code used in the training data.
    fn code(self) -> u8;

    /// Label shown to the user.
    fn label(self) -> &'static str;

    /// Look a label up, ignoring case and surrounding whitespace.
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(label))
    }
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($label:literal, $code:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Categorical for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical! {
    /// Biological sex (`sex`).
    Sex {
        Female => ("Female", 0),
        Male => ("Male", 1),
    }
}

categorical! {
    /// Chest pain type (`cp`).
    ChestPain {
        TypicalAngina => ("Typical Angina", 0),
        AtypicalAngina => ("Atypical Angina", 1),
        NonAnginalPain => ("Non-anginal Pain", 2),
        Asymptomatic => ("Asymptomatic", 3),
    }
}

categorical! {
    /// Yes/no answer (`fbs`, `exang`).
    YesNo {
        No => ("No", 0),
        Yes => ("Yes", 1),
    }
}

categorical! {
    /// Resting electrocardiogram result (`restecg`).
    RestingEcg {
        Normal => ("Normal", 0),
        StTAbnormality => ("ST-T abnormality", 1),
        LeftVentricularHypertrophy => ("Left ventricular hypertrophy", 2),
    }
}

categorical! {
    /// Slope of the peak exercise ST segment (`slope`).
    StSlope {
        Upsloping => ("Upsloping", 0),
        Flat => ("Flat", 1),
        Downsloping => ("Downsloping", 2),
    }
}

categorical! {
    /// Major vessels coloured by fluoroscopy (`ca`).
    Vessels {
        Zero => ("0", 0),
        One => ("1", 1),
        Two => ("2", 2),
        Three => ("3", 3),
    }
}

categorical! {
    /// Thalassemia test result (`thal`).
    Thal {
        Normal => ("Normal", 3),
        FixedDefect => ("Fixed defect", 6),
        ReversibleDefect => ("Reversible defect", 7),
    }
}

/// A single answer: a value, or the explicit "I don't know".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Answer<T> {
    Known(T),
    Unknown,
}

impl<T> Default for Answer<T> {
    fn default() -> Self {
        Self::Unknown
    }
}

impl<T> Answer<T> {
    /// The value, if the user gave one.
    pub fn known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl<T> From<Option<T>> for Answer<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

/// The full questionnaire for one prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawAnswers {
    /// Age in years (20-100)
    pub age: Answer<u16>,
    pub sex: Answer<Sex>,
    pub cp: Answer<ChestPain>,
    /// Resting blood pressure in mm Hg (80-200)
    pub trestbps: Answer<u16>,
    /// Serum cholesterol in mg/dl (100-600)
    pub chol: Answer<u16>,
    /// Fasting blood sugar > 120 mg/dl
    pub fbs: Answer<YesNo>,
    pub restecg: Answer<RestingEcg>,
    /// Maximum heart rate achieved (60-210)
    pub thalach: Answer<u16>,
    /// Exercise induced angina
    pub exang: Answer<YesNo>,
    /// ST depression induced by exercise (0.0-6.0)
    pub oldpeak: Answer<f64>,
    pub slope: Answer<StSlope>,
    pub ca: Answer<Vessels>,
    pub thal: Answer<Thal>,
}

impl RawAnswers {
    /// Every field answered "I don't know".
    #[must_use]
    pub fn all_unknown() -> Self {
        Self::default()
    }

    /// Check free numeric answers against their bounds.
    ///
    /// Enumerated answers are valid by construction.
    ///
    /// # Errors
    /// Returns every violation found.
    pub fn validate(&self) -> Result<(), InvalidAnswers> {
        let numeric = [
            (Field::Age, self.age.known().map(f64::from)),
            (Field::Trestbps, self.trestbps.known().map(f64::from)),
            (Field::Chol, self.chol.known().map(f64::from)),
            (Field::Thalach, self.thalach.known().map(f64::from)),
            (Field::Oldpeak, self.oldpeak.known()),
        ];

        let errors: Vec<InputError> = numeric
            .into_iter()
            .filter_map(|(field, value)| value.and_then(|v| check_bounds(field, v).err()))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(InvalidAnswers(errors))
        }
    }
}

/// Check a value against the field's bounds (no-op for enumerated fields).
///
/// # Errors
/// Returns `InputError::OutOfRange` for values outside the bounds, NaN included.
pub fn check_bounds(field: Field, value: f64) -> Result<(), InputError> {
    match field.bounds() {
        Some((min, max)) if !(min..=max).contains(&value) => Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_training_tables() {
        assert_eq!(Sex::Male.code(), 1);
        assert_eq!(Sex::Female.code(), 0);
        assert_eq!(ChestPain::TypicalAngina.code(), 0);
        assert_eq!(ChestPain::Asymptomatic.code(), 3);
        assert_eq!(RestingEcg::LeftVentricularHypertrophy.code(), 2);
        assert_eq!(StSlope::Flat.code(), 1);
        assert_eq!(Thal::Normal.code(), 3);
        assert_eq!(Thal::FixedDefect.code(), 6);
        assert_eq!(Thal::ReversibleDefect.code(), 7);
    }

    #[test]
    fn test_variants_sorted_by_code() {
        fn sorted<T: Categorical>() -> bool {
            T::VARIANTS.windows(2).all(|w| w[0].code() < w[1].code())
        }
        assert!(sorted::<Sex>());
        assert!(sorted::<ChestPain>());
        assert!(sorted::<YesNo>());
        assert!(sorted::<RestingEcg>());
        assert!(sorted::<StSlope>());
        assert!(sorted::<Vessels>());
        assert!(sorted::<Thal>());
    }

    #[test]
    fn test_from_label_is_case_insensitive() {
        assert_eq!(ChestPain::from_label("asymptomatic"), Some(ChestPain::Asymptomatic));
        assert_eq!(
            RestingEcg::from_label("  ST-T Abnormality "),
            Some(RestingEcg::StTAbnormality)
        );
        assert_eq!(Vessels::from_label("2"), Some(Vessels::Two));
        assert_eq!(Thal::from_label("Reversible"), None);
    }

    #[test]
    fn test_validate_reports_all_violations() {
        let answers = RawAnswers {
            age: Answer::Known(12),
            chol: Answer::Known(700),
            oldpeak: Answer::Known(f64::NAN),
            ..RawAnswers::all_unknown()
        };

        let err = answers.validate().expect_err("must reject");
        assert_eq!(err.0.len(), 3);
        assert!(err.to_string().contains("age = 12"));
    }

    #[test]
    fn test_all_unknown_is_valid() {
        assert!(RawAnswers::all_unknown().validate().is_ok());
    }
}
