//! Untyped answer form, as submitted by a front end.
//!
//! Each field may be missing, `null`, a number, or a text label. Collection
//! turns the form into [`RawAnswers`], rejecting anything the trained
//! schema does not know about.

use serde::{Deserialize, Serialize};

use crate::domain::answers::{
    check_bounds, Answer, Categorical, ChestPain, InputError, InvalidAnswers, RawAnswers,
    RestingEcg, Sex, StSlope, Thal, Vessels, YesNo,
};
use crate::domain::Field;

/// Labels accepted as the explicit unknown answer.
const UNKNOWN_LABELS: [&str; 2] = ["unknown", "i don't know"];

/// A single submitted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    fn is_unknown(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(t) => {
                let t = t.trim();
                t.is_empty() || UNKNOWN_LABELS.iter().any(|u| t.eq_ignore_ascii_case(u))
            }
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Questionnaire as submitted. Absent fields mean "I don't know".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trestbps: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chol: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbs: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restecg: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thalach: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exang: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oldpeak: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thal: Option<FormValue>,
}

impl AnswerForm {
    fn slot(&mut self, field: Field) -> &mut Option<FormValue> {
        match field {
            Field::Age => &mut self.age,
            Field::Sex => &mut self.sex,
            Field::Cp => &mut self.cp,
            Field::Trestbps => &mut self.trestbps,
            Field::Chol => &mut self.chol,
            Field::Fbs => &mut self.fbs,
            Field::Restecg => &mut self.restecg,
            Field::Thalach => &mut self.thalach,
            Field::Exang => &mut self.exang,
            Field::Oldpeak => &mut self.oldpeak,
            Field::Slope => &mut self.slope,
            Field::Ca => &mut self.ca,
            Field::Thal => &mut self.thal,
        }
    }

    /// Submitted value for a field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FormValue> {
        match field {
            Field::Age => self.age.as_ref(),
            Field::Sex => self.sex.as_ref(),
            Field::Cp => self.cp.as_ref(),
            Field::Trestbps => self.trestbps.as_ref(),
            Field::Chol => self.chol.as_ref(),
            Field::Fbs => self.fbs.as_ref(),
            Field::Restecg => self.restecg.as_ref(),
            Field::Thalach => self.thalach.as_ref(),
            Field::Exang => self.exang.as_ref(),
            Field::Oldpeak => self.oldpeak.as_ref(),
            Field::Slope => self.slope.as_ref(),
            Field::Ca => self.ca.as_ref(),
            Field::Thal => self.thal.as_ref(),
        }
    }

    /// Set (or overwrite) one field.
    pub fn set(&mut self, field: Field, value: impl Into<FormValue>) {
        *self.slot(field) = Some(value.into());
    }

    /// Overlay every field present in `other` onto this form.
    pub fn merge(&mut self, other: AnswerForm) {
        for field in Field::ALL {
            if let Some(value) = other.get(field) {
                *self.slot(field) = Some(value.clone());
            }
        }
    }

    /// Turn the form into typed answers.
    ///
    /// # Errors
    /// Returns every invalid field at once. An unrecognised categorical label
    /// is always an error, never a silent default.
    pub fn collect(&self) -> Result<RawAnswers, InvalidAnswers> {
        let mut errors = Vec::new();

        let answers = RawAnswers {
            age: self.integer(Field::Age, &mut errors),
            sex: self.categorical::<Sex>(Field::Sex, &mut errors),
            cp: self.categorical::<ChestPain>(Field::Cp, &mut errors),
            trestbps: self.integer(Field::Trestbps, &mut errors),
            chol: self.integer(Field::Chol, &mut errors),
            fbs: self.categorical::<YesNo>(Field::Fbs, &mut errors),
            restecg: self.categorical::<RestingEcg>(Field::Restecg, &mut errors),
            thalach: self.integer(Field::Thalach, &mut errors),
            exang: self.categorical::<YesNo>(Field::Exang, &mut errors),
            oldpeak: self.numeric(Field::Oldpeak, &mut errors),
            slope: self.categorical::<StSlope>(Field::Slope, &mut errors),
            ca: self.categorical::<Vessels>(Field::Ca, &mut errors),
            thal: self.categorical::<Thal>(Field::Thal, &mut errors),
        };

        if errors.is_empty() {
            Ok(answers)
        } else {
            Err(InvalidAnswers(errors))
        }
    }

    fn numeric(&self, field: Field, errors: &mut Vec<InputError>) -> Answer<f64> {
        let value = match self.get(field) {
            None => return Answer::Unknown,
            Some(v) if v.is_unknown() => return Answer::Unknown,
            Some(FormValue::Number(n)) => *n,
            Some(FormValue::Text(t)) => match t.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => {
                    errors.push(InputError::NotANumber {
                        field,
                        value: t.clone(),
                    });
                    return Answer::Unknown;
                }
            },
        };

        match check_bounds(field, value) {
            Ok(()) => Answer::Known(value),
            Err(e) => {
                errors.push(e);
                Answer::Unknown
            }
        }
    }

    fn integer(&self, field: Field, errors: &mut Vec<InputError>) -> Answer<u16> {
        match self.numeric(field, errors) {
            Answer::Known(v) if v.fract() != 0.0 => {
                errors.push(InputError::NotAnInteger { field, value: v });
                Answer::Unknown
            }
            // Bounds were already checked, so the value fits.
            Answer::Known(v) => Answer::Known(v as u16),
            Answer::Unknown => Answer::Unknown,
        }
    }

    fn categorical<T: Categorical>(
        &self,
        field: Field,
        errors: &mut Vec<InputError>,
    ) -> Answer<T> {
        let label = match self.get(field) {
            None => return Answer::Unknown,
            Some(v) if v.is_unknown() => return Answer::Unknown,
            Some(FormValue::Text(t)) => t.clone(),
            Some(FormValue::Number(n)) => render_number(*n),
        };

        match T::from_label(&label) {
            Some(v) => Answer::Known(v),
            None => {
                errors.push(InputError::UnknownLabel { field, label });
                Answer::Unknown
            }
        }
    }
}

/// Render whole numbers without a fractional part so `2.0` matches label `"2"`.
fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
