//! Categorical encoder: typed answers to training codes.

use crate::domain::{Answer, Categorical, EncodedRow, Field, RawAnswers};

fn category<T: Categorical>(answer: Answer<T>) -> Option<f64> {
    answer.known().map(|v| f64::from(v.code()))
}

fn number<T: Into<f64>>(answer: Answer<T>) -> Option<f64> {
    answer.known().map(Into::into)
}

/// Translate every answer to its trained code, or the missing marker for
/// "I don't know".
///
/// Labels were already checked against the enumerations when the answers
/// were collected, so encoding cannot fail.
#[must_use]
pub fn encode(answers: &RawAnswers) -> EncodedRow {
    let mut row = EncodedRow::default();
    row.set(Field::Age, number(answers.age));
    row.set(Field::Sex, category(answers.sex));
    row.set(Field::Cp, category(answers.cp));
    row.set(Field::Trestbps, number(answers.trestbps));
    row.set(Field::Chol, number(answers.chol));
    row.set(Field::Fbs, category(answers.fbs));
    row.set(Field::Restecg, category(answers.restecg));
    row.set(Field::Thalach, number(answers.thalach));
    row.set(Field::Exang, category(answers.exang));
    row.set(Field::Oldpeak, number(answers.oldpeak));
    row.set(Field::Slope, category(answers.slope));
    row.set(Field::Ca, category(answers.ca));
    row.set(Field::Thal, category(answers.thal));
    row
}
