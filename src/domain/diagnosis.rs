//! Diagnosis result types.
//!
//! Represents the classifier output for one questionnaire.

use serde::{Deserialize, Serialize};

use crate::domain::{Field, ScalingOutcome};

/// Shown with every result.
pub const DISCLAIMER: &str =
    "Note: This tool is for educational use only. Not a substitute for professional diagnosis.";

/// Risk classification for heart disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Classifier predicted no disease
    Low,
    /// Classifier predicted disease present
    High,
}

impl RiskLevel {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low chance of heart disease.",
            Self::High => "High chance of heart disease.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Raw classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Probability of the positive class (0.0 to 1.0)
    pub probability: f64,

    /// Binary prediction (0 = no disease, 1 = disease present)
    pub prediction: u8,
}

impl DiagnosisResult {
    /// Create a result from the classifier's label and probability.
    #[must_use]
    pub fn new(prediction: u8, probability: f64) -> Self {
        Self {
            probability,
            prediction,
        }
    }

    /// The label decides the risk level; the probability is informational.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        if self.prediction == 1 {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    /// Message for the presentation layer.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{} (Probability: {:.2})",
            self.risk_level().description(),
            self.probability
        )
    }
}

/// Complete diagnosis record including metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Unique identifier
    pub id: String,

    /// The classifier result
    pub result: DiagnosisResult,

    /// Risk classification
    pub risk_level: RiskLevel,

    /// Fields answered "I don't know" and filled from fallbacks
    pub imputed_fields: Vec<Field>,

    /// Whether the feature scaler ran
    pub scaling: ScalingOutcome,

    /// Timestamp of diagnosis
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Diagnosis {
    /// Create a new diagnosis from a result.
    #[must_use]
    pub fn new(result: DiagnosisResult, imputed_fields: Vec<Field>, scaling: ScalingOutcome) -> Self {
        Self {
            id: uuid_v4(),
            risk_level: result.risk_level(),
            result,
            imputed_fields,
            scaling,
            created_at: chrono::Utc::now(),
        }
    }

    /// Message for the presentation layer.
    #[must_use]
    pub fn message(&self) -> String {
        self.result.message()
    }
}

/// Generate a random UUID v4 using a CSPRNG seeded from OS entropy.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}
