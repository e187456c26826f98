//! Prediction service: Orchestrates feature preparation and inference.
//!
//! This service coordinates:
//! - One-time artifact loading with graceful degradation
//! - The feature pipeline
//! - Classifier invocation and result checks

use std::sync::Arc;

use crate::domain::{Diagnosis, DiagnosisResult, RawAnswers};
use crate::pipeline::{FeaturePipeline, PreparedFeatures};
use crate::ports::{ArtifactError, ArtifactStore, Classifier, ClassifierError};
use crate::CardioError;

/// Service for running risk predictions.
///
/// Holds only read-only state, so one instance can serve concurrent
/// requests.
pub struct PredictionService<C>
where
    C: Classifier,
{
    pipeline: FeaturePipeline,
    classifier: Arc<C>,
}

impl<C> PredictionService<C>
where
    C: Classifier,
{
    /// Create a new prediction service.
    pub fn new(pipeline: FeaturePipeline, classifier: Arc<C>) -> Self {
        Self {
            pipeline,
            classifier,
        }
    }

    /// Access the configured pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    /// Run the feature pipeline without invoking the classifier.
    ///
    /// # Errors
    /// Returns error if the answers are out of range.
    pub fn prepare(&self, answers: &RawAnswers) -> Result<PreparedFeatures, CardioError> {
        Ok(self.pipeline.prepare(answers)?)
    }

    /// Run the full prediction for one questionnaire.
    ///
    /// Performs:
    /// 1. Feature preparation
    /// 2. Classifier invocation
    /// 3. Result checks
    ///
    /// # Errors
    /// Returns error if the answers are invalid or the classifier fails.
    /// A classifier failure is never replaced by a default prediction.
    pub fn predict(&self, answers: &RawAnswers) -> Result<Diagnosis, CardioError> {
        tracing::info!("Starting prediction...");

        tracing::debug!("Step 1: Preparing features...");
        let prepared = self.prepare(answers)?;
        tracing::debug!(
            "Prepared {} features, {} imputed, scaling: {}",
            prepared.vector.len(),
            prepared.imputed.len(),
            prepared.scaling
        );

        tracing::debug!("Step 2: Running classifier...");
        let prediction = self.classifier.predict(&prepared.vector)?;
        let probability = self.classifier.predict_probability(&prepared.vector)?;

        tracing::debug!("Step 3: Checking classifier output...");
        if prediction > 1 {
            return Err(ClassifierError::InvalidLabel(prediction).into());
        }
        if !(0.0..=1.0).contains(&probability) {
            return Err(ClassifierError::InvalidProbability(probability).into());
        }

        let diagnosis = Diagnosis::new(
            DiagnosisResult::new(prediction, probability),
            prepared.imputed,
            prepared.scaling,
        );

        tracing::info!(
            "Prediction complete: prediction={}, probability={:.2}%, risk={}",
            diagnosis.result.prediction,
            diagnosis.result.probability * 100.0,
            diagnosis.risk_level
        );

        Ok(diagnosis)
    }

    /// Load every artifact from a store.
    ///
    /// A missing feature list falls back to the default schema and a
    /// missing or unreadable scaler disables scaling. The classifier is
    /// required and must agree with the schema.
    ///
    /// # Errors
    /// Returns error if the classifier or feature list cannot be loaded,
    /// or if any artifact fails its integrity check.
    pub fn from_store<S>(store: &S) -> Result<Self, CardioError>
    where
        S: ArtifactStore<Model = C>,
    {
        tracing::info!("Loading artifacts...");

        let schema = match store.load_feature_columns()? {
            Some(list) => list,
            None => {
                tracing::info!("No feature list artifact, using the default column order");
                Default::default()
            }
        };

        let scaler = match store.load_scaler() {
            Ok(Some(scaler)) => Some(scaler),
            Ok(None) => {
                tracing::info!("No scaler artifact, features will not be scaled");
                None
            }
            Err(e @ ArtifactError::Integrity(_)) => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Ignoring unusable scaler: {e}");
                None
            }
        };

        let classifier = store.load_classifier()?;
        if let Some(expected) = classifier.feature_names() {
            if expected != schema.columns() {
                return Err(ArtifactError::Invalid {
                    name: "model".into(),
                    reason: format!(
                        "model features {:?} do not match feature list {:?}",
                        expected,
                        schema.columns()
                    ),
                }
                .into());
            }
        }

        Ok(Self::new(
            FeaturePipeline::new(schema, scaler),
            Arc::new(classifier),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::{FEATURE_COLUMNS_FILE, MODEL_FILE, SCALER_FILE};
    use crate::adapters::FsArtifactStore;
    use crate::domain::answers::{ChestPain, Sex};
    use crate::domain::{Answer, AnswerForm, FeatureVector, RiskLevel, ScalingOutcome};
    use std::path::Path;
    use tempfile::tempdir;

    /// Always returns the configured output.
    struct Fixed {
        label: u8,
        probability: f64,
    }

    impl Classifier for Fixed {
        fn predict(&self, _features: &FeatureVector) -> Result<u8, ClassifierError> {
            Ok(self.label)
        }

        fn predict_probability(&self, _features: &FeatureVector) -> Result<f64, ClassifierError> {
            Ok(self.probability)
        }
    }

    /// Always fails.
    struct Broken;

    impl Classifier for Broken {
        fn predict(&self, _features: &FeatureVector) -> Result<u8, ClassifierError> {
            Err(ClassifierError::Failed("model file truncated".into()))
        }

        fn predict_probability(&self, _features: &FeatureVector) -> Result<f64, ClassifierError> {
            Err(ClassifierError::Failed("model file truncated".into()))
        }
    }

    fn fixed_service(label: u8, probability: f64) -> PredictionService<Fixed> {
        PredictionService::new(
            FeaturePipeline::default(),
            Arc::new(Fixed { label, probability }),
        )
    }

    #[test]
    fn test_predict_with_fixed_classifier() {
        let service = fixed_service(1, 0.82);
        let answers = RawAnswers {
            sex: Answer::Known(Sex::Male),
            cp: Answer::Known(ChestPain::Asymptomatic),
            ..RawAnswers::all_unknown()
        };

        let diagnosis = service.predict(&answers).expect("Should predict");
        assert_eq!(diagnosis.risk_level, RiskLevel::High);
        assert_eq!(diagnosis.scaling, ScalingOutcome::Absent);
        assert_eq!(diagnosis.imputed_fields.len(), 11);
        assert_eq!(
            diagnosis.message(),
            "High chance of heart disease. (Probability: 0.82)"
        );
    }

    #[test]
    fn test_invalid_classifier_output_is_error() {
        let answers = RawAnswers::all_unknown();
        assert!(matches!(
            fixed_service(2, 0.5).predict(&answers),
            Err(CardioError::Classifier(ClassifierError::InvalidLabel(2)))
        ));
        assert!(matches!(
            fixed_service(0, 1.5).predict(&answers),
            Err(CardioError::Classifier(ClassifierError::InvalidProbability(_)))
        ));
    }

    #[test]
    fn test_classifier_failure_surfaces() {
        let service = PredictionService::new(FeaturePipeline::default(), Arc::new(Broken));
        let err = service
            .predict(&RawAnswers::all_unknown())
            .expect_err("must fail");
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_from_shipped_models() {
        let store = FsArtifactStore::open(Path::new("models"), false).expect("Should open");
        let service = PredictionService::from_store(&store).expect("Should load");
        assert!(service.pipeline().has_scaler());

        let form: AnswerForm = serde_json::from_str(
            r#"{"age": 63, "sex": "Male", "cp": "Asymptomatic", "trestbps": 145,
                "chol": 233, "fbs": "Yes", "restecg": "Normal", "thalach": 150,
                "exang": "No", "oldpeak": 2.3, "slope": "Downsloping", "ca": 0,
                "thal": "Fixed defect"}"#,
        )
        .expect("Should parse");
        let answers = form.collect().expect("Should collect");

        let diagnosis = service.predict(&answers).expect("Should predict");
        assert!((0.0..=1.0).contains(&diagnosis.result.probability));
        assert_eq!(diagnosis.scaling, ScalingOutcome::Applied { columns: 9 });
        assert!(diagnosis.imputed_fields.is_empty());
    }

    #[test]
    fn test_from_store_degrades_without_optional_artifacts() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        let model = crate::adapters::LogisticModel {
            feature_names: crate::domain::DEFAULT_FEATURE_COLUMNS
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            coefficients: vec![0.0; 18],
            intercept: 0.0,
            threshold: 0.5,
        };
        std::fs::write(
            dir.join(MODEL_FILE),
            serde_json::to_vec(&model).expect("serialize model"),
        )
        .expect("write model");
        std::fs::write(dir.join(SCALER_FILE), "{not json").expect("write scaler");

        let store = FsArtifactStore::open(dir, false).expect("Should open");
        let service = PredictionService::from_store(&store).expect("Should load");
        assert!(!service.pipeline().has_scaler());

        let diagnosis = service
            .predict(&RawAnswers::all_unknown())
            .expect("Should predict");
        assert!((diagnosis.result.probability - 0.5).abs() < 1e-12);
        assert_eq!(diagnosis.result.prediction, 1);
    }

    #[test]
    fn test_from_store_rejects_schema_mismatch() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        std::fs::write(dir.join(FEATURE_COLUMNS_FILE), r#"["age", "sex"]"#).expect("write list");
        std::fs::write(
            dir.join(MODEL_FILE),
            r#"{"feature_names": ["sex", "age"], "coefficients": [0.1, 0.2], "intercept": 0.0}"#,
        )
        .expect("write model");

        let store = FsArtifactStore::open(dir, false).expect("Should open");
        assert!(PredictionService::from_store(&store).is_err());
    }
}
