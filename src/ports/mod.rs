//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the feature pipeline and the trained artifacts.

mod artifacts;
mod classifier;
mod scaler;

pub use artifacts::{ArtifactError, ArtifactStore};
pub use classifier::{Classifier, ClassifierError};
pub use scaler::{FeatureScaler, ScalerError};
