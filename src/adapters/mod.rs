//! Adapters layer: Concrete implementations of ports.
//!
//! - `store`: model directory on the local file system
//! - `scaler`: affine feature scaler (standard / min-max)
//! - `logistic`: logistic regression classifier

pub mod logistic;
pub mod scaler;
pub mod store;

pub use logistic::LogisticModel;
pub use scaler::{AffineScaler, ScalerParams};
pub use store::{FsArtifactStore, Manifest};
