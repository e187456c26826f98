//! Application layer: Use cases and services.
//!
//! This module orchestrates the feature pipeline with the ports to
//! implement the prediction use case.

mod prediction;

pub use prediction::PredictionService;
