//! File-system artifact store: Implementation of ArtifactStore.
//!
//! Reads the artifacts exported by the training pipeline from one
//! directory:
//!
//! - `feature_columns.json` (optional) - ordered column names
//! - `scaler.json` (optional) - scaler parameters
//! - `model.json` (required) - logistic model
//! - `manifest.json` (optional) - SHA-256 of each artifact
//!
//! # Integrity
//!
//! When a manifest is present, every file it lists must exist and match its
//! hash, and no artifact outside the manifest is loaded. Stores opened with
//! `require_manifest` refuse directories without one.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::{AffineScaler, LogisticModel};
use crate::domain::CanonicalFeatureList;
use crate::ports::{ArtifactError, ArtifactStore, FeatureScaler};

pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Artifacts a manifest may bind.
pub const ARTIFACT_FILES: [&str; 3] = [FEATURE_COLUMNS_FILE, SCALER_FILE, MODEL_FILE];

/// Hashes of the artifacts in a model directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    #[serde(default)]
    pub created_at: Option<i64>,
    pub files: BTreeMap<String, String>,
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Artifact store backed by a model directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
    manifest: Option<Manifest>,
}

impl FsArtifactStore {
    /// Open a model directory, verifying its manifest if present.
    ///
    /// # Errors
    /// Returns `ArtifactError::Integrity` if the manifest is required but
    /// absent, malformed, or does not match the files on disk.
    pub fn open(dir: impl Into<PathBuf>, require_manifest: bool) -> Result<Self, ArtifactError> {
        let dir = dir.into();
        let manifest_path = dir.join(MANIFEST_FILE);

        let manifest = if manifest_path.exists() {
            let bytes = read(&manifest_path)?;
            let manifest: Manifest = serde_json::from_slice(&bytes).map_err(|e| {
                ArtifactError::Integrity(format!("Invalid {MANIFEST_FILE} format: {e}"))
            })?;
            Self::verify_manifest(&dir, &manifest)?;
            tracing::info!(
                "Verified {} artifact(s) against {:?}",
                manifest.files.len(),
                manifest_path
            );
            Some(manifest)
        } else if require_manifest {
            tracing::error!("Artifact manifest not found at {:?}", manifest_path);
            return Err(ArtifactError::Integrity(format!(
                "{MANIFEST_FILE} required but not found in {dir:?}"
            )));
        } else {
            tracing::warn!("No {MANIFEST_FILE} in {:?}; loading unverified artifacts", dir);
            None
        };

        Ok(Self { dir, manifest })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.manifest.is_some()
    }

    fn verify_manifest(dir: &Path, manifest: &Manifest) -> Result<(), ArtifactError> {
        if manifest.version != 1 {
            return Err(ArtifactError::Integrity(format!(
                "Unsupported manifest version: {}",
                manifest.version
            )));
        }
        if manifest.files.is_empty() {
            return Err(ArtifactError::Integrity(format!(
                "{MANIFEST_FILE} contains no files"
            )));
        }

        for (rel, expected_hex) in &manifest.files {
            if !ARTIFACT_FILES.contains(&rel.as_str()) {
                return Err(ArtifactError::Integrity(format!(
                    "Manifest references unexpected file {rel}"
                )));
            }
            let path = dir.join(rel);
            let bytes = fs::read(&path).map_err(|e| {
                ArtifactError::Integrity(format!(
                    "Manifest references missing/unreadable file {:?}: {e}",
                    path
                ))
            })?;

            if !constant_time_eq_str(&sha256_hex(&bytes), &expected_hex.to_ascii_lowercase()) {
                return Err(ArtifactError::Integrity(format!(
                    "File hash mismatch for {rel}"
                )));
            }
        }
        Ok(())
    }

    /// Read an artifact, or `None` if it does not exist.
    fn read_artifact(&self, name: &str) -> Result<Option<String>, ArtifactError> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }
        if let Some(manifest) = &self.manifest {
            if !manifest.files.contains_key(name) {
                return Err(ArtifactError::Integrity(format!(
                    "{name} is present but not bound by {MANIFEST_FILE}"
                )));
            }
        }

        let bytes = read(&path)?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| ArtifactError::Invalid {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}

fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl ArtifactStore for FsArtifactStore {
    type Model = LogisticModel;

    fn load_feature_columns(&self) -> Result<Option<CanonicalFeatureList>, ArtifactError> {
        let Some(json) = self.read_artifact(FEATURE_COLUMNS_FILE)? else {
            return Ok(None);
        };
        let list: CanonicalFeatureList =
            serde_json::from_str(&json).map_err(|e| ArtifactError::Invalid {
                name: FEATURE_COLUMNS_FILE.into(),
                reason: e.to_string(),
            })?;
        tracing::info!("Loaded feature list with {} column(s)", list.len());
        Ok(Some(list))
    }

    fn load_scaler(&self) -> Result<Option<Arc<dyn FeatureScaler>>, ArtifactError> {
        let Some(json) = self.read_artifact(SCALER_FILE)? else {
            return Ok(None);
        };
        let scaler = AffineScaler::from_json(&json).map_err(|e| ArtifactError::Invalid {
            name: SCALER_FILE.into(),
            reason: e.to_string(),
        })?;
        tracing::info!("Loaded scaler for {} column(s)", scaler.n_features());
        Ok(Some(Arc::new(scaler)))
    }

    fn load_classifier(&self) -> Result<LogisticModel, ArtifactError> {
        let json = self
            .read_artifact(MODEL_FILE)?
            .ok_or_else(|| ArtifactError::Missing(self.dir.join(MODEL_FILE).display().to_string()))?;
        let model = LogisticModel::from_json(&json)?;
        tracing::info!(
            "Loaded model with {} feature(s), threshold {}",
            model.feature_names.len(),
            model.threshold
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MODEL_JSON: &str =
        r#"{"feature_names": ["age"], "coefficients": [0.05], "intercept": -2.7}"#;

    fn write_manifest(dir: &Path, files: &[&str]) {
        let mut map = BTreeMap::new();
        for rel in files {
            let bytes = fs::read(dir.join(rel)).unwrap_or_default();
            map.insert((*rel).to_string(), sha256_hex(&bytes));
        }
        let manifest = Manifest {
            version: 1,
            created_at: Some(chrono::Utc::now().timestamp()),
            files: map,
        };
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_vec(&manifest).expect("serialize manifest"),
        )
        .expect("write manifest");
    }

    #[test]
    fn test_shipped_models_load() {
        let store = FsArtifactStore::open("models", true).expect("Should open");
        assert!(store.is_verified());
        let list = store
            .load_feature_columns()
            .expect("Should load")
            .expect("feature list shipped");
        assert_eq!(list, CanonicalFeatureList::default());
        assert!(store.load_scaler().expect("Should load").is_some());

        let model = store.load_classifier().expect("Should load");
        assert!(model.check_schema(&list).is_ok());
    }

    #[test]
    fn test_optional_artifacts_absent() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(MODEL_FILE), MODEL_JSON).expect("write model");

        let store = FsArtifactStore::open(temp.path(), false).expect("Should open");
        assert!(!store.is_verified());
        assert!(store.load_feature_columns().expect("Should load").is_none());
        assert!(store.load_scaler().expect("Should load").is_none());
        assert!(store.load_classifier().is_ok());
    }

    #[test]
    fn test_missing_model_is_error() {
        let temp = tempdir().expect("tempdir");
        let store = FsArtifactStore::open(temp.path(), false).expect("Should open");
        assert!(matches!(
            store.load_classifier(),
            Err(ArtifactError::Missing(_))
        ));
    }

    #[test]
    fn test_manifest_verifies_hashes() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        fs::write(dir.join(MODEL_FILE), MODEL_JSON).expect("write model");
        write_manifest(dir, &[MODEL_FILE]);

        let store = FsArtifactStore::open(dir, true).expect("Should open");
        assert!(store.is_verified());
        assert!(store.load_classifier().is_ok());

        // Tamper after the manifest was written.
        fs::write(
            dir.join(MODEL_FILE),
            r#"{"feature_names": ["age"], "coefficients": [5.0], "intercept": 0.0}"#,
        )
        .expect("rewrite model");
        let err = FsArtifactStore::open(dir, false).expect_err("must fail");
        assert!(err.to_string().contains("hash mismatch"));
    }

    #[test]
    fn test_manifest_rejects_unbound_artifact() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        fs::write(dir.join(MODEL_FILE), MODEL_JSON).expect("write model");
        write_manifest(dir, &[MODEL_FILE]);
        fs::write(dir.join(FEATURE_COLUMNS_FILE), r#"["age"]"#).expect("write list");

        let store = FsArtifactStore::open(dir, false).expect("Should open");
        assert!(matches!(
            store.load_feature_columns(),
            Err(ArtifactError::Integrity(_))
        ));
    }

    #[test]
    fn test_required_manifest_missing() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(MODEL_FILE), MODEL_JSON).expect("write model");
        assert!(FsArtifactStore::open(temp.path(), true).is_err());
    }

    #[test]
    fn test_manifest_missing_file_fails_closed() {
        let temp = tempdir().expect("tempdir");
        write_manifest(temp.path(), &[MODEL_FILE]);
        let err = FsArtifactStore::open(temp.path(), false).expect_err("must fail");
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_malformed_feature_list() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(FEATURE_COLUMNS_FILE), r#"["age", "age"]"#)
            .expect("write list");
        let store = FsArtifactStore::open(temp.path(), false).expect("Should open");
        assert!(matches!(
            store.load_feature_columns(),
            Err(ArtifactError::Invalid { .. })
        ));
    }
}
