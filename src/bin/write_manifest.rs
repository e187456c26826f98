//! Manifest utility for Cardiorisk model directories.
//!
//! Hashes the artifacts present in a model directory and writes
//! `manifest.json`, which the artifact store verifies at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <model_dir> [--check]
//! ```
//!
//! With `--check`, nothing is written; the existing manifest is verified
//! against the files on disk instead.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use cardiorisk::adapters::store::{ARTIFACT_FILES, MANIFEST_FILE};
use cardiorisk::adapters::{store::sha256_hex, FsArtifactStore, Manifest};

fn usage() -> String {
    "Usage: write_manifest <model_dir> [--check]".to_string()
}

fn parse_args() -> Result<(PathBuf, bool)> {
    let mut model_dir: Option<PathBuf> = None;
    let mut check = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--check" => check = true,
            "-h" | "--help" => bail!(usage()),
            _ => {
                if model_dir.is_some() {
                    bail!(usage());
                }
                model_dir = Some(PathBuf::from(arg));
            }
        }
    }

    let Some(model_dir) = model_dir else {
        bail!(usage());
    };
    Ok((model_dir, check))
}

fn main() -> Result<()> {
    let (model_dir, check) = parse_args()?;

    if check {
        let store = FsArtifactStore::open(&model_dir, true)
            .with_context(|| format!("Verification failed for {model_dir:?}"))?;
        println!("Verified artifacts in {:?}", store.dir());
        return Ok(());
    }

    let mut files = BTreeMap::new();
    for rel in ARTIFACT_FILES {
        let path = model_dir.join(rel);
        if path.exists() {
            let bytes = fs::read(&path).with_context(|| format!("Failed to read {path:?}"))?;
            files.insert(rel.to_string(), sha256_hex(&bytes));
        }
    }

    if files.is_empty() {
        bail!("No artifacts found in {model_dir:?} (expected one of {ARTIFACT_FILES:?})");
    }

    let manifest = Manifest {
        version: 1,
        created_at: Some(chrono::Utc::now().timestamp()),
        files,
    };
    let bytes = serde_json::to_vec_pretty(&manifest).context("Failed to serialize manifest")?;

    let manifest_path = model_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, bytes)
        .with_context(|| format!("Failed to write {manifest_path:?}"))?;

    for (rel, hash) in &manifest.files {
        println!("{hash}  {rel}");
    }
    println!("Wrote manifest: {manifest_path:?}");

    Ok(())
}
