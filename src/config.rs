//! Runtime settings read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `CARDIORISK_MODEL_DIR` | `models` |
//! | `CARDIORISK_REQUIRE_MANIFEST` | off |
//! | `CARDIORISK_LOG_MODE` | `stderr` |
//! | `CARDIORISK_LOG_FILE` | `cardiorisk.log` |

use std::path::PathBuf;
use std::str::FromStr;

use crate::CardioError;

pub const MODEL_DIR_ENV: &str = "CARDIORISK_MODEL_DIR";
pub const REQUIRE_MANIFEST_ENV: &str = "CARDIORISK_REQUIRE_MANIFEST";
pub const LOG_MODE_ENV: &str = "CARDIORISK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "CARDIORISK_LOG_FILE";

const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_LOG_FILE: &str = "cardiorisk.log";

/// Where log output goes.
///
/// Stdout is reserved for results by default so that `--json` output can
/// be piped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    #[default]
    Stderr,
    Stdout,
    File,
}

impl FromStr for LogMode {
    type Err = CardioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stderr" => Ok(Self::Stderr),
            "stdout" => Ok(Self::Stdout),
            "file" => Ok(Self::File),
            other => Err(CardioError::Validation(format!(
                "{LOG_MODE_ENV} must be stderr, stdout or file (got {other:?})"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub model_dir: PathBuf,
    pub require_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            require_manifest: false,
            log_mode: LogMode::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `CardioError::Validation` for an unrecognised log mode.
    pub fn from_env() -> Result<Self, CardioError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `CardioError::Validation` for an unrecognised log mode.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CardioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_mode = match lookup(LOG_MODE_ENV) {
            Some(v) => v.parse()?,
            None => defaults.log_mode,
        };

        Ok(Self {
            model_dir: lookup(MODEL_DIR_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.model_dir, PathBuf::from),
            require_manifest: lookup(REQUIRE_MANIFEST_ENV).is_some_and(|v| parse_bool(&v)),
            log_mode,
            log_file: lookup(LOG_FILE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.log_file, PathBuf::from),
        })
    }
}

fn parse_bool(v: &str) -> bool {
    matches!(v, "1" | "true" | "TRUE" | "yes" | "YES")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).expect("Should parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model_dir, PathBuf::from("models"));
        assert!(!settings.require_manifest);
        assert_eq!(settings.log_mode, LogMode::Stderr);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            (MODEL_DIR_ENV, "/srv/cardiorisk/models"),
            (REQUIRE_MANIFEST_ENV, "yes"),
            (LOG_MODE_ENV, "File"),
            (LOG_FILE_ENV, "/var/log/cardiorisk.log"),
        ]))
        .expect("Should parse");

        assert_eq!(settings.model_dir, PathBuf::from("/srv/cardiorisk/models"));
        assert!(settings.require_manifest);
        assert_eq!(settings.log_mode, LogMode::File);
        assert_eq!(settings.log_file, PathBuf::from("/var/log/cardiorisk.log"));
    }

    #[test]
    fn test_bool_parsing() {
        for v in ["1", "true", "TRUE", "yes", "YES"] {
            assert!(parse_bool(v), "{v}");
        }
        for v in ["0", "false", "no", "", "on"] {
            assert!(!parse_bool(v), "{v}");
        }
    }

    #[test]
    fn test_invalid_log_mode() {
        let err = Settings::from_lookup(lookup(&[(LOG_MODE_ENV, "syslog")])).expect_err("must fail");
        assert!(matches!(err, CardioError::Validation(_)));
    }
}
