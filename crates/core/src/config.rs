//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Core
//! code never reads environment variables during request handling.

use crate::constants::{
    CLINICS_DIR_NAME, DEFAULT_DATA_DIR, DOCTORS_DIR_NAME, MEDICAL_RECORDS_DIR_NAME,
    MOTHERS_DIR_NAME, USERS_DIR_NAME,
};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The data directory must already exist and be a directory; see
    /// [`CoreConfig::ensure_data_dir`] for creating it at startup.
    pub fn new(data_dir: PathBuf) -> CoreResult<Self> {
        if !data_dir.is_dir() {
            return Err(CoreError::InvalidInput(format!(
                "data directory does not exist: {}",
                data_dir.display()
            )));
        }
        Ok(Self { data_dir })
    }

    /// Create the data directory if needed, then build the config.
    pub fn ensure_data_dir(data_dir: PathBuf) -> CoreResult<Self> {
        std::fs::create_dir_all(&data_dir).map_err(CoreError::StorageDirCreation)?;
        Self::new(data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn users_dir(&self) -> PathBuf {
        self.data_dir.join(USERS_DIR_NAME)
    }

    pub fn mothers_dir(&self) -> PathBuf {
        self.data_dir.join(MOTHERS_DIR_NAME)
    }

    pub fn doctors_dir(&self) -> PathBuf {
        self.data_dir.join(DOCTORS_DIR_NAME)
    }

    pub fn clinics_dir(&self) -> PathBuf {
        self.data_dir.join(CLINICS_DIR_NAME)
    }

    pub fn medical_records_dir(&self) -> PathBuf {
        self.data_dir.join(MEDICAL_RECORDS_DIR_NAME)
    }
}

/// Resolve the data directory from an optional `MCH_DATA_DIR` value.
///
/// Blank or missing values fall back to [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_rejects_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            CoreConfig::new(missing),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn ensure_data_dir_creates_it() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("nested").join("data");
        let cfg = CoreConfig::ensure_data_dir(dir.clone()).expect("should create");
        assert!(dir.is_dir());
        assert_eq!(cfg.mothers_dir(), dir.join("mothers"));
    }

    #[test]
    fn data_dir_defaults_when_blank() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from("mch_data"));
        assert_eq!(data_dir_from_env_value(Some(" ".into())), PathBuf::from("mch_data"));
        assert_eq!(
            data_dir_from_env_value(Some("/srv/mch".into())),
            PathBuf::from("/srv/mch")
        );
    }
}
