//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into core services. Library
//! code never reads environment variables; binaries read them and hand the raw values to the
//! `*_from_env_value` helpers below.

use crate::constants::{
    CONSULTATIONS_FILENAME, CREDENTIALS_FILENAME, DEFAULT_ADMIN_USERNAME, DEFAULT_DATA_DIR,
};
use crate::{ConsultError, ConsultResult};
use consult_types::Username;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    admin_username: Username,
    logo_path: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ConsultError::InvalidInput` if the data directory is empty or the admin
    /// username is not a valid username.
    pub fn new(
        data_dir: PathBuf,
        admin_username: &str,
        logo_path: Option<PathBuf>,
    ) -> ConsultResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(ConsultError::InvalidInput(
                "data directory cannot be empty".into(),
            ));
        }

        let admin_username = Username::new(admin_username)
            .map_err(|e| ConsultError::InvalidInput(format!("admin username: {e}")))?;

        Ok(Self {
            data_dir,
            admin_username,
            logo_path,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn consultations_path(&self) -> PathBuf {
        self.data_dir.join(CONSULTATIONS_FILENAME)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join(CREDENTIALS_FILENAME)
    }

    pub fn is_admin(&self, username: &Username) -> bool {
        &self.admin_username == username
    }

    /// Logo shown at the top of reports. May point at a file that does not exist.
    pub fn logo_path(&self) -> Option<&Path> {
        self.logo_path.as_deref()
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> ConsultResult<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(ConsultError::StorageDirCreation)
    }
}

/// Resolve the data directory from an optional raw value, falling back to
/// [`DEFAULT_DATA_DIR`] when absent or blank.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Resolve the admin username from an optional raw value.
pub fn admin_username_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.into())
}

/// Resolve the optional report logo path. Blank values mean "no logo".
pub fn logo_path_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_values_fall_back_to_defaults() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(
            data_dir_from_env_value(Some("  ".into())),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert_eq!(
            data_dir_from_env_value(Some("/srv/consult".into())),
            PathBuf::from("/srv/consult")
        );
        assert_eq!(admin_username_from_env_value(None), "admin");
        assert_eq!(logo_path_from_env_value(Some("".into())), None);
    }

    #[test]
    fn config_derives_file_paths_from_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/data"), "Admin", None).expect("config");
        assert_eq!(
            cfg.consultations_path(),
            PathBuf::from("/data").join(CONSULTATIONS_FILENAME)
        );
        assert_eq!(
            cfg.credentials_path(),
            PathBuf::from("/data").join(CREDENTIALS_FILENAME)
        );
        assert!(cfg.is_admin(&Username::new("admin").unwrap()));
    }

    #[test]
    fn config_rejects_empty_data_dir_and_bad_admin() {
        assert!(matches!(
            CoreConfig::new(PathBuf::new(), "admin", None),
            Err(ConsultError::InvalidInput(_))
        ));
        assert!(matches!(
            CoreConfig::new(PathBuf::from("/data"), "not valid!", None),
            Err(ConsultError::InvalidInput(_))
        ));
    }
}
