//! Clinician credential store.
//!
//! Credentials live in `<data_dir>/users.yaml`, keyed by normalised username. Passwords are
//! never stored; each entry keeps a random salt and `sha256(salt_hex || password)` as hex.
//!
//! ```yaml
//! users:
//!   doctor1:
//!     salt: 9f0c...
//!     password_hash: 3a7b...
//!     created_at: 2026-01-23T13:58:04Z
//! ```

use crate::config::CoreConfig;
use crate::{ConsultError, ConsultResult};
use chrono::{DateTime, Utc};
use consult_types::Username;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Serialises read-modify-write cycles on credential files within this process.
static WRITE_LOCK: Mutex<()> = Mutex::new(());

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub salt: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    users: BTreeMap<String, StoredCredential>,
}

#[derive(Clone, Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::at(cfg.credentials_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - `ConsultError::InvalidInput` for an empty password
    /// - `ConsultError::DuplicateUser` if the username is taken
    /// - storage or YAML errors if the file cannot be read or written
    pub fn register(&self, username: &Username, password: &str) -> ConsultResult<()> {
        if password.is_empty() {
            return Err(ConsultError::InvalidInput("password cannot be empty".into()));
        }

        let _guard = WRITE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = self.load()?;
        if file.users.contains_key(username.as_str()) {
            return Err(ConsultError::DuplicateUser(username.to_string()));
        }

        let salt = hex::encode(rand::random::<[u8; 16]>());
        let password_hash = hash_password(&salt, password);
        file.users.insert(
            username.to_string(),
            StoredCredential {
                salt,
                password_hash,
                created_at: Utc::now(),
            },
        );
        self.save(&file)?;

        tracing::info!(user = %username, "registered user");
        Ok(())
    }

    /// Check a username and password. Unknown or malformed usernames simply fail to verify.
    pub fn verify(&self, username: &str, password: &str) -> ConsultResult<bool> {
        let Ok(username) = Username::new(username) else {
            return Ok(false);
        };
        let file = self.load()?;
        Ok(file
            .users
            .get(username.as_str())
            .is_some_and(|c| hash_password(&c.salt, password) == c.password_hash))
    }

    /// Registered usernames in sorted order.
    pub fn usernames(&self) -> ConsultResult<Vec<String>> {
        Ok(self.load()?.users.into_keys().collect())
    }

    fn load(&self) -> ConsultResult<CredentialFile> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CredentialFile::default())
            }
            Err(e) => return Err(ConsultError::FileRead(e)),
        };
        if contents.trim().is_empty() {
            return Ok(CredentialFile::default());
        }
        serde_yaml::from_str(&contents).map_err(ConsultError::YamlDeserialization)
    }

    /// Write the whole file via a temporary sibling and rename, so readers never see a
    /// partial document.
    fn save(&self, file: &CredentialFile) -> ConsultResult<()> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(ConsultError::StorageDirCreation)?;
                parent
            }
            None => Path::new("."),
        };
        let yaml = serde_yaml::to_string(file).map_err(ConsultError::YamlSerialization)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(ConsultError::FileWrite)?;
        tmp.write_all(yaml.as_bytes()).map_err(ConsultError::FileWrite)?;
        tmp.as_file().sync_all().map_err(ConsultError::FileWrite)?;
        tmp.persist(&self.path).map_err(|e| ConsultError::FileWrite(e.error))?;
        Ok(())
    }
}

fn hash_password(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> CredentialStore {
        CredentialStore::at(dir.path().join("users.yaml"))
    }

    fn user(name: &str) -> Username {
        Username::new(name).unwrap()
    }

    #[test]
    fn register_then_verify() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.register(&user("doctor1"), "secret").unwrap();

        assert!(store.verify("doctor1", "secret").unwrap());
        assert!(store.verify(" Doctor1 ", "secret").unwrap());
        assert!(!store.verify("doctor1", "wrong").unwrap());
        assert!(!store.verify("nobody", "secret").unwrap());
        assert!(!store.verify("not valid!", "secret").unwrap());
    }

    #[test]
    fn duplicate_and_empty_password_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.register(&user("doctor1"), "secret").unwrap();

        assert!(matches!(
            store.register(&user("DOCTOR1"), "other"),
            Err(ConsultError::DuplicateUser(name)) if name == "doctor1"
        ));
        assert!(matches!(
            store.register(&user("doctor2"), ""),
            Err(ConsultError::InvalidInput(_))
        ));
        assert_eq!(store.usernames().unwrap(), vec!["doctor1".to_string()]);
    }

    #[test]
    fn file_never_contains_the_password() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.register(&user("admin"), "hunter2-plaintext").unwrap();
        store.register(&user("doctor1"), "hunter2-plaintext").unwrap();

        let yaml = fs::read_to_string(store.path()).unwrap();
        assert!(!yaml.contains("hunter2-plaintext"));

        let file: CredentialFile = serde_yaml::from_str(&yaml).unwrap();
        let admin = &file.users["admin"];
        let doctor = &file.users["doctor1"];
        assert_eq!(admin.salt.len(), 32);
        assert_eq!(admin.password_hash.len(), 64);
        assert_ne!(admin.salt, doctor.salt);
        assert_ne!(admin.password_hash, doctor.password_hash);
    }

    #[test]
    fn concurrent_registrations_are_all_kept() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        std::thread::scope(|scope| {
            for i in 0..16 {
                let store = &store;
                scope.spawn(move || {
                    store.register(&user(&format!("doctor{i}")), "pw").unwrap();
                    // Reads racing the writers must always see a complete file.
                    store.usernames().unwrap();
                });
            }
        });

        let names = store.usernames().unwrap();
        assert_eq!(names.len(), 16);
        for i in 0..16 {
            assert!(store.verify(&format!("doctor{i}"), "pw").unwrap());
        }
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary files must not be left behind");
    }

    #[test]
    fn missing_file_has_no_users() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.usernames().unwrap().is_empty());
        assert!(!store.verify("admin", "admin").unwrap());
    }
}
