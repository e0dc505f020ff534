//! Persistence for the user's profile (deposit, income, life styles).
//!
//! The stored blob is the camelCase JSON form of [`Profile`]. Missing fields
//! are filled with defaults on load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thiserror::Error;

use crate::core::Profile;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid profile data: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("could not serialize profile: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<Profile, StoreError>;

    fn save(&self, profile: &Profile) -> Result<(), StoreError>;
}

/// Loads the stored profile, falling back to defaults when it cannot be read.
pub fn load_or_default(store: &dyn ConfigStore) -> Profile {
    match store.load() {
        Ok(profile) => profile,
        Err(err) => {
            tracing::warn!(error = %err, "stored profile unusable, using defaults");
            Profile::default()
        }
    }
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/carrot/config.json`, or the working directory when the
    /// platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("carrot"))
            .unwrap_or_default()
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Profile, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored profile yet");
                return Ok(Profile::default());
            }
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_str(&raw).map_err(StoreError::Parse)
    }

    fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(profile).map_err(StoreError::Serialize)?;

        // Write next to the target and rename so readers never see half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "profile saved");
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    profile: RwLock<Profile>,
}

impl MemoryStore {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile: RwLock::new(profile),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Profile, StoreError> {
        Ok(self.profile.read().clone())
    }

    fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        *self.profile.write() = profile.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LifeStyle;

    fn sample_profile() -> Profile {
        Profile {
            deposit: 42_000.0,
            annual_income: 75_000.0,
            life_styles: vec![LifeStyle {
                desc: "nomad".to_string(),
                year_cost: 24_000.0,
                interest_rate: Some(5.0),
                inflation_rate: None,
            }],
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().expect("defaults"), Profile::default());
    }

    #[test]
    fn saved_profile_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nested/dir/config.json"));
        store.save(&sample_profile()).expect("save");

        assert_eq!(store.load().expect("load"), sample_profile());
        let raw = fs::read_to_string(store.path()).expect("file written");
        assert!(raw.contains("\"annualIncome\""));
        assert!(raw.contains("\"lifeStyles\""));
        assert!(!dir.path().join("nested/dir/config.json.tmp").exists());
    }

    #[test]
    fn partial_file_is_completed_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"annualIncome": 1000}"#).expect("write");

        let profile = JsonFileStore::new(&path).load().expect("load");
        assert_eq!(profile.annual_income, 1000.0);
        assert_eq!(profile.deposit, Profile::default().deposit);
    }

    #[test]
    fn corrupt_file_is_a_parse_error_and_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").expect("write");
        let store = JsonFileStore::new(&path);

        assert!(matches!(store.load(), Err(StoreError::Parse(_))));
        assert_eq!(load_or_default(&store), Profile::default());
    }

    #[test]
    fn memory_store_keeps_last_saved_profile() {
        let store = MemoryStore::default();
        assert_eq!(store.load().expect("load"), Profile::default());
        store.save(&sample_profile()).expect("save");
        assert_eq!(store.load().expect("load"), sample_profile());
    }
}
