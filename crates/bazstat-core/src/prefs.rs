//! Persisted user preferences (selected username, debug-console flag).
//!
//! Callers pass a [`PreferenceStore`] in rather than reaching for a global:
//! the CLI uses [`FilePreferenceStore`] (JSON under the XDG state dir), tests
//! and embedders can use [`MemoryPreferenceStore`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Author whose repos are shown; empty when unset.
    pub username: String,
    pub vconsole_enabled: bool,
}

impl Preferences {
    /// The saved username, if one is set.
    pub fn username(&self) -> Option<&str> {
        Some(self.username.trim()).filter(|u| !u.is_empty())
    }
}

/// Key-value capability holding one [`Preferences`] object.
pub trait PreferenceStore {
    /// Load preferences; a store with nothing saved yields defaults.
    fn load(&self) -> Result<Preferences>;
    fn save(&self, prefs: &Preferences) -> Result<()>;
}

/// Preferences stored as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default path: `~/.local/state/bazstat/prefs.json`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("bazstat")?;
        Ok(xdg_dirs.place_state_file("prefs.json")?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Preferences> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Preferences::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("read preferences: {}", self.path.display()))
            }
        };
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse preferences: {}", self.path.display()))
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(prefs).context("serialize preferences")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write preferences: {}", self.path.display()))?;
        tracing::debug!("saved preferences to {}", self.path.display());
        Ok(())
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            inner: Mutex::new(prefs),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        Ok(self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = prefs.clone();
        Ok(())
    }
}

/// Set the username, keeping the other fields. Returns the stored preferences.
pub fn set_username(store: &dyn PreferenceStore, username: &str) -> Result<Preferences> {
    let mut prefs = store.load()?;
    prefs.username = username.trim().to_string();
    store.save(&prefs)?;
    Ok(prefs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        let prefs = store.load().unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(prefs.username().is_none());
    }

    #[test]
    fn file_store_save_then_load() {
        let dir = tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("state").join("prefs.json"));
        let prefs = Preferences {
            username: "alice".to_string(),
            vconsole_enabled: true,
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"vconsoleEnabled\": true"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"username": "bob"}"#).unwrap();
        let prefs = FilePreferenceStore::new(&path).load().unwrap();
        assert_eq!(prefs.username(), Some("bob"));
        assert!(!prefs.vconsole_enabled);
    }

    #[test]
    fn corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FilePreferenceStore::new(&path).load().is_err());
    }

    #[test]
    fn set_username_keeps_other_fields() {
        let store = MemoryPreferenceStore::new(Preferences {
            username: String::new(),
            vconsole_enabled: true,
        });
        let prefs = set_username(&store, "  carol ").unwrap();
        assert_eq!(prefs.username(), Some("carol"));
        assert!(store.load().unwrap().vconsole_enabled);
    }
}
