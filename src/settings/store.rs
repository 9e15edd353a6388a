//! Settings store for persisting preferences to disk
//!
//! Provides a `SettingsStore` that reads and writes the whole preference
//! document as a single JSON file.

use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::PathBuf;

use super::UserPreferences;

/// File holding the preference document
const SETTINGS_FILE: &str = "settings.json";

/// Reads and writes `UserPreferences`
///
/// The store keeps its file in an XDG-compliant config directory
/// (`~/.config/helloweather/` on Linux). Reads never fail: a missing or
/// unreadable file yields the defaults. There is no locking, so with several
/// instances running the last write wins.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Directory where the settings file lives
    settings_dir: PathBuf,
}

impl SettingsStore {
    /// Creates a store in the platform config directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "helloweather")?;
        let settings_dir = project_dirs.config_dir().to_path_buf();
        Some(Self { settings_dir })
    }

    /// Creates a store with a custom directory
    pub fn with_dir(settings_dir: PathBuf) -> Self {
        Self { settings_dir }
    }

    /// Full path of the settings file
    pub fn path(&self) -> PathBuf {
        self.settings_dir.join(SETTINGS_FILE)
    }

    /// Reads the preferences, falling back to defaults
    pub fn load(&self) -> UserPreferences {
        let content = match fs::read_to_string(self.path()) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return UserPreferences::default(),
            Err(e) => {
                tracing::warn!("Could not read settings, using defaults: {}", e);
                return UserPreferences::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Settings file is corrupt, using defaults: {}", e);
            UserPreferences::default()
        })
    }

    /// Writes the preferences, creating the directory if needed
    pub fn save(&self, prefs: &UserPreferences) -> io::Result<()> {
        fs::create_dir_all(&self.settings_dir)?;

        let json = serde_json::to_string_pretty(prefs)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(self.path(), json)
    }

    /// Read-modify-write of the stored preferences
    ///
    /// Returns the preferences as written.
    pub fn update<F>(&self, change: F) -> io::Result<UserPreferences>
    where
        F: FnOnce(&mut UserPreferences),
    {
        let mut prefs = self.load();
        change(&mut prefs);
        self.save(&prefs)?;
        Ok(prefs)
    }
}
