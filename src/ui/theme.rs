use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than "dark" reads as light
    pub fn parse(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// (background, foreground)
    pub fn palette(&self) -> (&'static str, &'static str) {
        match self {
            Theme::Light => ("#f5f6fa", "#222"),
            Theme::Dark => ("#121212", "#f1f1f1"),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("Preferences file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt preferences file: {0}")]
    Json(#[from] serde_json::Error),
}

/// String preferences kept in `prefs.json`
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    pub fn new(config_dir: &Path) -> Self {
        Self { path: config_dir.join("prefs.json") }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value.to_string());
        fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }

    pub fn load_theme(&self) -> Result<Theme, PreferenceError> {
        Ok(self.get(THEME_KEY)?.map(|v| Theme::parse(&v)).unwrap_or_default())
    }

    /// Flip the stored theme and return the new one
    pub fn toggle_theme(&self) -> Result<Theme, PreferenceError> {
        let theme = self.load_theme()?.toggled();
        self.set(THEME_KEY, theme.as_str())?;
        Ok(theme)
    }
}
