use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt};

use crate::error::Result;
use crate::i18n::Language;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// User settings kept between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Preferences {
    /// `$XDG_CONFIG_HOME/tawseek-misr/preferences.json`, falling back to
    /// `$HOME/.config`.
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join("tawseek-misr").join("preferences.json"))
    }

    /// Reads preferences from `path`; a missing file yields the defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preferences at {}, using defaults", path.display());
                return Ok(Preferences::default());
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("Reading preferences from {}", path.display()))
                    .into());
            }
        };
        Ok(serde_json::from_str(&contents)
            .with_context(|| format!("Parsing preferences at {}", path.display()))?)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Creating {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("Encoding preferences")?;
        let mut file = fs::File::create(path)
            .await
            .with_context(|| format!("Creating {}", path.display()))?;
        file.write_all(contents.as_bytes())
            .await
            .with_context(|| format!("Writing {}", path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("Flushing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(&dir.path().join("nope.json")).await.unwrap();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.language, Language::Arabic);
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let prefs = Preferences {
            language: Language::English,
            theme: Theme::Dark,
            auth_token: Some("token-123".into()),
        };
        prefs.save(&path).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"language\": \"en\""));
        assert!(raw.contains("\"theme\": \"dark\""));
        assert_eq!(Preferences::load(&path).await.unwrap(), prefs);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn saved_file_is_complete_on_return() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let prefs = Preferences {
            language: Language::Arabic,
            theme: Theme::Light,
            auth_token: Some("x".repeat(20_000)),
        };
        for _ in 0..200 {
            prefs.save(&path).await.unwrap();
            let raw = std::fs::read_to_string(&path).unwrap();
            let read: Preferences = serde_json::from_str(&raw).unwrap();
            assert_eq!(read, prefs);
        }
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Preferences::load(&path).await.is_err());
    }
}
