use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    Denomination, JournalError, Language, PrayerStyle, Result, DEFAULT_STORAGE_KEY,
};

/// Environment variables consulted for the generation API key, in order
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Directory holding the journal's key-value files
    pub data_dir: PathBuf,

    /// Key the journal is stored under
    pub storage_key: String,

    /// Generation model name
    pub model: String,

    /// Base URL of the generation API
    pub api_base: String,

    /// API key for the generation service; the environment is used when unset
    pub api_key: Option<String>,

    /// Sampling temperature for generation
    pub temperature: f32,

    pub default_language: Language,
    pub default_style: PrayerStyle,
    pub default_denomination: Denomination,

    /// Directory with serif/sans font faces for share images.
    /// The built-in bitmap font is used when unset.
    pub font_dir: Option<PathBuf>,

    /// Where exported share images are written
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let (data_dir, export_dir) = match Self::project_dirs() {
            Some(dirs) => (
                dirs.data_dir().to_path_buf(),
                dirs.data_dir().join("exports"),
            ),
            None => (PathBuf::from(".soulscribe"), PathBuf::from(".")),
        };

        Config {
            data_dir,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            temperature: 0.7,
            default_language: Language::default(),
            default_style: PrayerStyle::default(),
            default_denomination: Denomination::default(),
            font_dir: None,
            export_dir,
        }
    }
}

impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("app", "soulscribe", "soulscribe")
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads the config at `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            JournalError::ConfigError {
                message: format!("{}: {}", path.display(), e),
            }
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Resolves the API key: the configured one first, then the environment
    pub fn api_key(&self) -> Option<String> {
        self.api_key_from(|var| std::env::var(var).ok())
    }

    /// Resolves the API key, reading variables through `lookup` instead of the process
    /// environment
    pub fn api_key_from<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Some(key.clone());
        }

        API_KEY_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .find(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("none.json")).unwrap();

        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.temperature, 0.7);
        assert!(config.font_dir.is_none());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.json");
        let config = Config {
            default_language: Language::En,
            default_denomination: Denomination::Orthodox,
            font_dir: Some(dir.path().join("fonts")),
            ..Config::default()
        };

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded.default_language, Language::En);
        assert_eq!(loaded.default_denomination, Denomination::Orthodox);
        assert_eq!(loaded.font_dir, config.font_dir);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_style": "short" }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_style, PrayerStyle::Short);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(JournalError::ConfigError { .. })
        ));
    }

    #[test]
    fn configured_key_wins() {
        let config = Config {
            api_key: Some("from-config".into()),
            ..Config::default()
        };
        assert_eq!(config.api_key().as_deref(), Some("from-config"));
        assert_eq!(
            config.api_key_from(|_| Some("from-env".into())).as_deref(),
            Some("from-config")
        );
    }

    #[test]
    fn environment_key_is_used_in_order_when_config_has_none() {
        let config = Config {
            api_key: Some(String::new()),
            ..Config::default()
        };
        let env = |var: &str| match var {
            "API_KEY" => Some(String::new()),
            "GEMINI_API_KEY" => Some("gemini".to_string()),
            _ => None,
        };

        assert_eq!(config.api_key_from(env).as_deref(), Some("gemini"));
        assert_eq!(config.api_key_from(|_| None), None);
    }
}
