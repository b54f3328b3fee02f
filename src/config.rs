//! Settings
//!
//! The API key and API base URL live in a TOML file under the user config
//! directory (`devpub/config.toml`). `DEVPUB_API_KEY` and `DEVPUB_API_URL`
//! override the file. Settings are handed to the gateway explicitly; nothing
//! else reads them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants as C;
use crate::{Error, Result};

fn default_api_base_url() -> String {
    C::DEFAULT_API_BASE_URL.to_string()
}

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// DEV API key; stored unencrypted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL, without trailing `/articles`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: None,
            api_base_url: default_api_base_url(),
        }
    }
}

impl Settings {
    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from(&Self::config_path()?)?;
        settings.apply_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {e}")))?;
        fs::write(path, content)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in [`Settings::load`])
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(C::ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(C::ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
    }

    /// The API key, or [`Error::MissingApiKey`]
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(Error::MissingApiKey)
    }

    /// API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> Option<String> {
        let key = self.api_key.as_deref()?;
        let visible: String = key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        Some(format!("{}{}", "*".repeat(key.chars().count().saturating_sub(4)), visible))
    }

    /// `<config dir>/devpub/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        Ok(dir.join(C::CONFIG_DIR_NAME).join(C::CONFIG_FILE_NAME))
    }
}

/// Vault root: the explicit flag (or `DEVPUB_VAULT`), else the current directory
pub fn vault_root(flag: Option<&Path>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}
