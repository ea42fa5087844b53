use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    location::{FixedLocation, NamedLocation},
    provider::ProviderId,
};

/// Per-provider overrides. Every field is optional; absent means the provider's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoding_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, e.g. "open-meteo".
    pub default_provider: Option<String>,

    /// Example TOML:
    /// [providers.open-meteo]
    /// timeout_secs = 10
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Position used when no coordinates or city are given.
    ///
    /// [home]
    /// name = "Paris"
    /// country = "France"
    /// latitude = 48.85341
    /// longitude = 2.3488
    pub home: Option<NamedLocation>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    ///
    /// Open-Meteo needs no credentials, so an unset default selects it.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            None => Ok(ProviderId::OpenMeteo),
            Some(s) => ProviderId::try_from(s).map_err(|e| {
                anyhow!("{e}\nHint: run `weather configure` to pick a supported provider.")
            }),
        }
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Set/replace a provider's settings and set it as default if none is chosen yet.
    pub fn upsert_provider(&mut self, id: ProviderId, settings: ProviderConfig) {
        self.providers.insert(id.as_str().to_string(), settings);

        if self.default_provider.is_none() {
            self.default_provider = Some(id.to_string());
        }
    }

    pub fn set_home(&mut self, home: NamedLocation) {
        self.home = Some(home);
    }

    /// The home location as a location source, if one is configured.
    pub fn home_source(&self) -> Option<FixedLocation> {
        self.home.clone().map(FixedLocation)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
