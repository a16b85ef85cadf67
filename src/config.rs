use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// A currency users may request, with display metadata.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrencyConfig {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// One provider slot in the fallback chain. Higher priority dispatches
/// first; inactive entries are ignored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderDescriptor {
    pub name: String,
    pub priority: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FixerProviderConfig {
    pub base_url: String,
    pub access_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SyntheticProviderConfig {
    pub seed: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub fixer: Option<FixerProviderConfig>,
    pub synthetic: Option<SyntheticProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            fixer: Some(FixerProviderConfig {
                base_url: "http://data.fixer.io/api".to_string(),
                access_key: None,
            }),
            synthetic: Some(SyntheticProviderConfig { seed: 42 }),
        }
    }
}

/// A rate row seeded into the local store at startup.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LocalRateConfig {
    pub source: String,
    pub target: String,
    pub date: NaiveDate,
    pub rate: Decimal,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub currencies: Vec<CurrencyConfig>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_chain")]
    pub chain: Vec<ProviderDescriptor>,
    #[serde(default)]
    pub local_rates: Vec<LocalRateConfig>,
}

fn default_chain() -> Vec<ProviderDescriptor> {
    vec![
        ProviderDescriptor {
            name: "fixer".to_string(),
            priority: 2,
            is_active: true,
        },
        ProviderDescriptor {
            name: "local".to_string(),
            priority: 1,
            is_active: true,
        },
    ]
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxr", "fxr")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Access key for the fixer API: the config value when present,
    /// otherwise the `FIXER_API_KEY` environment variable.
    pub fn fixer_access_key(&self) -> Option<String> {
        self.providers
            .fixer
            .as_ref()
            .and_then(|fixer| fixer.access_key.clone())
            .or_else(|| std::env::var("FIXER_API_KEY").ok())
    }
}
