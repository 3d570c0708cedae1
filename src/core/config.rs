use crate::core::currency::RateTable;
use crate::core::registration::RegistrationPolicy;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum SourceConfig {
    File { file: String },
    Http { url: String },
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub sources: Vec<SourceConfig>,
    pub currency: String,
    /// Units of `currency` per unit of each listed code. Replaces the
    /// built-in table when present.
    #[serde(default)]
    pub rates: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub registration: RegistrationPolicy,
    /// Directory of the file this config was loaded from.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "regdash", "regdash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate().with_context(|| {
            format!("Invalid config file: {}", path.as_ref().display())
        })?;
        config.config_dir = path.as_ref().parent().map(|p| p.to_path_buf());
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency.trim().is_empty() {
            bail!("Reference currency must not be empty");
        }
        if let Some(rates) = &self.rates {
            for (code, rate) in rates {
                if !rate.is_finite() || *rate <= 0.0 {
                    bail!("Rate for {code} must be a positive number, got {rate}");
                }
            }
        }
        Ok(())
    }

    /// Conversion table with `currency` as its reference.
    pub fn rate_table(&self) -> RateTable {
        match &self.rates {
            Some(rates) => RateTable::new(&self.currency, rates.iter().map(|(c, r)| (c, *r))),
            None => RateTable::with_default_rates().rebase(&self.currency),
        }
    }

    /// Resolves a file source path relative to the config file's directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        match &self.config_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        }
    }
}
