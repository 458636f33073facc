//! Config catalog — built-in presets plus TOML-loaded candidates.

use regimelab_core::config::{AdaptiveConfig, ConfigError, ConfigId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// A catalog entry: a human-readable name attached to a full configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedConfig {
    pub name: String,
    pub config: AdaptiveConfig,
}

impl NamedConfig {
    pub fn new(name: &str, config: AdaptiveConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
        }
    }

    pub fn config_id(&self) -> ConfigId {
        self.config.config_id()
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("catalog contains no configs")]
    Empty,
    #[error("duplicate config name in catalog: {name}")]
    DuplicateName { name: String },
    #[error("config {name} failed validation: {source}")]
    Invalid {
        name: String,
        #[source]
        source: ConfigError,
    },
}

/// On-disk catalog shape: a list of `[[configs]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    configs: Vec<NamedConfig>,
}

/// The built-in catalog seed.
pub fn builtin_catalog() -> Vec<NamedConfig> {
    vec![
        NamedConfig::new("conservative", AdaptiveConfig::conservative()),
        NamedConfig::new("aggressive", AdaptiveConfig::aggressive()),
    ]
}

/// Load and validate a catalog from a TOML file.
///
/// Every config is validated eagerly; names must be unique so report rows
/// stay unambiguous.
pub fn load_catalog(path: &Path) -> Result<Vec<NamedConfig>, CatalogError> {
    let text = std::fs::read_to_string(path)?;
    parse_catalog(&text)
}

fn parse_catalog(text: &str) -> Result<Vec<NamedConfig>, CatalogError> {
    let file: CatalogFile = toml::from_str(text)?;
    if file.configs.is_empty() {
        return Err(CatalogError::Empty);
    }
    let mut seen = BTreeSet::new();
    for entry in &file.configs {
        if !seen.insert(entry.name.clone()) {
            return Err(CatalogError::DuplicateName {
                name: entry.name.clone(),
            });
        }
        entry
            .config
            .validate()
            .map_err(|source| CatalogError::Invalid {
                name: entry.name.clone(),
                source,
            })?;
    }
    Ok(file.configs)
}
