//! Configuration system
//!
//! Registry settings and pool manifests can be written in TOML or RON and
//! loaded through the [`Config`] trait.

use serde::{Deserialize, Serialize};

/// Serialization format of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML document
    Toml,
    /// Rusty Object Notation
    Ron,
}

impl ConfigFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            Ok(ConfigFormat::Toml)
        } else if path.ends_with(".ron") {
            Ok(ConfigFormat::Ron)
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse a configuration document held in memory
    fn from_str_with_format(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Render this configuration as a document
    fn to_string_with_format(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&contents, format)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = self.to_string_with_format(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings applied when a registry is established
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Name of the root container every pool container is nested under
    pub root_container_name: String,

    /// Fixed seed for template and randomized selection; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            root_container_name: "Pools".to_string(),
            rng_seed: None,
        }
    }
}

impl Config for RegistrySettings {}

/// One pool entry of a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDefinition {
    /// Pool tag
    pub tag: String,

    /// Template names, resolved by the caller's catalog
    pub variants: Vec<String>,

    /// Requested starting size
    #[serde(default)]
    pub count: i32,
}

/// A list of pools to create at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolManifest {
    /// Pool definitions in creation order
    #[serde(default)]
    pub pools: Vec<PoolDefinition>,
}

impl Config for PoolManifest {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_from_toml() {
        let manifest = PoolManifest::from_str_with_format(
            r#"
            [[pools]]
            tag = "Bullet"
            variants = ["Bullet"]
            count = 32

            [[pools]]
            tag = "Loot"
            variants = ["Coin", "Gem"]
            "#,
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(manifest.pools.len(), 2);
        assert_eq!(manifest.pools[0].count, 32);
        assert_eq!(manifest.pools[1].variants, vec!["Coin", "Gem"]);
        assert_eq!(manifest.pools[1].count, 0);
    }

    #[test]
    fn test_settings_from_ron_with_defaults() {
        let settings = RegistrySettings::from_str_with_format("(rng_seed: Some(7))", ConfigFormat::Ron).unwrap();
        assert_eq!(settings.rng_seed, Some(7));
        assert_eq!(settings.root_container_name, "Pools");
    }

    #[test]
    fn test_settings_toml_round_trip() {
        let settings = RegistrySettings {
            root_container_name: "Pooler".to_string(),
            rng_seed: Some(99),
        };
        let text = settings.to_string_with_format(ConfigFormat::Toml).unwrap();
        let parsed = RegistrySettings::from_str_with_format(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            RegistrySettings::load_from_file("settings.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("prefab_pool_manifest_{}.ron", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let manifest = PoolManifest {
            pools: vec![PoolDefinition {
                tag: "Spark".to_string(),
                variants: vec!["Spark".to_string()],
                count: 4,
            }],
        };

        manifest.save_to_file(&path).unwrap();
        let loaded = PoolManifest::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, manifest);
    }
}
