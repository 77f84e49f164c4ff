//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum size of an XML part read from the package (bytes)
    ///
    /// Bounds extraction cost to metadata size regardless of the size of the
    /// document body.
    #[serde(default = "default_max_core_properties_bytes")]
    pub max_core_properties_bytes: u64,
}

fn default_max_core_properties_bytes() -> u64 {
    1024 * 1024
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_core_properties_bytes == 0 {
            return Err("max_core_properties_bytes must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_core_properties_bytes: default_max_core_properties_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_core_properties_bytes, 1_048_576);
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let config = ExtractorConfig {
            max_core_properties_bytes: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig {
            max_core_properties_bytes: 4096,
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.max_core_properties_bytes, 4096);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("").unwrap();
        assert_eq!(parsed.max_core_properties_bytes, 1_048_576);
    }
}
