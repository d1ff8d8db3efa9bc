use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Settings for talking to the recipe analysis service
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzerConfig {
    /// Base URL of the service (the analyze path is appended to it)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Dietary restrictions forwarded with every request
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Preferred cuisine forwarded with every request
    #[serde(default)]
    pub cuisine_preference: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_timeout(),
            dietary_restrictions: Vec::new(),
            cuisine_preference: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl AnalyzerConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_ANALYZER__ prefix
    /// 2. recipe_analyzer.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_ANALYZER__ENDPOINT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AnalyzerConfig::load`] for the lookup order.
pub fn load_config() -> Result<AnalyzerConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe_analyzer").required(false))
        // Use double underscore for nested keys: RECIPE_ANALYZER__TIMEOUT
        .add_source(
            Environment::with_prefix("RECIPE_ANALYZER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_values() {
        assert_eq!(default_endpoint(), "http://localhost:8000");
        assert_eq!(default_timeout(), 30);
    }

    #[test]
    fn test_config_default_matches_serde_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8000");
        assert_eq!(config.timeout, 30);
        assert!(config.dietary_restrictions.is_empty());
        assert!(config.cuisine_preference.is_none());
    }

    #[test]
    fn test_load_config_without_file() {
        // Clear any environment variables that might interfere
        let keys_to_clear: Vec<String> = env::vars()
            .filter(|(k, _)| k.starts_with("RECIPE_ANALYZER__"))
            .map(|(k, _)| k)
            .collect();

        for key in keys_to_clear {
            env::remove_var(&key);
        }

        // Every field has a default, so an empty environment still loads
        let config = load_config().unwrap();
        assert_eq!(config.endpoint, "http://localhost:8000");
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: AnalyzerConfig = serde_json::from_str(
            r#"{"endpoint": "http://recipes.internal:9000", "cuisine_preference": "Thai"}"#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "http://recipes.internal:9000");
        assert_eq!(config.timeout, 30);
        assert_eq!(config.cuisine_preference.as_deref(), Some("Thai"));
    }
}
