use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::image::ONE_MB;

/// Settings for the recipe form and its backend client
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FormConfig {
    /// Base URL of the recipe backend (scheme, host and port)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the create endpoint
    #[serde(default = "default_create_path")]
    pub create_path: String,
    /// Prefix of the recipe detail route; the new id is appended
    #[serde(default = "default_detail_prefix")]
    pub detail_prefix: String,
    /// Largest accepted image upload in bytes
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    /// Request timeout in milliseconds; 0 leaves requests unbounded
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            create_path: default_create_path(),
            detail_prefix: default_detail_prefix(),
            max_image_bytes: default_max_image_bytes(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_create_path() -> String {
    "/api/recipes/create".to_string()
}

fn default_detail_prefix() -> String {
    "/recipes".to_string()
}

fn default_max_image_bytes() -> u64 {
    ONE_MB
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl FormConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_FORM__ prefix
    /// 2. recipe_form.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_FORM__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// Route of the detail view for a newly created recipe.
    pub fn detail_path(&self, recipe_id: &str) -> String {
        format!("{}/{}", self.detail_prefix.trim_end_matches('/'), recipe_id)
    }
}

/// Load configuration from file and environment variables
///
/// See [`FormConfig::load`] for the source priority.
pub fn load_config() -> Result<FormConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe_form").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_FORM")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = FormConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.create_path, "/api/recipes/create");
        assert_eq!(config.max_image_bytes, 1_048_576);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config = FormConfig {
            timeout_ms: 0,
            ..FormConfig::default()
        };
        assert_eq!(config.request_timeout(), None);

        let config = FormConfig {
            timeout_ms: 250,
            ..FormConfig::default()
        };
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_detail_path() {
        let mut config = FormConfig::default();
        assert_eq!(config.detail_path("abc123"), "/recipes/abc123");
        config.detail_prefix = "/r/".to_string();
        assert_eq!(config.detail_path("abc123"), "/r/abc123");
    }

    #[test]
    fn test_load_config_without_file() {
        // Every field has a default, so a missing file is not an error
        let config = load_config().unwrap();
        assert!(!config.create_path.is_empty());
        assert!(config.max_image_bytes > 0);
    }
}
