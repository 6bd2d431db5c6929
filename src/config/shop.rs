//! Application configuration loading from config.toml
//!
//! The file is optional. Every section and field has a default, so a missing
//! file or a partial one still yields a usable configuration.

use crate::{
    assistant::DEFAULT_MODEL,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Shop identity printed on documents
    #[serde(default)]
    pub shop: ShopConfig,
    /// Text-generation settings
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// Shop identity used in print headers
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ShopConfig {
    /// Shop name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Street address
    pub address: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: "Printer Repair Shop".to_string(),
            phone: String::new(),
            address: String::new(),
        }
    }
}

/// Text-generation assistant settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AssistantConfig {
    /// Hosted model name
    pub model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads `./config.toml`, using defaults when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    if !path.exists() {
        info!("No config.toml found, using default configuration");
        return Ok(AppConfig::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [shop]
            name = "Fix-It Printers"
            phone = "555-0100"
            address = "12 Main St"

            [assistant]
            model = "gemini-2.0-flash"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.shop.name, "Fix-It Printers");
        assert_eq!(config.shop.phone, "555-0100");
        assert_eq!(config.assistant.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("[shop]\nname = \"Tonerland\"\n").unwrap();
        assert_eq!(config.shop.name, "Tonerland");
        assert!(config.shop.address.is_empty());
        assert_eq!(config.assistant, AssistantConfig::default());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = std::env::temp_dir().join("repair_desk_bad_config.toml");
        std::fs::write(&dir, "[shop\nname=").unwrap();
        let result = load_config(&dir);
        let _ = std::fs::remove_file(&dir);
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }
}
