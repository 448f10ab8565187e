//! Console configuration management
//!
//! Handles loading and saving the console configuration file and resolving the
//! final settings through the defaults → file → env → CLI priority chain.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sf8xxx_core::{BoardConfig, DefaultBoard};
use sf8xxx_hardware::SerialSettings;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest accepted response deadline
pub const MAX_TIMEOUT_MS: u64 = 5000;

/// Environment variable overriding `timeout_ms`
pub const ENV_TIMEOUT_MS: &str = "SF8_TIMEOUT_MS";
/// Environment variable overriding `output_format`
pub const ENV_FORMAT: &str = "SF8_FORMAT";
/// Environment variable overriding `verbose`
pub const ENV_VERBOSE: &str = "SF8_VERBOSE";

/// Returns the default path of the console configuration file.
///
/// - Linux/macOS: `~/.config/sf8xxx/console.toml`
/// - Fallback: `/etc/sf8xxx/console.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("sf8xxx")
        .join("console.toml")
}

/// Console configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Response deadline per request, in milliseconds
    pub timeout_ms: u64,

    /// Serial line speed
    pub baud_rate: u32,

    /// Default output format
    pub output_format: String,

    /// Enable verbose logging by default
    pub verbose: bool,

    /// Log every frame sent and received
    pub debug_uart: bool,

    /// Devices dialled at startup, alias → port
    pub devices: BTreeMap<String, String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DefaultBoard::DEFAULT_TIMEOUT_MS,
            baud_rate: DefaultBoard::BAUD_RATE,
            output_format: "table".to_string(),
            verbose: false,
            debug_uart: false,
            devices: BTreeMap::new(),
        }
    }
}

impl CliConfig {
    /// Load configuration from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Serial parameters handed to every session
    pub fn serial_settings(&self) -> SerialSettings {
        SerialSettings {
            baud_rate: self.baud_rate,
            timeout: Duration::from_millis(self.timeout_ms),
            debug_uart: self.debug_uart,
        }
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for console configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Each layer only fills what a higher layer has not set, so CLI values may be
/// applied first.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    timeout_ms: Option<u64>,
    baud_rate: Option<u32>,
    output_format: Option<String>,
    verbose: Option<bool>,
    debug_uart: Option<bool>,
    devices: Option<BTreeMap<String, String>>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set response deadline (with validation)
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self> {
        Self::validate_timeout(timeout_ms)?;
        self.timeout_ms = Some(timeout_ms);
        Ok(self)
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set frame logging flag
    pub fn with_debug_uart(mut self, debug_uart: bool) -> Self {
        self.debug_uart = Some(debug_uart);
        self
    }

    /// Merge the configuration file at `path`
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn with_config_file(self, path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(self);
        };
        if !path.exists() {
            return Ok(self);
        }

        let config = CliConfig::load(path)?;
        Self::validate_timeout(config.timeout_ms)?;
        Self::validate_output_format(&config.output_format)?;

        // Only use file values if they weren't already set (preserving priority)
        Ok(Self {
            timeout_ms: self.timeout_ms.or(Some(config.timeout_ms)),
            baud_rate: self.baud_rate.or(Some(config.baud_rate)),
            output_format: self.output_format.or(Some(config.output_format)),
            verbose: self.verbose.or(Some(config.verbose)),
            debug_uart: self.debug_uart.or(Some(config.debug_uart)),
            devices: self.devices.or(Some(config.devices)),
        })
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if self.timeout_ms.is_none() {
            if let Ok(timeout) = std::env::var(ENV_TIMEOUT_MS) {
                if let Ok(timeout) = timeout.parse() {
                    if Self::validate_timeout(timeout).is_ok() {
                        self.timeout_ms = Some(timeout);
                    }
                }
            }
        }

        if self.output_format.is_none() {
            if let Ok(format) = std::env::var(ENV_FORMAT) {
                if Self::validate_output_format(&format).is_ok() {
                    self.output_format = Some(format);
                }
            }
        }

        if self.verbose.is_none() {
            if let Ok(verbose) = std::env::var(ENV_VERBOSE) {
                self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let timeout_ms = self.timeout_ms.unwrap_or(defaults.timeout_ms);
        let output_format = self.output_format.unwrap_or(defaults.output_format);

        Self::validate_timeout(timeout_ms)?;
        Self::validate_output_format(&output_format)?;

        Ok(CliConfig {
            timeout_ms,
            baud_rate: self.baud_rate.unwrap_or(defaults.baud_rate),
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            debug_uart: self.debug_uart.unwrap_or(defaults.debug_uart),
            devices: self.devices.unwrap_or(defaults.devices),
        })
    }

    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }

    fn validate_timeout(timeout_ms: u64) -> Result<()> {
        if timeout_ms == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout_ms > MAX_TIMEOUT_MS {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to {} ms",
                MAX_TIMEOUT_MS
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        std::env::remove_var(ENV_TIMEOUT_MS);
        std::env::remove_var(ENV_FORMAT);
        std::env::remove_var(ENV_VERBOSE);
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.timeout_ms, 200);
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.output_format, "table");
        assert!(!config.verbose);
        assert!(!config.debug_uart);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("sf8xxx/console.toml"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("console.toml");

        let mut config = CliConfig::default();
        config.timeout_ms = 350;
        config
            .devices
            .insert("left".to_string(), "/dev/ttyUSB0".to_string());
        config.save(&path).unwrap();

        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("console.toml");
        std::fs::write(&path, "verbose = true\n\n[devices]\nright = \"COM3\"\n").unwrap();

        let loaded = CliConfig::load(&path).unwrap();
        assert!(loaded.verbose);
        assert_eq!(loaded.timeout_ms, 200);
        assert_eq!(loaded.devices.get("right").map(String::as_str), Some("COM3"));
    }

    #[test]
    fn test_serial_settings() {
        let mut config = CliConfig::default();
        config.timeout_ms = 500;
        config.debug_uart = true;

        let settings = config.serial_settings();
        assert_eq!(settings.baud_rate, 115200);
        assert_eq!(settings.timeout, Duration::from_millis(500));
        assert!(settings.debug_uart);
    }

    // ConfigBuilder tests

    #[test]
    #[serial]
    fn test_builder_with_defaults() {
        clear_env();
        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_builder_validation() {
        assert!(ConfigBuilder::new().with_timeout_ms(0).is_err());
        assert!(ConfigBuilder::new().with_timeout_ms(5001).is_err());
        assert!(ConfigBuilder::new().with_timeout_ms(1).is_ok());
        assert!(ConfigBuilder::new().with_timeout_ms(5000).is_ok());

        assert!(ConfigBuilder::new().with_output_format("xml").is_err());
        assert!(ConfigBuilder::new().with_output_format("json").is_ok());
    }

    #[test]
    fn test_builder_missing_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let config = ConfigBuilder::new()
            .with_config_file(Some(&path))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_builder_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("console.toml");

        std::fs::write(&path, "timeout_ms = \"soon\"\n").unwrap();
        assert!(ConfigBuilder::new().with_config_file(Some(&path)).is_err());

        std::fs::write(&path, "timeout_ms = 0\n").unwrap();
        assert!(ConfigBuilder::new().with_config_file(Some(&path)).is_err());
    }

    #[test]
    #[serial]
    fn test_builder_priority_chain() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("console.toml");
        std::fs::write(
            &path,
            "timeout_ms = 300\noutput_format = \"json\"\nverbose = false\n",
        )
        .unwrap();

        std::env::set_var(ENV_TIMEOUT_MS, "400");
        std::env::set_var(ENV_VERBOSE, "1");

        // CLI first, then env, then file: each layer only fills gaps
        let config = ConfigBuilder::new()
            .with_output_format("table")
            .unwrap()
            .with_env_overrides()
            .with_config_file(Some(&path))
            .unwrap()
            .build()
            .unwrap();

        // CLI arg wins
        assert_eq!(config.output_format, "table");
        // Env beats file
        assert_eq!(config.timeout_ms, 400);
        assert!(config.verbose);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_invalid_env_values_ignored() {
        clear_env();
        std::env::set_var(ENV_TIMEOUT_MS, "invalid");
        std::env::set_var(ENV_FORMAT, "xml");

        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();

        assert_eq!(config.timeout_ms, 200);
        assert_eq!(config.output_format, "table");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_env_timeout_out_of_range_ignored() {
        clear_env();
        std::env::set_var(ENV_TIMEOUT_MS, "60000");

        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();
        assert_eq!(config.timeout_ms, 200);

        clear_env();
    }
}
