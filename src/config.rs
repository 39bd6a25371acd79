//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the law-links service, supporting
//! configuration files, environment variables and command line overrides with
//! validation and type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables, CLI arguments
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration files
//! 4. Default values (lowest priority)
//!
//! The detection heuristics (fuzzy threshold, keyword fallback table) are
//! deliberately configuration data rather than code, so they can be tuned and
//! tested independently of the grammar.

use crate::errors::{DetectError, Result};
use crate::LawId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Alias source settings
    pub aliases: AliasesConfig,
    /// Detection heuristics
    pub detection: DetectionConfig,
    /// Logging and monitoring
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum request payload size in MB
    pub max_payload_size_mb: usize,
    /// Enable CORS
    pub enable_cors: bool,
    /// Number of HTTP worker threads
    pub workers: usize,
}

/// Alias source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasesConfig {
    /// Path to the alias file (JSON object: law-id string -> alias list)
    pub path: PathBuf,
}

/// A substring keyword mapped to a canonical law id, used as the last
/// resolution fallback after exact and fuzzy matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordFallback {
    /// Case-folded substring to look for in the law-name phrase
    pub pattern: String,
    /// Law id to resolve to
    pub law_id: LawId,
}

/// Detection heuristics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum overlap score for a fuzzy alias match; the best score must
    /// strictly exceed this value to resolve
    pub fuzzy_threshold: f64,
    /// Keyword -> law id fallback table, consulted in listed order
    pub keyword_fallbacks: Vec<KeywordFallback>,
}

/// Logging and monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| DetectError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| DetectError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("LAW_LINKS_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("LAW_LINKS_PORT") {
            self.server.port = port.parse().map_err(|_| DetectError::Config {
                message: "Invalid port number in LAW_LINKS_PORT".to_string(),
            })?;
        }
        if let Ok(path) = std::env::var("LAW_LINKS_ALIASES") {
            self.aliases.path = PathBuf::from(path);
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(DetectError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.server.workers == 0 {
            return Err(DetectError::ValidationFailed {
                field: "server.workers".to_string(),
                reason: "Worker count must be greater than zero".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.detection.fuzzy_threshold) {
            return Err(DetectError::ValidationFailed {
                field: "detection.fuzzy_threshold".to_string(),
                reason: "Threshold must be between 0 and 1".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            aliases: AliasesConfig::default(),
            detection: DetectionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8978,
            max_payload_size_mb: 10,
            enable_cors: true,
            workers: num_cpus::get(),
        }
    }
}

impl Default for AliasesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("law_aliases.json"),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.5,
            keyword_fallbacks: default_keyword_fallbacks(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Built-in keyword fallback table mapping canonical code names to the ids
/// used by the bundled alias file. Overridable from the config file.
fn default_keyword_fallbacks() -> Vec<KeywordFallback> {
    let pairs: &[(&str, LawId)] = &[
        ("гражданского кодекса", 1),
        ("налогового кодекса", 2),
        ("уголовного кодекса", 3),
        ("коап", 4),
        ("воздушного кодекса", 5),
        ("апк", 6),
        ("гпк", 7),
        ("трудового кодекса", 8),
    ];

    pairs
        .iter()
        .map(|(pattern, law_id)| KeywordFallback {
            pattern: pattern.to_string(),
            law_id: *law_id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8978);
        assert_eq!(config.detection.fuzzy_threshold, 0.5);
        assert!(!config.detection.keyword_fallbacks.is_empty());
        assert_eq!(config.aliases.path, PathBuf::from("law_aliases.json"));
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[detection]\nfuzzy_threshold = 0.7"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.detection.fuzzy_threshold, 0.7);
        // untouched sections keep their defaults
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validation_rejects_bad_threshold() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[detection]\nfuzzy_threshold = 1.5").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, DetectError::ValidationFailed { .. }));
    }

    #[test]
    fn test_keyword_fallback_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(
            parsed.detection.keyword_fallbacks.len(),
            config.detection.keyword_fallbacks.len()
        );
    }
}
