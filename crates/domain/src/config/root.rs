use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::rules::{ConfigRule, RuleEntry};
use super::server::{ListenNet, ServerConfig};
use super::upstream::UpstreamConfig;
use crate::{normalize_domain, AnswerSet};

/// Main configuration structure for tinydns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Ordered routing rules, first match wins.
    #[serde(default)]
    pub records: Vec<RuleEntry>,

    /// Static record store. The `*` key answers any unmatched domain.
    #[serde(default)]
    pub hosts: BTreeMap<String, AnswerSet>,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. tinydns.toml in current directory
    /// 3. /etc/tinydns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new("tinydns.toml").exists() {
            Self::from_file("tinydns.toml")?
        } else if Path::new("/etc/tinydns/config.toml").exists() {
            Self::from_file("/etc/tinydns/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file. `.yaml`/`.yml` files are
    /// read as YAML, everything else as TOML.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        let is_yaml = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(listen) = overrides.listen {
            self.server.listen = listen;
        }
        if let Some(net) = overrides.net {
            self.server.net = net;
        }
        if let Some(enabled) = overrides.cache_enabled {
            self.cache.enabled = enabled;
        }
        if !overrides.upstream_servers.is_empty() {
            self.upstream.servers = overrides.upstream_servers;
            self.upstream.provider = None;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Listen address cannot be empty".to_string(),
            ));
        }

        self.upstream.timeout()?;
        self.upstream.default_a_addr()?;
        self.upstream.default_aaaa_addr()?;

        let endpoints = self.upstream.endpoints(self.server.net.upstream_net())?;
        if endpoints.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }

        self.rules()?;

        if self.hosts.keys().any(|key| key.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "Host entries must have a non-empty domain".to_string(),
            ));
        }

        Ok(())
    }

    /// Validated rules in declaration order.
    pub fn rules(&self) -> Result<Vec<ConfigRule>, ConfigError> {
        self.records.iter().map(RuleEntry::validate).collect()
    }

    /// Host entries keyed by lookup name (`*` stays as is).
    pub fn host_records(&self) -> Vec<(String, AnswerSet)> {
        self.hosts
            .iter()
            .map(|(domain, answers)| (normalize_domain(domain.trim()), answers.clone()))
            .collect()
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen: Option<String>,
    pub net: Option<ListenNet>,
    pub cache_enabled: Option<bool>,
    pub upstream_servers: Vec<String>,
    pub log_level: Option<String>,
}
