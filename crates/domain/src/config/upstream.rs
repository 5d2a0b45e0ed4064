use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use super::errors::ConfigError;
use crate::{UpstreamEndpoint, UpstreamNet};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Named public resolver set. Replaces `servers` when present.
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout: String,

    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default)]
    pub fallback_response: bool,

    #[serde(default = "default_a")]
    pub default_a: String,

    #[serde(default = "default_aaaa")]
    pub default_aaaa: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            provider: None,
            timeout: default_timeout(),
            retries: default_retries(),
            fallback_response: false,
            default_a: default_a(),
            default_aaaa: default_aaaa(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        let timeout = parse_duration(&self.timeout).map_err(ConfigError::Validation)?;
        if timeout.is_zero() {
            return Err(ConfigError::Validation(
                "Upstream timeout must be greater than zero".to_string(),
            ));
        }
        Ok(timeout)
    }

    pub fn server_list(&self) -> Result<Vec<String>, ConfigError> {
        match self.provider.as_deref() {
            Some(provider) => public_dns_servers(provider)
                .map(|servers| servers.iter().map(|s| s.to_string()).collect())
                .ok_or_else(|| {
                    ConfigError::Validation(format!("Unknown upstream provider '{}'", provider))
                }),
            None => Ok(self.servers.clone()),
        }
    }

    pub fn endpoints(&self, default_net: UpstreamNet) -> Result<Vec<UpstreamEndpoint>, ConfigError> {
        self.server_list()?
            .iter()
            .map(|server| {
                UpstreamEndpoint::parse_with_default(server, default_net)
                    .map_err(ConfigError::Validation)
            })
            .collect()
    }

    /// `None` when the default is empty, which disables A fallback.
    pub fn default_a_addr(&self) -> Result<Option<Ipv4Addr>, ConfigError> {
        parse_optional(&self.default_a, "default_a")
    }

    pub fn default_aaaa_addr(&self) -> Result<Option<Ipv6Addr>, ConfigError> {
        parse_optional(&self.default_aaaa, "default_aaaa")
    }
}

fn parse_optional<T: std::str::FromStr>(
    value: &str,
    field: &str,
) -> Result<Option<T>, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<T>().map(Some).map_err(|_| {
        ConfigError::Validation(format!("Invalid {} address '{}'", field, value))
    })
}

/// Parses `500ms`, `2s`, `1m` or `1.5s`.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let (number, unit) = if let Some(n) = value.strip_suffix("ms") {
        (n, "ms")
    } else if let Some(n) = value.strip_suffix('s') {
        (n, "s")
    } else if let Some(n) = value.strip_suffix('m') {
        (n, "m")
    } else {
        return Err(format!(
            "Invalid duration '{}', expected a ms, s or m suffix",
            value
        ));
    };
    let number: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("Invalid duration '{}'", value))?;
    if !number.is_finite() || number < 0.0 {
        return Err(format!("Invalid duration '{}'", value));
    }
    let secs = match unit {
        "ms" => number / 1000.0,
        "m" => number * 60.0,
        _ => number,
    };
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("Duration '{}' is out of range", value))
}

const PUBLIC_DNS_SERVERS: &[(&str, &[&str])] = &[
    (
        "cloudflare",
        &[
            "1.1.1.1:53",
            "1.0.0.1:53",
            "2606:4700:4700::1111",
            "2606:4700:4700::1001",
        ],
    ),
    (
        "google",
        &[
            "8.8.8.8:53",
            "8.8.4.4:53",
            "2001:4860:4860::8888",
            "2001:4860:4860::8844",
        ],
    ),
    (
        "quad9",
        &["9.9.9.9:53", "149.112.112.112:53", "2620:fe::fe", "2620:fe::9"],
    ),
    (
        "opendns",
        &[
            "208.67.222.222:53",
            "208.67.220.220:53",
            "2620:119:35::35",
            "2620:119:53::53",
        ],
    ),
    (
        "alidns",
        &[
            "223.5.5.5:53",
            "223.6.6.6:53",
            "2400:3200::1",
            "2400:3200:baba::1",
        ],
    ),
    ("dnspod", &["119.29.29.29:53", "119.28.28.28:53"]),
    ("baidu", &["180.76.76.76:53"]),
    ("cnnic", &["1.2.4.8:53", "210.2.4.8:53"]),
];

pub fn public_dns_servers(provider: &str) -> Option<&'static [&'static str]> {
    let provider = provider.trim().to_ascii_lowercase();
    PUBLIC_DNS_SERVERS
        .iter()
        .find(|(name, _)| *name == provider)
        .map(|(_, servers)| *servers)
}

pub fn all_public_dns_servers() -> Vec<&'static str> {
    PUBLIC_DNS_SERVERS
        .iter()
        .flat_map(|(_, servers)| servers.iter().copied())
        .collect()
}

fn default_servers() -> Vec<String> {
    vec!["1.1.1.1:53".to_string()]
}

fn default_timeout() -> String {
    "2s".to_string()
}

fn default_retries() -> u32 {
    2
}

fn default_a() -> String {
    "0.0.0.0".to_string()
}

fn default_aaaa() -> String {
    "::".to_string()
}
