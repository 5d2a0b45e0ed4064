use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

use super::errors::ConfigError;
use crate::{AnswerSet, DomainPattern, RecordKind, SrvEntry};

pub const DEFAULT_RULE_TTL: u32 = 300;
pub const DEFAULT_MX_PRIORITY: u16 = 10;

/// One `[[records]]` entry as written in the configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RuleEntry {
    pub domain: String,

    #[serde(rename = "type")]
    pub record_type: String,

    /// `resolve` (default) or `forward`.
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default)]
    pub ttl: Option<u32>,

    #[serde(default)]
    pub priority: Option<u16>,

    #[serde(default)]
    pub weight: Option<u16>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Answer locally with the rule's data.
    Resolve(AnswerSet),
    /// Skip every local tier and ask upstream.
    Forward,
}

/// A validated routing rule. The pipeline never re-checks its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRule {
    pub pattern: DomainPattern,
    pub kind: RecordKind,
    pub action: RuleAction,
    pub ttl: u32,
}

impl ConfigRule {
    pub fn matches(&self, domain: &str, kind: RecordKind) -> bool {
        self.kind == kind && self.pattern.matches(domain)
    }
}

impl RuleEntry {
    pub fn validate(&self) -> Result<ConfigRule, ConfigError> {
        let domain = self.domain.trim();
        if domain.is_empty() {
            return Err(ConfigError::Validation(
                "Record rule is missing 'domain'".to_string(),
            ));
        }

        let kind: RecordKind = self.record_type.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "Unsupported record type '{}' for {}",
                self.record_type, domain
            ))
        })?;

        let ttl = match self.ttl {
            Some(ttl) if ttl > 0 => ttl,
            _ => DEFAULT_RULE_TTL,
        };

        let action = match self
            .action
            .as_deref()
            .map(|a| a.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("resolve") => RuleAction::Resolve(self.answers(kind, domain)?),
            Some("forward") => RuleAction::Forward,
            Some(other) => {
                return Err(ConfigError::Validation(format!(
                    "Invalid action '{}' for record {}, must be 'resolve' or 'forward'",
                    other, domain
                )))
            }
        };

        Ok(ConfigRule {
            pattern: DomainPattern::parse(domain),
            kind,
            action,
            ttl,
        })
    }

    fn answers(&self, kind: RecordKind, domain: &str) -> Result<AnswerSet, ConfigError> {
        let value = self.value.as_deref().map(str::trim).filter(|v| !v.is_empty());
        let target = self.target.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let mut answers = AnswerSet::new();

        match kind {
            RecordKind::A | RecordKind::AAAA => {
                if value.is_none() && self.values.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "{} record for {} with action 'resolve' must have 'value' or 'values' field",
                        kind, domain
                    )));
                }
                for raw in value.into_iter().chain(self.values.iter().map(|v| v.trim())) {
                    if kind == RecordKind::A {
                        let addr = raw.parse::<Ipv4Addr>().map_err(|_| invalid_ip(raw, domain))?;
                        answers.a.push(addr);
                    } else {
                        let addr = raw.parse::<Ipv6Addr>().map_err(|_| invalid_ip(raw, domain))?;
                        answers.aaaa.push(addr);
                    }
                }
            }
            RecordKind::MX => {
                let target = target.ok_or_else(|| missing("MX", domain, "target"))?;
                let priority = match self.priority {
                    Some(p) if p > 0 => p,
                    _ => DEFAULT_MX_PRIORITY,
                };
                answers = answers.with_mx(priority, target);
            }
            RecordKind::SRV => {
                let target = target.ok_or_else(|| missing("SRV", domain, "target"))?;
                let port = self
                    .port
                    .filter(|p| *p > 0)
                    .ok_or_else(|| missing("SRV", domain, "port"))?;
                answers = answers.with_srv(SrvEntry {
                    priority: self.priority.unwrap_or(0),
                    weight: self.weight.unwrap_or(0),
                    port,
                    target: target.to_string(),
                });
            }
            RecordKind::TXT | RecordKind::CNAME | RecordKind::NS | RecordKind::PTR => {
                let value = value.ok_or_else(|| missing(kind.as_str(), domain, "value"))?;
                answers = match kind {
                    RecordKind::TXT => answers.with_txt(value),
                    RecordKind::CNAME => answers.with_cname(value),
                    RecordKind::NS => answers.with_ns(value),
                    _ => answers.with_ptr(value),
                };
            }
        }

        Ok(answers)
    }
}

fn missing(kind: &str, domain: &str, field: &str) -> ConfigError {
    ConfigError::Validation(format!(
        "{} record for {} with action 'resolve' must have '{}' field",
        kind, domain, field
    ))
}

fn invalid_ip(raw: &str, domain: &str) -> ConfigError {
    ConfigError::Validation(format!("Invalid IP address '{}' for {}", raw, domain))
}
