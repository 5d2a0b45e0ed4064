//! tinydns domain layer
pub mod answer;
pub mod config;
pub mod dns_request;
pub mod domain_pattern;
pub mod errors;
pub mod record_kind;
pub mod resolution_event;
pub mod upstream_endpoint;

pub use answer::{AnswerRecord, AnswerSet, MxEntry, SrvEntry};
pub use config::{
    CliOverrides, Config, ConfigError, ConfigRule, ListenNet, RuleAction, RuleEntry,
};
pub use dns_request::{normalize_domain, DnsRequest};
pub use domain_pattern::DomainPattern;
pub use errors::DomainError;
pub use record_kind::{QueryType, RecordKind};
pub use resolution_event::{ResolutionEvent, ResolutionSource, UpstreamAttempt};
pub use upstream_endpoint::{UpstreamAddr, UpstreamEndpoint, UpstreamNet, DEFAULT_DNS_PORT};
