pub mod cache;
pub mod errors;
pub mod logging;
pub mod root;
pub mod rules;
pub mod server;
pub mod upstream;

pub use cache::{CacheBackend, CacheConfig};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use rules::{ConfigRule, RuleAction, RuleEntry, DEFAULT_MX_PRIORITY, DEFAULT_RULE_TTL};
pub use server::{ListenNet, ServerConfig};
pub use upstream::{all_public_dns_servers, parse_duration, public_dns_servers, UpstreamConfig};
