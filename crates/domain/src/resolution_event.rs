use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// The tier that produced the final answer for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    Config,
    Memory,
    Wildcard,
    Cache,
    Upstream,
    Fallback,
    Empty,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Config => "config",
            ResolutionSource::Memory => "memory",
            ResolutionSource::Wildcard => "wildcard",
            ResolutionSource::Cache => "cache",
            ResolutionSource::Upstream => "upstream",
            ResolutionSource::Fallback => "fallback",
            ResolutionSource::Empty => "empty",
        }
    }

    /// Everything except a forwarded upstream reply is answered authoritatively.
    pub fn is_local(&self) -> bool {
        !matches!(self, ResolutionSource::Upstream)
    }
}

/// One forwarding attempt made while resolving a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamAttempt {
    pub server: String,
    pub attempt: u32,
    pub attempts: u32,
    pub elapsed: Duration,
    /// `None` when the server replied.
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolutionEvent {
    pub domain: Arc<str>,
    pub operation: ResolutionSource,
    pub record_type: String,
    pub client_ip: IpAddr,
    pub timestamp: DateTime<Utc>,
    pub response_time: Duration,
    pub upstream_server: Option<String>,
    pub answer_count: usize,
    pub upstream_attempts: Vec<UpstreamAttempt>,
    /// The upstream answer was written to the cache.
    pub cached: bool,
}
