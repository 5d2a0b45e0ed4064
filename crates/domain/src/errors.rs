use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("No upstream servers configured")]
    NoUpstreamServers,

    #[error("Upstream exhausted after {attempts} attempt(s): {last}")]
    UpstreamExhausted { attempts: u32, last: Box<DomainError> },

    #[error("Cache store error: {0}")]
    CacheStore(String),

    #[error("Cache serialization error: {0}")]
    CacheSerialization(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
