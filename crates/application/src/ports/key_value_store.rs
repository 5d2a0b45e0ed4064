use async_trait::async_trait;
use tinydns_domain::DomainError;

/// Durable byte-keyed store backing the answer cache.
///
/// Implementations must tolerate concurrent `get`/`set` from independent
/// tasks. There is no delete and no expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError>;

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError>;

    async fn close(&self);
}
