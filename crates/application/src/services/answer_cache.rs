use std::sync::Arc;
use tinydns_domain::{normalize_domain, AnswerSet, DomainError, RecordKind};
use tracing::{debug, warn};

use crate::ports::KeyValueStore;

/// Answer sets persisted per (domain, type). Entries never expire.
#[derive(Clone)]
pub struct AnswerCache {
    store: Arc<dyn KeyValueStore>,
}

impl AnswerCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Fully-qualified name immediately followed by the type mnemonic,
    /// e.g. `example.com.A`.
    pub fn key(domain: &str, kind: RecordKind) -> String {
        format!("{}.{}", normalize_domain(domain), kind.as_str())
    }

    /// Store and decode failures both read as a miss.
    pub async fn get(&self, domain: &str, kind: RecordKind) -> Option<AnswerSet> {
        let key = Self::key(domain, kind);
        let bytes = match self.store.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, key = %key, "Cache read failed");
                return None;
            }
        };

        match serde_json::from_slice::<AnswerSet>(&bytes) {
            Ok(answers) => Some(answers),
            Err(e) => {
                debug!(error = %e, key = %key, "Discarding undecodable cache entry");
                None
            }
        }
    }

    pub async fn put(
        &self,
        domain: &str,
        kind: RecordKind,
        answers: &AnswerSet,
    ) -> Result<(), DomainError> {
        let key = Self::key(domain, kind);
        let bytes = serde_json::to_vec(answers)
            .map_err(|e| DomainError::CacheSerialization(e.to_string()))?;
        self.store.set(&key, bytes).await
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}
