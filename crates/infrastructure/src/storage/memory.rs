use async_trait::async_trait;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use tinydns_application::ports::KeyValueStore;
use tinydns_domain::DomainError;

/// Process-local store; everything is lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Vec<u8>, FxBuildHasher>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn close(&self) {
        self.entries.clear();
    }
}
