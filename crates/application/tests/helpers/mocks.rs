#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tinydns_application::ports::{
    KeyValueStore, ResolutionObserver, UpstreamExchange, UpstreamResponse,
};
use tinydns_domain::{AnswerRecord, DomainError, ResolutionEvent, UpstreamEndpoint};

pub fn upstream_response(answers: Vec<AnswerRecord>) -> UpstreamResponse {
    UpstreamResponse {
        answers,
        authoritative: false,
        response_code: 0,
        wire: Bytes::from_static(b"upstream-wire"),
    }
}

pub fn timeout_error() -> DomainError {
    DomainError::TransportTimeout {
        server: "udp://192.0.2.1:53".to_string(),
    }
}

// ── upstream exchange ────────────────────────────────────────────────────────

/// Replays scripted outcomes in order; fails with a timeout once they run out.
#[derive(Clone, Default)]
pub struct MockUpstreamExchange {
    outcomes: Arc<Mutex<VecDeque<Result<UpstreamResponse, DomainError>>>>,
    calls: Arc<AtomicUsize>,
    endpoints: Arc<Mutex<Vec<UpstreamEndpoint>>>,
}

impl MockUpstreamExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeeding(response: UpstreamResponse) -> Self {
        let mock = Self::new();
        mock.push(Ok(response));
        mock
    }

    pub fn failing() -> Self {
        Self::new()
    }

    pub fn push(&self, outcome: Result<UpstreamResponse, DomainError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn endpoints(&self) -> Vec<UpstreamEndpoint> {
        self.endpoints.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamExchange for MockUpstreamExchange {
    async fn exchange(
        &self,
        _query: &[u8],
        endpoint: &UpstreamEndpoint,
        _timeout: Duration,
    ) -> Result<UpstreamResponse, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.endpoints.lock().unwrap().push(endpoint.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(timeout_error()))
    }
}

// ── key-value store ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockKeyValueStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    gets: Arc<AtomicUsize>,
    sets: Arc<AtomicUsize>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_raw(&self, key: &str, value: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl KeyValueStore for MockKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if *self.fail_writes.lock().unwrap() {
            return Err(DomainError::CacheStore("disk full".to_string()));
        }
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn close(&self) {}
}

// ── observer ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ResolutionEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ResolutionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ResolutionObserver for RecordingObserver {
    fn on_resolution(&self, event: &ResolutionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
