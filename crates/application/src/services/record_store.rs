use rustc_hash::FxHashMap;
use std::sync::Arc;
use tinydns_domain::{normalize_domain, AnswerSet, ResolutionSource};

pub const WILDCARD_KEY: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMatch {
    Exact,
    Wildcard,
}

impl RecordMatch {
    pub fn source(&self) -> ResolutionSource {
        match self {
            RecordMatch::Exact => ResolutionSource::Memory,
            RecordMatch::Wildcard => ResolutionSource::Wildcard,
        }
    }
}

/// Static domain → answer-set records, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Arc<FxHashMap<String, AnswerSet>>,
}

impl RecordStore {
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, AnswerSet)>,
    {
        let records = records
            .into_iter()
            .map(|(domain, answers)| (normalize_domain(&domain), answers))
            .collect();
        Self {
            records: Arc::new(records),
        }
    }

    /// Exact key first, then the `*` entry.
    pub fn lookup(&self, domain: &str) -> Option<(&AnswerSet, RecordMatch)> {
        if let Some(answers) = self.records.get(domain) {
            return Some((answers, RecordMatch::Exact));
        }
        self.records
            .get(WILDCARD_KEY)
            .map(|answers| (answers, RecordMatch::Wildcard))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
