use std::net::{Ipv4Addr, Ipv6Addr};
use tinydns_domain::{AnswerSet, RecordKind};

/// Synthetic answers served once every other tier has failed. Answers from
/// here are sent with TTL 0 and never cached.
#[derive(Debug, Clone, Default)]
pub struct FallbackSynthesizer {
    enabled: bool,
    default_a: Option<Ipv4Addr>,
    default_aaaa: Option<Ipv6Addr>,
}

impl FallbackSynthesizer {
    pub fn new(enabled: bool, default_a: Option<Ipv4Addr>, default_aaaa: Option<Ipv6Addr>) -> Self {
        Self {
            enabled,
            default_a,
            default_aaaa,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// An empty set means "answer with zero records".
    pub fn synthesize(&self, kind: Option<RecordKind>) -> AnswerSet {
        if !self.enabled {
            return AnswerSet::default();
        }
        match (kind, self.default_a, self.default_aaaa) {
            (Some(RecordKind::A), Some(addr), _) => AnswerSet::new().with_a(addr),
            (Some(RecordKind::AAAA), _, Some(addr)) => AnswerSet::new().with_aaaa(addr),
            _ => AnswerSet::default(),
        }
    }
}
