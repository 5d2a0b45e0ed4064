mod answer_cache;
mod fallback;
mod record_store;
mod rule_matcher;
mod upstream_resolver;

pub use answer_cache::AnswerCache;
pub use fallback::FallbackSynthesizer;
pub use record_store::{RecordMatch, RecordStore, WILDCARD_KEY};
pub use rule_matcher::RuleMatcher;
pub use upstream_resolver::{
    UpstreamAnswer, UpstreamResolver, UpstreamSettings, RETRY_BACKOFF,
};
