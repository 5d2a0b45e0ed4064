use crate::ports::{ResolutionObserver, UpstreamResponse};
use crate::services::{
    AnswerCache, FallbackSynthesizer, RecordStore, RuleMatcher, UpstreamResolver,
    UpstreamSettings,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tinydns_domain::{
    AnswerRecord, DnsRequest, RecordKind, ResolutionEvent, ResolutionSource, RuleAction,
    UpstreamAttempt,
};
use tracing::{debug, warn};

/// TTL for answers served from the record store or the cache.
pub const LOCAL_ANSWER_TTL: u32 = 60;
pub const FALLBACK_TTL: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAnswer {
    pub records: Vec<AnswerRecord>,
    pub ttl: u32,
}

#[derive(Debug, Clone)]
pub enum ResolutionOutcome {
    /// Built here and sent with the authoritative bit set.
    Local(LocalAnswer),
    /// Relayed verbatim, authority bit included.
    Upstream(UpstreamResponse),
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub outcome: ResolutionOutcome,
    pub source: ResolutionSource,
    pub upstream_server: Option<String>,
    /// Forwarding attempts made for this query, in order.
    pub attempts: Vec<UpstreamAttempt>,
    pub cached: bool,
}

impl Resolution {
    fn local(records: Vec<AnswerRecord>, ttl: u32, source: ResolutionSource) -> Self {
        Self {
            outcome: ResolutionOutcome::Local(LocalAnswer { records, ttl }),
            source,
            upstream_server: None,
            attempts: Vec::new(),
            cached: false,
        }
    }

    pub fn authoritative(&self) -> bool {
        match &self.outcome {
            ResolutionOutcome::Local(_) => true,
            ResolutionOutcome::Upstream(response) => response.authoritative,
        }
    }

    pub fn answer_count(&self) -> usize {
        match &self.outcome {
            ResolutionOutcome::Local(answer) => answer.records.len(),
            ResolutionOutcome::Upstream(response) => response.answers.len(),
        }
    }

    pub fn local_answer(&self) -> Option<&LocalAnswer> {
        match &self.outcome {
            ResolutionOutcome::Local(answer) => Some(answer),
            ResolutionOutcome::Upstream(_) => None,
        }
    }
}

/// The fixed-precedence pipeline: config rule, record store (exact then
/// wildcard), cache, upstream, fallback. The first tier that answers wins.
pub struct ResolveQueryUseCase {
    rules: RuleMatcher,
    records: RecordStore,
    upstream: UpstreamResolver,
    settings: UpstreamSettings,
    fallback: FallbackSynthesizer,
    cache: Option<AnswerCache>,
    observer: Option<Arc<dyn ResolutionObserver>>,
}

impl ResolveQueryUseCase {
    pub fn new(
        rules: RuleMatcher,
        records: RecordStore,
        upstream: UpstreamResolver,
        settings: UpstreamSettings,
        fallback: FallbackSynthesizer,
    ) -> Self {
        Self {
            rules,
            records,
            upstream,
            settings,
            fallback,
            cache: None,
            observer: None,
        }
    }

    pub fn with_cache(mut self, cache: AnswerCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// `query` is the client's message as received; it is what gets
    /// forwarded upstream.
    pub async fn execute(&self, request: &DnsRequest, query: &[u8]) -> Resolution {
        let start = Instant::now();
        let resolution = self.resolve(request, query).await;

        debug!(
            domain = %request.domain,
            record_type = %request.query_type,
            source = resolution.source.as_str(),
            answers = resolution.answer_count(),
            "Query resolved"
        );

        if let Some(observer) = &self.observer {
            observer.on_resolution(&ResolutionEvent {
                domain: Arc::clone(&request.domain),
                operation: resolution.source,
                record_type: request.query_type.name(),
                client_ip: request.client_ip,
                timestamp: Utc::now(),
                response_time: start.elapsed(),
                upstream_server: resolution.upstream_server.clone(),
                answer_count: resolution.answer_count(),
                upstream_attempts: resolution.attempts.clone(),
                cached: resolution.cached,
            });
        }

        resolution
    }

    async fn resolve(&self, request: &DnsRequest, query: &[u8]) -> Resolution {
        let Some(kind) = request.query_type.kind() else {
            return self.forward(request, None, query).await;
        };
        let name = request.lookup_name();

        if let Some(rule) = self.rules.find(&name, kind) {
            match &rule.action {
                RuleAction::Resolve(answers) => {
                    return Resolution::local(
                        answers.records_for(kind),
                        rule.ttl,
                        ResolutionSource::Config,
                    );
                }
                RuleAction::Forward => {
                    debug!(domain = %name, rule = %rule.pattern, "Forward rule matched");
                    return self.forward(request, Some(kind), query).await;
                }
            }
        }

        if let Some((answers, matched)) = self.records.lookup(&name) {
            return Resolution::local(
                answers.records_for(kind),
                LOCAL_ANSWER_TTL,
                matched.source(),
            );
        }

        if let Some(cache) = &self.cache {
            if let Some(answers) = cache.get(&request.domain, kind).await {
                return Resolution::local(
                    answers.records_for(kind),
                    LOCAL_ANSWER_TTL,
                    ResolutionSource::Cache,
                );
            }
        }

        self.forward(request, Some(kind), query).await
    }

    async fn forward(
        &self,
        request: &DnsRequest,
        kind: Option<RecordKind>,
        query: &[u8],
    ) -> Resolution {
        let mut attempts = Vec::new();
        match self
            .upstream
            .resolve_traced(query, &self.settings, &mut attempts)
            .await
        {
            Ok(answer) => {
                let cached = match (kind, &self.cache) {
                    (Some(kind), Some(cache)) => {
                        self.store(cache, request, kind, &answer.response).await
                    }
                    _ => false,
                };
                Resolution {
                    upstream_server: Some(answer.server.to_string()),
                    outcome: ResolutionOutcome::Upstream(answer.response),
                    source: ResolutionSource::Upstream,
                    attempts,
                    cached,
                }
            }
            Err(e) => {
                warn!(domain = %request.domain, error = %e, "All upstream attempts failed");
                Resolution {
                    attempts,
                    ..self.fall_back(kind)
                }
            }
        }
    }

    async fn store(
        &self,
        cache: &AnswerCache,
        request: &DnsRequest,
        kind: RecordKind,
        response: &UpstreamResponse,
    ) -> bool {
        // Negative and empty replies are not cached.
        if response.answers.is_empty() {
            return false;
        }
        match cache.put(&request.domain, kind, &response.answer_set()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(domain = %request.domain, error = %e, "Failed to cache upstream answer");
                false
            }
        }
    }

    fn fall_back(&self, kind: Option<RecordKind>) -> Resolution {
        let answers = self.fallback.synthesize(kind);
        match kind {
            Some(kind) if !answers.is_empty() => Resolution::local(
                answers.records_for(kind),
                FALLBACK_TTL,
                ResolutionSource::Fallback,
            ),
            _ => Resolution::local(Vec::new(), FALLBACK_TTL, ResolutionSource::Empty),
        }
    }
}
