use std::sync::Arc;
use std::time::Duration;
use tinydns_application::ports::{KeyValueStore, ResolutionObserver};
use tinydns_application::services::{
    AnswerCache, FallbackSynthesizer, RecordStore, RuleMatcher, UpstreamResolver,
    UpstreamSettings,
};
use tinydns_application::use_cases::ResolveQueryUseCase;
use tinydns_domain::config::CacheBackend;
use tinydns_domain::Config;
use tinydns_infrastructure::dns::{
    DnsServerHandler, ObserverChain, QueryEventEmitter, QueryLogWriter, TracingObserver,
    WireExchange,
};
use tinydns_infrastructure::storage::{HybridStore, MemoryStore};
use tokio::task::JoinHandle;
use tracing::{info, warn};

const QUERY_LOG_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

pub struct DnsServices {
    pub handler: DnsServerHandler,
    cache: Option<AnswerCache>,
    query_log: Option<JoinHandle<()>>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        info!("Initializing DNS services");

        let rules = RuleMatcher::new(config.rules()?);
        let records = RecordStore::new(config.host_records());
        info!(
            rules = rules.len(),
            hosts = records.len(),
            "Local records loaded"
        );

        let servers = config
            .upstream
            .endpoints(config.server.net.upstream_net())?;
        for server in &servers {
            info!(upstream = %server, "Upstream server configured");
        }
        let settings = UpstreamSettings::new(
            servers,
            config.upstream.timeout()?,
            config.upstream.retries,
        );

        let fallback = FallbackSynthesizer::new(
            config.upstream.fallback_response,
            config.upstream.default_a_addr()?,
            config.upstream.default_aaaa_addr()?,
        );

        let upstream = UpstreamResolver::new(Arc::new(WireExchange::new()));
        let mut use_case =
            ResolveQueryUseCase::new(rules, records, upstream, settings, fallback);

        let cache = Self::build_cache(config).await?;
        if let Some(cache) = &cache {
            use_case = use_case.with_cache(cache.clone());
        }

        let (observer, query_log) = Self::setup_observers(config).await;
        use_case = use_case.with_observer(observer);

        Ok(Self {
            handler: DnsServerHandler::new(Arc::new(use_case)),
            cache,
            query_log,
        })
    }

    async fn build_cache(config: &Config) -> anyhow::Result<Option<AnswerCache>> {
        if !config.cache.enabled {
            info!("Answer cache disabled");
            return Ok(None);
        }

        let store: Arc<dyn KeyValueStore> = match config.cache.backend {
            CacheBackend::Memory => {
                info!("Answer cache enabled (memory)");
                Arc::new(MemoryStore::new())
            }
            CacheBackend::Hybrid => match &config.cache.path {
                Some(path) => Arc::new(HybridStore::open(path).await?),
                None => Arc::new(HybridStore::temporary().await?),
            },
        };

        Ok(Some(AnswerCache::new(store)))
    }

    async fn setup_observers(
        config: &Config,
    ) -> (Arc<dyn ResolutionObserver>, Option<JoinHandle<()>>) {
        let mut observers: Vec<Arc<dyn ResolutionObserver>> = vec![Arc::new(TracingObserver)];
        let mut query_log = None;

        if config.logging.query_log {
            match QueryLogWriter::create(&config.logging.query_log_dir).await {
                Ok(writer) => {
                    info!(path = %writer.path().display(), "Query log enabled");
                    let (emitter, rx) = QueryEventEmitter::new_enabled();
                    query_log = Some(writer.start(rx));
                    observers.push(Arc::new(emitter));
                }
                Err(e) => warn!(error = %e, "Query log disabled"),
            }
        }

        (Arc::new(ObserverChain::new(observers)), query_log)
    }

    /// Closes the cache store and waits for pending query-log lines.
    pub async fn shutdown(self) {
        let Self {
            handler,
            cache,
            query_log,
        } = self;
        drop(handler);

        if let Some(cache) = cache {
            cache.close().await;
        }

        if let Some(handle) = query_log {
            if tokio::time::timeout(QUERY_LOG_DRAIN_TIMEOUT, handle)
                .await
                .is_err()
            {
                warn!("Query log did not drain before shutdown");
            }
        }
    }
}
