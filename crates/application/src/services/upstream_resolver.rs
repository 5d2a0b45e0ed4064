use std::sync::Arc;
use std::time::{Duration, Instant};
use tinydns_domain::{DomainError, UpstreamAttempt, UpstreamEndpoint};
use tracing::{debug, warn};

use crate::ports::{UpstreamExchange, UpstreamResponse};

pub const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Server list and retry policy for upstream forwarding.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub servers: Arc<Vec<UpstreamEndpoint>>,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl UpstreamSettings {
    pub fn new(servers: Vec<UpstreamEndpoint>, timeout: Duration, max_retries: u32) -> Self {
        Self {
            servers: Arc::new(servers),
            timeout,
            max_retries,
        }
    }

    /// Attempts actually made; zero is treated as one.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamAnswer {
    pub response: UpstreamResponse,
    pub server: UpstreamEndpoint,
    pub attempt: u32,
}

/// Forwards to a randomly chosen server with a fixed pause between attempts.
pub struct UpstreamResolver {
    exchange: Arc<dyn UpstreamExchange>,
    backoff: Duration,
}

impl UpstreamResolver {
    pub fn new(exchange: Arc<dyn UpstreamExchange>) -> Self {
        Self {
            exchange,
            backoff: RETRY_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub async fn resolve(
        &self,
        query: &[u8],
        settings: &UpstreamSettings,
    ) -> Result<UpstreamAnswer, DomainError> {
        self.resolve_traced(query, settings, &mut Vec::new()).await
    }

    /// Like `resolve`, also appending one entry per attempt to `trace`.
    pub async fn resolve_traced(
        &self,
        query: &[u8],
        settings: &UpstreamSettings,
        trace: &mut Vec<UpstreamAttempt>,
    ) -> Result<UpstreamAnswer, DomainError> {
        if settings.servers.is_empty() {
            return Err(DomainError::NoUpstreamServers);
        }

        let attempts = settings.attempts();
        let mut last_error = DomainError::NoUpstreamServers;

        for attempt in 1..=attempts {
            let server = &settings.servers[fastrand::usize(..settings.servers.len())];
            debug!(server = %server, attempt, attempts, "Forwarding query upstream");

            let start = Instant::now();
            let result = self
                .exchange
                .exchange(query, server, settings.timeout)
                .await;
            trace.push(UpstreamAttempt {
                server: server.to_string(),
                attempt,
                attempts,
                elapsed: start.elapsed(),
                error: result.as_ref().err().map(|e| e.to_string()),
            });

            match result {
                Ok(response) => {
                    return Ok(UpstreamAnswer {
                        response,
                        server: server.clone(),
                        attempt,
                    })
                }
                Err(e) => {
                    warn!(
                        server = %server,
                        attempt,
                        attempts,
                        error = %e,
                        "Upstream query failed"
                    );
                    last_error = e;
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.backoff).await;
            }
        }

        Err(DomainError::UpstreamExhausted {
            attempts,
            last: Box::new(last_error),
        })
    }
}
