use crate::dns::forwarding::ResponseParser;
use crate::dns::transport::{self, TransportResponse};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tinydns_application::ports::{UpstreamExchange, UpstreamResponse};
use tinydns_domain::{DomainError, UpstreamAddr, UpstreamEndpoint, UpstreamNet};
use tracing::debug;

/// Sends the client's query bytes unchanged to one upstream server.
///
/// A truncated UDP reply is retried once over TCP within whatever is left of
/// the timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireExchange;

impl WireExchange {
    pub fn new() -> Self {
        Self
    }

    async fn resolve_addr(
        addr: &UpstreamAddr,
        timeout: Duration,
    ) -> Result<SocketAddr, DomainError> {
        match addr {
            UpstreamAddr::Resolved(addr) => Ok(*addr),
            UpstreamAddr::Unresolved { hostname, port } => {
                let target = format!("{}:{}", hostname, port);
                let mut addrs =
                    tokio::time::timeout(timeout, tokio::net::lookup_host(target.as_str()))
                        .await
                        .map_err(|_| DomainError::TransportTimeout {
                            server: target.clone(),
                        })?
                        .map_err(|e| {
                            DomainError::InvalidDomainName(format!(
                                "DNS resolution failed for {}: {}",
                                target, e
                            ))
                        })?;

                addrs.next().ok_or_else(|| {
                    DomainError::InvalidDomainName(format!("No addresses found for {}", target))
                })
            }
        }
    }
}

#[async_trait]
impl UpstreamExchange for WireExchange {
    async fn exchange(
        &self,
        query: &[u8],
        endpoint: &UpstreamEndpoint,
        timeout: Duration,
    ) -> Result<UpstreamResponse, DomainError> {
        let start = Instant::now();
        let server_addr = Self::resolve_addr(&endpoint.addr, timeout).await?;

        let TransportResponse { bytes, .. } = transport::create_transport(endpoint.net, server_addr)
            .send(query, timeout)
            .await?;
        let mut wire = bytes;
        let mut parsed = ResponseParser::parse(&wire)?;

        if parsed.truncated && endpoint.net == UpstreamNet::Udp {
            debug!(
                server = %server_addr,
                "Response truncated (TC bit), retrying via TCP"
            );

            let remaining = remaining_budget(timeout, start.elapsed(), server_addr)?;

            wire = transport::create_transport(UpstreamNet::Tcp, server_addr)
                .send(query, remaining)
                .await?
                .bytes;
            parsed = ResponseParser::parse(&wire)?;
        }

        Ok(UpstreamResponse {
            response_code: parsed.response_code(),
            answers: parsed.answers,
            authoritative: parsed.authoritative,
            wire,
        })
    }
}

/// What is left of `timeout` after `elapsed`; an exhausted budget is a timeout.
fn remaining_budget(
    timeout: Duration,
    elapsed: Duration,
    server: SocketAddr,
) -> Result<Duration, DomainError> {
    let remaining = timeout.saturating_sub(elapsed);
    if remaining.is_zero() {
        return Err(DomainError::TransportTimeout {
            server: server.to_string(),
        });
    }
    Ok(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER: &str = "127.0.0.1:53";

    #[test]
    fn test_remaining_budget_is_what_is_left() {
        let remaining = remaining_budget(
            Duration::from_secs(2),
            Duration::from_millis(1500),
            SERVER.parse().unwrap(),
        )
        .unwrap();
        assert_eq!(remaining, Duration::from_millis(500));
    }

    #[test]
    fn test_exhausted_budget_is_a_timeout() {
        for elapsed in [Duration::from_secs(2), Duration::from_secs(3)] {
            let result =
                remaining_budget(Duration::from_secs(2), elapsed, SERVER.parse().unwrap());
            assert!(matches!(result, Err(DomainError::TransportTimeout { .. })));
        }
    }
}
