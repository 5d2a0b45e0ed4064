use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tinydns_domain::{AnswerRecord, AnswerSet, DomainError, UpstreamEndpoint};

/// A decoded upstream reply together with its original wire bytes.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub answers: Vec<AnswerRecord>,
    pub authoritative: bool,
    pub response_code: u16,
    /// Returned to the client verbatim.
    pub wire: Bytes,
}

impl UpstreamResponse {
    pub fn answer_set(&self) -> AnswerSet {
        AnswerSet::from_records(&self.answers)
    }
}

#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    /// Sends `query` (a complete DNS message) to `endpoint` and waits at most
    /// `timeout` for the reply.
    async fn exchange(
        &self,
        query: &[u8],
        endpoint: &UpstreamEndpoint,
        timeout: Duration,
    ) -> Result<UpstreamResponse, DomainError>;
}
