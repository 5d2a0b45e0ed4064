use tinydns_application::ports::ResolutionObserver;
use tinydns_domain::ResolutionEvent;
use tracing::info;

/// Emits one `info!` event per resolved query.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
    fn on_resolution(&self, event: &ResolutionEvent) {
        info!(
            domain = %event.domain,
            record_type = %event.record_type,
            client = %event.client_ip,
            source = event.operation.as_str(),
            upstream = event.upstream_server.as_deref().unwrap_or("-"),
            answers = event.answer_count,
            response_time_us = event.response_time.as_micros() as u64,
            "Query answered"
        );
    }
}
