use tinydns_domain::ResolutionEvent;

/// Side-effect-only hook called once per resolved query.
///
/// Must not block: implementations hand the event off and return.
pub trait ResolutionObserver: Send + Sync {
    fn on_resolution(&self, event: &ResolutionEvent);
}
