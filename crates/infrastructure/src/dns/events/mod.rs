pub mod emitter;
pub mod tracing_observer;

pub use emitter::QueryEventEmitter;
pub use tracing_observer::TracingObserver;

use std::sync::Arc;
use tinydns_application::ports::ResolutionObserver;
use tinydns_domain::ResolutionEvent;

/// Forwards each event to every inner observer in order.
pub struct ObserverChain {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl ObserverChain {
    pub fn new(observers: Vec<Arc<dyn ResolutionObserver>>) -> Self {
        Self { observers }
    }
}

impl ResolutionObserver for ObserverChain {
    fn on_resolution(&self, event: &ResolutionEvent) {
        for observer in &self.observers {
            observer.on_resolution(event);
        }
    }
}
