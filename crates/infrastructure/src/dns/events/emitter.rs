use tinydns_application::ports::ResolutionObserver;
use tinydns_domain::ResolutionEvent;
use tokio::sync::mpsc;

/// Hands resolution events to a background consumer without blocking the
/// query path. The disabled variant drops every event.
#[derive(Clone)]
pub struct QueryEventEmitter {
    sender: Option<mpsc::UnboundedSender<ResolutionEvent>>,
}

impl QueryEventEmitter {
    pub fn new_disabled() -> Self {
        Self { sender: None }
    }

    pub fn new_enabled() -> (Self, mpsc::UnboundedReceiver<ResolutionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let emitter = Self { sender: Some(tx) };
        (emitter, rx)
    }

    pub fn emit(&self, event: ResolutionEvent) {
        if let Some(ref tx) = self.sender {
            let _ = tx.send(event);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }
}

impl ResolutionObserver for QueryEventEmitter {
    fn on_resolution(&self, event: &ResolutionEvent) {
        if self.is_enabled() {
            self.emit(event.clone());
        }
    }
}

impl Default for QueryEventEmitter {
    fn default() -> Self {
        Self::new_disabled()
    }
}

impl std::fmt::Debug for QueryEventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEventEmitter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
