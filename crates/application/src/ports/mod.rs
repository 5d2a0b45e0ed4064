mod key_value_store;
mod resolution_observer;
mod upstream_exchange;

pub use key_value_store::KeyValueStore;
pub use resolution_observer::ResolutionObserver;
pub use upstream_exchange::{UpstreamExchange, UpstreamResponse};
