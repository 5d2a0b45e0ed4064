pub mod events;
pub mod exchange;
pub mod forwarding;
pub mod query_logger;
pub mod server;
pub mod transport;

pub use events::{ObserverChain, QueryEventEmitter, TracingObserver};
pub use exchange::WireExchange;
pub use query_logger::QueryLogWriter;
pub use server::DnsServerHandler;
