//! tinydns application layer: ports and the resolution pipeline.
pub mod ports;
pub mod services;
pub mod use_cases;
