pub mod hybrid;
pub mod memory;

pub use hybrid::HybridStore;
pub use memory::MemoryStore;
