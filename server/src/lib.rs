pub mod config;
pub mod storage;
pub mod memory_storage;
pub mod integrity;
pub mod http;

pub use storage::ChunkStorage;
pub use memory_storage::MemoryStorage;
pub use http::{bind_server, start_server};
