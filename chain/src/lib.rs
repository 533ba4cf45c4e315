mod chunker;
mod hash;
mod verifier;

pub use crate::chunker::{chunk_count_for_size, generate_chain, generate_chain_from_bytes, generate_chain_from_path, Chunker};
pub use crate::hash::{file_digest, file_hash, file_hash_of_path, READ_BLOCK_SIZE};
pub use crate::verifier::{ordered_chain, reassemble, verify_chain, walk_chain};
pub use common::types::ChunkRecord;
