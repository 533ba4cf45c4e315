use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::GENESIS_PREV_HASH;

/// One piece of a file plus the metadata linking it into the file's chain.
///
/// The payload travels as a hex string on the wire so every byte survives
/// JSON transport unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub file_hash: String,
    pub chunk_count: u64,
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
    pub prev_hash: String,
}

impl ChunkRecord {
    pub fn new(file_hash: impl Into<String>, chunk_count: u64, payload: Vec<u8>, prev_hash: impl Into<String>) -> Self {
        Self {
            file_hash: file_hash.into(),
            chunk_count,
            payload,
            prev_hash: prev_hash.into(),
        }
    }

    /// SHA-256 over `file_hash`, `chunk_count` as decimal text, the raw
    /// payload and `prev_hash`, in that order. Changing the order or the
    /// encoding of any field is a breaking format change.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.file_hash.as_bytes());
        hasher.update(self.chunk_count.to_string().as_bytes());
        hasher.update(&self.payload);
        hasher.update(self.prev_hash.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn is_first(&self) -> bool {
        self.prev_hash == GENESIS_PREV_HASH
    }
}

/// Result of offering a chunk pool to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    pub stored: bool,
    pub already_present: bool,
}

impl InsertOutcome {
    pub fn stored() -> Self {
        Self { stored: true, already_present: false }
    }

    pub fn already_present() -> Self {
        Self { stored: false, already_present: true }
    }
}
