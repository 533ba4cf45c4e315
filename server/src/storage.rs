use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use common::types::{ChunkRecord, InsertOutcome};
use mockall::automock;

/// Immutable view of every record stored for one file.
pub type Bucket = Arc<Vec<ChunkRecord>>;

#[automock]
#[async_trait]
pub trait ChunkStorage {
    /// Stores `chunks` unless records for their file hash already exist.
    /// Errors mean the pool itself was rejected (empty, or mixing files).
    async fn insert_if_new(&self, chunks: Vec<ChunkRecord>) -> Result<InsertOutcome>;
    async fn bucket(&self, file_hash: String) -> Result<Option<Bucket>>;
    async fn buckets(&self) -> Result<Vec<(String, Bucket)>>;
}
