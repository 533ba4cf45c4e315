use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use common::log::{debug, info};
use common::types::{ChunkRecord, InsertOutcome};
use tokio::sync::RwLock;

use crate::storage::{Bucket, ChunkStorage};

/// Process-lifetime chunk store, grouped by file hash. Buckets are written
/// once and never change afterwards, so readers get them as shared snapshots.
#[derive(Default)]
pub struct MemoryStorage {
    buckets: RwLock<HashMap<String, Bucket>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn file_count(&self) -> usize {
        self.buckets.read().await.len()
    }

    pub async fn chunk_count(&self, file_hash: &str) -> usize {
        self.buckets.read().await.get(file_hash).map_or(0, |b| b.len())
    }
}

fn pool_file_hash(chunks: &[ChunkRecord]) -> Result<String> {
    let Some(first) = chunks.first() else {
        bail!("empty chunk pool");
    };
    if let Some(other) = chunks.iter().find(|c| c.file_hash != first.file_hash) {
        bail!("chunk pool mixes files {} and {}", first.file_hash, other.file_hash);
    }
    Ok(first.file_hash.clone())
}

#[async_trait]
impl ChunkStorage for MemoryStorage {
    async fn insert_if_new(&self, chunks: Vec<ChunkRecord>) -> Result<InsertOutcome> {
        let file_hash = pool_file_hash(&chunks)?;

        // presence check and append under one write lock
        let mut buckets = self.buckets.write().await;
        if buckets.contains_key(&file_hash) {
            debug!("File {} already stored, skipping {} chunks", file_hash, chunks.len());
            return Ok(InsertOutcome::already_present());
        }

        info!("Storing {} chunks for file {}", chunks.len(), file_hash);
        buckets.insert(file_hash, Arc::new(chunks));
        Ok(InsertOutcome::stored())
    }

    async fn bucket(&self, file_hash: String) -> Result<Option<Bucket>> {
        Ok(self.buckets.read().await.get(&file_hash).cloned())
    }

    async fn buckets(&self) -> Result<Vec<(String, Bucket)>> {
        let buckets = self.buckets.read().await;
        let mut all: Vec<(String, Bucket)> = buckets.iter().map(|(hash, bucket)| (hash.clone(), bucket.clone())).collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(all)
    }
}
