use anyhow::Result;
use chain::{verify_chain, walk_chain};
use common::log::{info, warn};

use crate::storage::ChunkStorage;

/// Whether a complete, untampered chain of `expected_count` chunks for
/// `file_hash` is stored. Only that file's bucket is read.
pub async fn check_file<T: ChunkStorage>(storage: &T, file_hash: &str, expected_count: u64) -> Result<bool> {
    let Some(bucket) = storage.bucket(file_hash.to_string()).await? else {
        info!("🔍 File {} is not stored", file_hash);
        return Ok(false);
    };

    let valid = verify_chain(&bucket, file_hash, expected_count);
    info!("🔍 File {} with {} chunks: valid = {}", file_hash, expected_count, valid);
    Ok(valid)
}

/// Walks every stored file from its first chunk and requires each chain to
/// resolve completely. An empty store is trivially intact.
pub async fn sweep_all_chains<T: ChunkStorage>(storage: &T) -> Result<bool> {
    let buckets = storage.buckets().await?;
    info!("🕵️ Sweeping {} stored files", buckets.len());

    let mut intact = true;
    for (file_hash, bucket) in &buckets {
        if walk_chain(bucket, bucket.len() as u64).is_none() {
            warn!("👺 Chain of file {} is broken", file_hash);
            intact = false;
        }
    }

    Ok(intact)
}
