use std::collections::{HashMap, HashSet};

use common::types::ChunkRecord;
use sha2::{Digest, Sha256};

/// Orders `records` into a single chain of exactly `expected_count` links.
///
/// `records` is assumed to belong to one file. Returns `None` when there is
/// no start record, more than one start record, a link with zero or several
/// candidates, a record whose `chunk_count` disagrees with `expected_count`,
/// a walk that revisits a record, or payloads that do not hash back to the
/// records' `file_hash`.
pub fn walk_chain(records: &[ChunkRecord], expected_count: u64) -> Option<Vec<&ChunkRecord>> {
    let refs: Vec<&ChunkRecord> = records.iter().collect();
    let order = walk_order(&refs, expected_count)?;
    Some(order.into_iter().map(|i| refs[i]).collect())
}

/// True iff `pool` holds exactly `expected_count` records for `file_hash`
/// and they form one complete, unambiguous chain whose payloads hash back to
/// `file_hash`. Records of other files in the pool are ignored. Never panics
/// on malformed input.
pub fn verify_chain(pool: &[ChunkRecord], file_hash: &str, expected_count: u64) -> bool {
    ordered_chain(pool, file_hash, expected_count).is_some()
}

/// The records of `file_hash` in chain order, if they verify.
pub fn ordered_chain<'a>(pool: &'a [ChunkRecord], file_hash: &str, expected_count: u64) -> Option<Vec<&'a ChunkRecord>> {
    let matching: Vec<&ChunkRecord> = pool.iter().filter(|r| r.file_hash == file_hash).collect();
    if matching.len() as u64 != expected_count {
        return None;
    }

    let order = walk_order(&matching, expected_count)?;
    Some(order.into_iter().map(|i| matching[i]).collect())
}

/// Original file bytes, rebuilt from a pool in chain order.
pub fn reassemble(pool: &[ChunkRecord], file_hash: &str, expected_count: u64) -> Option<Vec<u8>> {
    let chain = ordered_chain(pool, file_hash, expected_count)?;
    let mut data = Vec::with_capacity(chain.iter().map(|r| r.payload.len()).sum());
    for record in chain {
        data.extend_from_slice(&record.payload);
    }
    Some(data)
}

fn walk_order(records: &[&ChunkRecord], expected_count: u64) -> Option<Vec<usize>> {
    let expected = usize::try_from(expected_count).ok()?;
    // a walk cannot visit more distinct records than the pool holds
    if expected > records.len() {
        return None;
    }

    let mut starts = records.iter().enumerate().filter(|(_, r)| r.is_first()).map(|(i, _)| i);
    let start = match (starts.next(), starts.next()) {
        (Some(start), None) => start,
        _ => return None,
    };
    if records[start].chunk_count != expected_count {
        return None;
    }

    let mut by_prev: HashMap<&str, Vec<usize>> = HashMap::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        by_prev.entry(record.prev_hash.as_str()).or_default().push(i);
    }

    let mut visited = HashSet::with_capacity(expected);
    visited.insert(start);
    let mut order = Vec::with_capacity(expected);
    order.push(start);

    let mut current = start;
    for _ in 1..expected {
        let link = records[current].hash();
        let next = match by_prev.get(link.as_str()).map(Vec::as_slice) {
            Some([only]) => *only,
            // missing link or fork
            _ => return None,
        };
        if records[next].chunk_count != expected_count || !visited.insert(next) {
            return None;
        }
        order.push(next);
        current = next;
    }

    if visited.len() != expected || !payloads_match(records, &order) {
        return None;
    }
    Some(order)
}

/// The chain links cannot expose a changed payload in the last record, so
/// the concatenated payloads are checked against the whole-file hash.
fn payloads_match(records: &[&ChunkRecord], order: &[usize]) -> bool {
    let mut hasher = Sha256::new();
    for &i in order {
        hasher.update(&records[i].payload);
    }
    hex::encode(hasher.finalize()) == records[order[0]].file_hash
}
