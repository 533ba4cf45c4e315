use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Files are hashed in blocks of this size so large inputs never sit in memory.
pub const READ_BLOCK_SIZE: usize = 2 * 1024 * 1024;

/// Hex SHA-256 of everything `reader` yields.
pub fn file_hash<R: Read>(reader: R) -> Result<String> {
    file_digest(reader).map(|(hash, _)| hash)
}

/// Hex SHA-256 and total length of everything `reader` yields.
pub fn file_digest<R: Read>(mut reader: R) -> Result<(String, u64)> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BLOCK_SIZE];
    let mut size = 0u64;
    loop {
        let n = reader.read(&mut buffer).context("read input while hashing")?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        size += n as u64;
    }
    Ok((hex::encode(hasher.finalize()), size))
}

pub fn file_hash_of_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {:?}", path))?;
    file_hash(file).with_context(|| format!("hash {:?}", path))
}
