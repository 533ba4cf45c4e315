use std::fs::File;
use std::io::{BufReader, Cursor, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use common::constants::{CHUNK_SIZE, GENESIS_PREV_HASH};
use common::log::debug;
use common::types::ChunkRecord;

use crate::hash::file_digest;

/// Number of chunks a file of `size` bytes is split into. Never zero: an
/// empty file still yields one chunk with an empty payload.
pub fn chunk_count_for_size(size: u64) -> u64 {
    size.div_ceil(CHUNK_SIZE as u64).max(1)
}

/// Streams the chunk records of one file, in file order.
///
/// The whole-file hash and size must be known up front because both end up
/// in every record, and every record's hash feeds the next one's `prev_hash`.
pub struct Chunker<R> {
    reader: R,
    file_hash: String,
    size: u64,
    chunk_count: u64,
    emitted: u64,
    prev_hash: String,
}

impl<R: Read> Chunker<R> {
    pub fn new(reader: R, file_hash: String, size: u64) -> Self {
        Self {
            reader,
            file_hash,
            size,
            chunk_count: chunk_count_for_size(size),
            emitted: 0,
            prev_hash: GENESIS_PREV_HASH.to_string(),
        }
    }

    pub fn chunk_count(&self) -> u64 {
        self.chunk_count
    }

    fn next_record(&mut self) -> Result<ChunkRecord> {
        let offset = self.emitted * CHUNK_SIZE as u64;
        let expected = (self.size - offset).min(CHUNK_SIZE as u64) as usize;

        let mut payload = vec![0u8; CHUNK_SIZE];
        let n = fill(&mut self.reader, &mut payload)?;
        if n != expected {
            return Err(anyhow!("input changed while chunking: chunk {} has {} bytes, expected {}", self.emitted, n, expected));
        }
        payload.truncate(n);

        let is_last = self.emitted + 1 == self.chunk_count;
        if is_last && fill(&mut self.reader, &mut [0u8; 1])? != 0 {
            return Err(anyhow!("input grew while chunking: more than {} bytes", self.size));
        }

        let record = ChunkRecord::new(self.file_hash.clone(), self.chunk_count, payload, std::mem::take(&mut self.prev_hash));
        self.prev_hash = record.hash();
        self.emitted += 1;
        Ok(record)
    }
}

impl<R: Read> Iterator for Chunker<R> {
    type Item = Result<ChunkRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= self.chunk_count {
            return None;
        }
        let record = self.next_record();
        if record.is_err() {
            // fuse after the first failure
            self.emitted = self.chunk_count;
        }
        Some(record)
    }
}

/// Reads until `buf` is full or the reader is exhausted.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("read input while chunking"),
        }
    }
    Ok(filled)
}

/// Hashes the whole stream, rewinds it and splits it into its chain.
/// Either every record is returned or an error; never a partial chain.
pub fn generate_chain<R: Read + Seek>(mut reader: R) -> Result<Vec<ChunkRecord>> {
    let start = reader.stream_position().context("locate input start")?;
    let (file_hash, size) = file_digest(&mut reader)?;
    reader.seek(SeekFrom::Start(start)).context("rewind input")?;

    let chunker = Chunker::new(reader, file_hash, size);
    debug!("Chunking {} bytes into {} chunks", size, chunker.chunk_count());
    chunker.collect()
}

pub fn generate_chain_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ChunkRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {:?}", path))?;
    generate_chain(BufReader::new(file)).with_context(|| format!("chunk {:?}", path))
}

pub fn generate_chain_from_bytes(data: &[u8]) -> Result<Vec<ChunkRecord>> {
    generate_chain(Cursor::new(data))
}
