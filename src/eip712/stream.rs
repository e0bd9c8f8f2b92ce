//! Incremental keccak over the calldata payload.

use tiny_keccak::{Hasher, Keccak};

use crate::chunks::{
    ChunkReader, ChunkResult, PAYLOAD_FIRST_CHUNK, PAYLOAD_HIGH_WORD, PAYLOAD_LOW_WORD, SELECTOR,
};
use crate::types::Chunk;

/// Owns the keccak state for one payload hash. Consumed by `finalize`, so
/// nothing can feed it after the digest is taken.
pub struct PayloadHasher {
    keccak: Keccak,
    absorbed: usize,
}

impl PayloadHasher {
    pub fn new() -> Self {
        Self {
            keccak: Keccak::v256(),
            absorbed: 0,
        }
    }

    /// Function selector: first four bytes of the selector chunk
    pub fn absorb_selector(&mut self, chunk: &Chunk) -> ChunkResult<()> {
        let selector = SELECTOR.bytes(chunk)?;
        self.absorb(selector);
        Ok(())
    }

    /// Both words of a payload chunk, low half first
    pub fn absorb_payload_chunk(&mut self, chunk: &Chunk) -> ChunkResult<()> {
        let low = PAYLOAD_LOW_WORD.bytes(chunk)?;
        let high = PAYLOAD_HIGH_WORD.bytes(chunk)?;
        self.absorb(low);
        self.absorb(high);
        Ok(())
    }

    fn absorb(&mut self, bytes: &[u8]) {
        self.keccak.update(bytes);
        self.absorbed += bytes.len();
    }

    /// Bytes fed so far
    pub fn absorbed(&self) -> usize {
        self.absorbed
    }

    pub fn finalize(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.keccak.finalize(&mut out);
        out
    }

    /// Hash the selector and every payload chunk, one chunk in memory at a time
    pub fn hash_stream(reader: &mut ChunkReader<'_>) -> ChunkResult<[u8; 32]> {
        let mut hasher = Self::new();

        let chunk = reader.fetch(SELECTOR.chunk)?;
        hasher.absorb_selector(&chunk)?;

        for index in PAYLOAD_FIRST_CHUNK..reader.n_chunks() {
            let chunk = reader.fetch(index)?;
            hasher.absorb_payload_chunk(&chunk)?;
        }
        Ok(hasher.finalize())
    }
}

impl Default for PayloadHasher {
    fn default() -> Self {
        Self::new()
    }
}
