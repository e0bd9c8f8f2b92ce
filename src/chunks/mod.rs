//! Chunk Access Layer
//!
//! The calldata of the Safe transaction never exists in one piece. The host
//! serves it as 64-byte leaves of a Merkle tree whose root arrives with the
//! request; each leaf is fetched, authenticated, consumed and dropped.
//!
//! - [`ChunkSource`] is the authenticated retrieval primitive
//! - [`ChunkReader`] binds a source to one request's root and chunk count and
//!   exposes bounds-checked field reads driven by the [`schema`] table
//! - [`merkle`] verifies a leaf proof against the root
//! - [`store`] holds the in-memory host used by the CLI and tests

pub mod merkle;
pub mod schema;
pub mod store;

pub use merkle::*;
pub use schema::*;
pub use store::*;

use crate::types::{Chunk, WORD_SIZE};
use thiserror::Error;

/// Error types for chunk retrieval
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk {index} out of range ({n_chunks} chunks)")]
    IndexOutOfRange { index: u64, n_chunks: u64 },

    #[error("host did not provide chunk {index}")]
    Unavailable { index: u64 },

    #[error("chunk {index} has {len} bytes, expected 64")]
    LengthMismatch { index: u64, len: usize },

    #[error("chunk {index} does not match the data root")]
    ProofMismatch { index: u64 },

    #[error("field {field} [{offset}, {offset}+{len}) exceeds the chunk")]
    FieldOutOfBounds {
        field: &'static str,
        offset: usize,
        len: usize,
    },
}

pub type ChunkResult<T> = Result<T, ChunkError>;

/// Authenticated leaf retrieval.
///
/// Implementations must verify the returned block against `root` and never
/// hand back unauthenticated bytes. They keep no state between calls that
/// influences the result.
pub trait ChunkSource {
    fn fetch(&mut self, root: &[u8; 32], n_chunks: u64, index: u64) -> ChunkResult<Chunk>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    fn fetch(&mut self, root: &[u8; 32], n_chunks: u64, index: u64) -> ChunkResult<Chunk> {
        (**self).fetch(root, n_chunks, index)
    }
}

/// A chunk source bound to one request
pub struct ChunkReader<'a> {
    source: &'a mut dyn ChunkSource,
    root: [u8; 32],
    n_chunks: u64,
}

impl<'a> ChunkReader<'a> {
    pub fn new(source: &'a mut dyn ChunkSource, root: [u8; 32], n_chunks: u64) -> Self {
        Self {
            source,
            root,
            n_chunks,
        }
    }

    pub fn n_chunks(&self) -> u64 {
        self.n_chunks
    }

    /// Fetch and authenticate one leaf
    pub fn fetch(&mut self, index: u64) -> ChunkResult<Chunk> {
        if index >= self.n_chunks {
            return Err(ChunkError::IndexOutOfRange {
                index,
                n_chunks: self.n_chunks,
            });
        }
        self.source.fetch(&self.root, self.n_chunks, index)
    }

    /// Fetch the chunk holding `field` and copy the field out of it
    pub fn read<const N: usize>(&mut self, field: &FieldSpec) -> ChunkResult<[u8; N]> {
        let chunk = self.fetch(field.chunk)?;
        let mut out = [0u8; N];
        out.copy_from_slice(field.slice(&chunk, N)?);
        Ok(out)
    }

    /// Fetch a field and ABI-encode it as a left-zero-padded word
    pub fn read_word(&mut self, field: &FieldSpec) -> ChunkResult<[u8; WORD_SIZE]> {
        let chunk = self.fetch(field.chunk)?;
        field.word(&chunk)
    }
}
