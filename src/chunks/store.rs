//! Leaf providers.
//!
//! [`MerkleChunkSource`] is the device side: it asks an untrusted
//! [`LeafProvider`] for a leaf plus proof and only returns bytes that verify
//! against the request's root. [`PayloadHost`] is an in-memory host that
//! chunks a calldata buffer and answers with proofs.

use super::merkle::{leaf_hash, left_subtree_size, node_hash, verify_leaf};
use super::{ChunkError, ChunkResult, ChunkSource};
use crate::types::{Chunk, CHUNK_SIZE};

/// What the host sends back for one leaf request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafResponse {
    pub data: Vec<u8>,
    pub proof: Vec<[u8; 32]>,
}

/// The untrusted side of the chunk protocol
pub trait LeafProvider {
    fn get_leaf(&mut self, root: &[u8; 32], n_chunks: u64, index: u64) -> Option<LeafResponse>;
}

/// Authenticating adapter from a [`LeafProvider`] to a [`ChunkSource`]
pub struct MerkleChunkSource<P> {
    provider: P,
}

impl<P: LeafProvider> MerkleChunkSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: LeafProvider> ChunkSource for MerkleChunkSource<P> {
    fn fetch(&mut self, root: &[u8; 32], n_chunks: u64, index: u64) -> ChunkResult<Chunk> {
        if index >= n_chunks {
            return Err(ChunkError::IndexOutOfRange { index, n_chunks });
        }

        let response = self
            .provider
            .get_leaf(root, n_chunks, index)
            .ok_or(ChunkError::Unavailable { index })?;

        if response.data.len() != CHUNK_SIZE {
            return Err(ChunkError::LengthMismatch {
                index,
                len: response.data.len(),
            });
        }
        if !verify_leaf(root, n_chunks, index, &response.data, &response.proof) {
            return Err(ChunkError::ProofMismatch { index });
        }

        let mut chunk = [0u8; CHUNK_SIZE];
        chunk.copy_from_slice(&response.data);
        Ok(chunk)
    }
}

/// In-memory host holding a chunked payload and its Merkle commitment
#[derive(Debug, Clone)]
pub struct PayloadHost {
    chunks: Vec<Chunk>,
    leaf_hashes: Vec<[u8; 32]>,
    root: [u8; 32],
    served: Vec<u64>,
}

impl PayloadHost {
    /// Split `payload` into 64-byte leaves, zero-padding the last one
    pub fn from_payload(payload: &[u8]) -> Self {
        let chunks = payload
            .chunks(CHUNK_SIZE)
            .map(|piece| {
                let mut chunk = [0u8; CHUNK_SIZE];
                chunk[..piece.len()].copy_from_slice(piece);
                chunk
            })
            .collect();
        Self::from_chunks(chunks)
    }

    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        let leaf_hashes: Vec<[u8; 32]> = chunks.iter().map(|c| leaf_hash(c)).collect();
        let root = if leaf_hashes.is_empty() {
            [0u8; 32]
        } else {
            subtree_root(&leaf_hashes)
        };
        Self {
            chunks,
            leaf_hashes,
            root,
            served: Vec::new(),
        }
    }

    pub fn root(&self) -> [u8; 32] {
        self.root
    }

    pub fn n_chunks(&self) -> u64 {
        self.chunks.len() as u64
    }

    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// Indices served so far, in request order
    pub fn served(&self) -> &[u64] {
        &self.served
    }

    pub fn proof(&self, index: usize) -> Vec<[u8; 32]> {
        subtree_proof(&self.leaf_hashes, index)
    }
}

impl LeafProvider for PayloadHost {
    fn get_leaf(&mut self, root: &[u8; 32], n_chunks: u64, index: u64) -> Option<LeafResponse> {
        if *root != self.root || n_chunks != self.n_chunks() || index >= n_chunks {
            return None;
        }
        let i = usize::try_from(index).ok()?;
        self.served.push(index);
        Some(LeafResponse {
            data: self.chunks[i].to_vec(),
            proof: self.proof(i),
        })
    }
}

impl<P: LeafProvider + ?Sized> LeafProvider for &mut P {
    fn get_leaf(&mut self, root: &[u8; 32], n_chunks: u64, index: u64) -> Option<LeafResponse> {
        (**self).get_leaf(root, n_chunks, index)
    }
}

fn subtree_root(hashes: &[[u8; 32]]) -> [u8; 32] {
    if hashes.len() == 1 {
        return hashes[0];
    }
    let left = left_subtree_size(hashes.len() as u64) as usize;
    node_hash(&subtree_root(&hashes[..left]), &subtree_root(&hashes[left..]))
}

fn subtree_proof(hashes: &[[u8; 32]], index: usize) -> Vec<[u8; 32]> {
    if hashes.len() <= 1 {
        return Vec::new();
    }
    let left = left_subtree_size(hashes.len() as u64) as usize;
    if index < left {
        let mut proof = subtree_proof(&hashes[..left], index);
        proof.push(subtree_root(&hashes[left..]));
        proof
    } else {
        let mut proof = subtree_proof(&hashes[left..], index - left);
        proof.push(subtree_root(&hashes[..left]));
        proof
    }
}
