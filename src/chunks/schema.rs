//! Field layout of the chunked Safe calldata.
//!
//! Each entry names the chunk index and byte range a field is read from. The
//! ranges are reproduced exactly as deployed hosts lay them out, including
//! the unaligned `baseGas` read and the shared `operation`/`nonce` origin in
//! chunk 3.

use super::{ChunkError, ChunkResult};
use crate::types::{Chunk, CHUNK_SIZE, WORD_SIZE};

/// Byte range of one field inside one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub chunk: u64,
    pub offset: usize,
    pub len: usize,
}

impl FieldSpec {
    pub const fn new(name: &'static str, chunk: u64, offset: usize, len: usize) -> Self {
        Self {
            name,
            chunk,
            offset,
            len,
        }
    }

    /// Same origin, shorter length. Used for length-prefixed fields.
    pub const fn truncated(&self, len: usize) -> Self {
        Self {
            name: self.name,
            chunk: self.chunk,
            offset: self.offset,
            len: if len < self.len { len } else { self.len },
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Borrow exactly `expected` bytes of this field from `chunk`
    pub fn slice<'c>(&self, chunk: &'c Chunk, expected: usize) -> ChunkResult<&'c [u8]> {
        if expected != self.len || self.end() > CHUNK_SIZE {
            return Err(self.out_of_bounds());
        }
        Ok(&chunk[self.offset..self.end()])
    }

    /// Borrow the field's bytes, whatever its length
    pub fn bytes<'c>(&self, chunk: &'c Chunk) -> ChunkResult<&'c [u8]> {
        self.slice(chunk, self.len)
    }

    /// ABI word: left-zero-padded to 32 bytes, copied verbatim when already 32
    pub fn word(&self, chunk: &Chunk) -> ChunkResult<[u8; WORD_SIZE]> {
        let bytes = self.bytes(chunk)?;
        if bytes.len() > WORD_SIZE {
            return Err(self.out_of_bounds());
        }
        let mut word = [0u8; WORD_SIZE];
        word[WORD_SIZE - bytes.len()..].copy_from_slice(bytes);
        Ok(word)
    }

    fn out_of_bounds(&self) -> ChunkError {
        ChunkError::FieldOutOfBounds {
            field: self.name,
            offset: self.offset,
            len: self.len,
        }
    }
}

// SafeTx struct members
pub const TO: FieldSpec = FieldSpec::new("to", 0, 0, 20);
pub const GAS_TOKEN: FieldSpec = FieldSpec::new("gasToken", 0, 20, 20);
pub const REFUND_RECEIVER: FieldSpec = FieldSpec::new("refundReceiver", 0, 40, 20);
pub const VALUE: FieldSpec = FieldSpec::new("value", 1, 0, 32);
pub const SAFE_TX_GAS: FieldSpec = FieldSpec::new("safeTxGas", 1, 32, 32);
pub const BASE_GAS: FieldSpec = FieldSpec::new("baseGas", 2, 1, 32);
pub const GAS_PRICE: FieldSpec = FieldSpec::new("gasPrice", 2, 32, 32);
pub const OPERATION: FieldSpec = FieldSpec::new("operation", 3, 0, 1);
pub const NONCE: FieldSpec = FieldSpec::new("nonce", 3, 0, 32);

// Inner calldata (the `data` member, hashed as a stream)
pub const SELECTOR: FieldSpec = FieldSpec::new("selector", 4, 0, 4);
pub const PAYLOAD_FIRST_CHUNK: u64 = 5;
pub const PAYLOAD_LOW_WORD: FieldSpec = FieldSpec::new("payloadLow", 0, 0, 32);
pub const PAYLOAD_HIGH_WORD: FieldSpec = FieldSpec::new("payloadHigh", 0, 32, 32);

// Domain
pub const VERIFYING_CONTRACT: FieldSpec = FieldSpec::new("verifyingContract", 7, 0, 32);

// Display-only fields
pub const AMOUNT: FieldSpec = FieldSpec::new("amount", 5, 56, 8);
pub const REDEEMER_SCRIPT_LEN: FieldSpec = FieldSpec::new("redeemerScriptLen", 10, 30, 2);
pub const REDEEMER_SCRIPT: FieldSpec = FieldSpec::new("redeemerScript", 10, 33, 31);

/// Every fixed field, for layout sanity checks
pub const ALL_FIELDS: [FieldSpec; 16] = [
    TO,
    GAS_TOKEN,
    REFUND_RECEIVER,
    VALUE,
    SAFE_TX_GAS,
    BASE_GAS,
    GAS_PRICE,
    OPERATION,
    NONCE,
    SELECTOR,
    PAYLOAD_LOW_WORD,
    PAYLOAD_HIGH_WORD,
    VERIFYING_CONTRACT,
    AMOUNT,
    REDEEMER_SCRIPT_LEN,
    REDEEMER_SCRIPT,
];
