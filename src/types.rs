//! Shared types for the withdrawal signer
//!
//! Data structures that cross module boundaries are defined here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{StatusWord, WithdrawError};
use crate::wallet::derivation_path::format_bip32_path;

// =============================================================================
// Chunk Types
// =============================================================================

/// Size of one authenticated leaf of the calldata
pub const CHUNK_SIZE: usize = 64;

/// One 64-byte leaf, the only chunk-sized buffer alive at any time
pub type Chunk = [u8; CHUNK_SIZE];

/// ABI word size
pub const WORD_SIZE: usize = 32;

// =============================================================================
// Request Types
// =============================================================================

/// Deepest derivation path a request may carry
pub const MAX_BIP32_PATH_STEPS: usize = 10;

/// A parsed withdrawal command. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Derivation path of the signing key; empty means the master key
    pub path: Vec<u32>,
    /// Number of 64-byte leaves committed to by `data_merkle_root`
    pub n_chunks: u64,
    /// Merkle root over the chunked calldata
    pub data_merkle_root: [u8; 32],
}

impl WithdrawalRequest {
    pub fn new(path: Vec<u32>, n_chunks: u64, data_merkle_root: [u8; 32]) -> Self {
        Self {
            path,
            n_chunks,
            data_merkle_root,
        }
    }

    /// Human-readable path, `(Master key)` when empty
    pub fn path_display(&self) -> String {
        format_bip32_path(&self.path)
    }
}

// =============================================================================
// Address Types
// =============================================================================

/// Address flavours a single public key can be rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressType {
    /// P2PKH
    Legacy,
    /// P2SH-P2WPKH
    WrappedSegwit,
    /// P2WPKH
    NativeSegwit,
    /// P2TR key path, no script tree
    Taproot,
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressType::Legacy => "legacy",
            AddressType::WrappedSegwit => "wrapped-segwit",
            AddressType::NativeSegwit => "native-segwit",
            AddressType::Taproot => "taproot",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Reply to the host: payload plus status word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub data: Vec<u8>,
    pub status: StatusWord,
}

impl Response {
    pub fn ok(data: Vec<u8>) -> Self {
        Self {
            data,
            status: StatusWord::Ok,
        }
    }

    pub fn error(status: StatusWord) -> Self {
        Self {
            data: Vec::new(),
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Wire form: data followed by the big-endian status word
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 2);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.status.code().to_be_bytes());
        out
    }
}

impl From<&WithdrawError> for Response {
    fn from(e: &WithdrawError) -> Self {
        Response::error(e.code)
    }
}
