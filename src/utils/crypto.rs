//! Hash helpers shared by the hash engine, the Merkle verifier and the
//! message signer.

use sha2::{Digest, Sha256};
use tiny_keccak::{Hasher, Keccak};

/// Keccak256 hash (the EVM flavour, not NIST SHA3-256)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Single SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Lowercase hex without a `0x` prefix
pub fn to_hex_lower(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
