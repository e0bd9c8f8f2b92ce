//! Input Sanitization
//!
//! Normalizes operator-supplied hex before it reaches the decoder:
//! - Optional `0x` prefix
//! - Embedded whitespace and newlines (payload files are often wrapped)
//! - Length limits

use thiserror::Error;

/// Maximum length for various input types
pub mod limits {
    /// Largest payload the simulated host accepts (4 MiB of calldata)
    pub const MAX_PAYLOAD_BYTES: usize = 4 * 1024 * 1024;
    /// BIP-32 seeds are 16..=64 bytes
    pub const MIN_SEED_BYTES: usize = 16;
    pub const MAX_SEED_BYTES: usize = 64;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{field} is not valid hex: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    #[error("{field} has {actual} bytes, expected {expected}")]
    BadLength {
        field: &'static str,
        expected: String,
        actual: usize,
    },
}

/// Strip `0x` and all whitespace, then decode
pub fn sanitize_hex(input: &str, field: &'static str) -> Result<Vec<u8>, InputError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let body = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);

    if body.is_empty() {
        return Err(InputError::Empty(field));
    }

    hex::decode(body).map_err(|e| InputError::InvalidHex {
        field,
        reason: e.to_string(),
    })
}

/// Decode a hex payload and enforce the host's size limit
pub fn sanitize_payload(input: &str) -> Result<Vec<u8>, InputError> {
    let bytes = sanitize_hex(input, "payload")?;
    if bytes.len() > limits::MAX_PAYLOAD_BYTES {
        return Err(InputError::BadLength {
            field: "payload",
            expected: format!("at most {}", limits::MAX_PAYLOAD_BYTES),
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Decode a hex seed and enforce BIP-32 seed bounds
pub fn sanitize_seed(input: &str) -> Result<Vec<u8>, InputError> {
    let bytes = sanitize_hex(input, "seed")?;
    if !(limits::MIN_SEED_BYTES..=limits::MAX_SEED_BYTES).contains(&bytes.len()) {
        return Err(InputError::BadLength {
            field: "seed",
            expected: format!("{}..={}", limits::MIN_SEED_BYTES, limits::MAX_SEED_BYTES),
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}
