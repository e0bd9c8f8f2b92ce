//! Signer & Encoder
//!
//! The SafeTx hash is never signed directly. It is rendered as lowercase
//! hex and wrapped in a Bitcoin signed-message digest; the resulting DER
//! signature is re-encoded as a 65-byte compact signature.

pub mod bitcoin_message;
pub mod compact;

pub use bitcoin_message::{hash_message_digest, message_digest, BITCOIN_SIGNED_MESSAGE_MAGIC};
pub use compact::*;

use crate::log_debug;
use crate::wallet::KeyProvider;

/// Error types for message signing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageSignError {
    #[error("signer refused: {0}")]
    Signer(String),

    #[error("malformed DER signature: {0}")]
    MalformedDer(String),

    #[error("signature component {component} is {len} bytes")]
    ComponentTooLong { component: &'static str, len: usize },

    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),
}

pub type MessageSignResult<T> = Result<T, MessageSignError>;

/// Sign a SafeTx final hash with the key at `path`
pub fn sign_final_hash(
    keys: &dyn KeyProvider,
    path: &[u32],
    final_hash: &[u8; 32],
) -> MessageSignResult<WithdrawSignature> {
    let digest = hash_message_digest(final_hash);
    let der = keys
        .sign_digest(path, &digest)
        .map_err(|e| MessageSignError::Signer(e.to_string()))?;

    let signature = WithdrawSignature::from_der(&der.der, der.parity_odd)?;
    log_debug!("signer", "signature encoded", recovery_byte = signature.recovery_byte());
    Ok(signature)
}
