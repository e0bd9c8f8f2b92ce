//! Bitcoin signed-message digest.

use bitcoin::consensus::encode::{serialize, VarInt};
use sha2::{Digest, Sha256};

use crate::utils::{sha256, to_hex_lower};

/// Length-prefixed magic of the Bitcoin message-signing convention
pub const BITCOIN_SIGNED_MESSAGE_MAGIC: &[u8] = b"\x18Bitcoin Signed Message:\n";

/// sha256d(magic ‖ varint(len) ‖ message)
pub fn message_digest(message: &[u8]) -> [u8; 32] {
    let mut engine = Sha256::new();
    engine.update(BITCOIN_SIGNED_MESSAGE_MAGIC);
    engine.update(serialize(&VarInt(message.len() as u64)));
    engine.update(message);
    let first: [u8; 32] = engine.finalize().into();
    sha256(&first)
}

/// Digest actually signed for a SafeTx: the message is the 64-char
/// lowercase hex of the final hash, without `0x`
pub fn hash_message_digest(final_hash: &[u8; 32]) -> [u8; 32] {
    message_digest(to_hex_lower(final_hash).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::hashes::Hash;

    #[test]
    fn test_matches_bitcoin_crate() {
        let final_hash = [0xabu8; 32];
        let hex = hex::encode(final_hash);
        let expected = bitcoin::sign_message::signed_msg_hash(&hex).to_byte_array();
        assert_eq!(hash_message_digest(&final_hash), expected);
    }

    #[test]
    fn test_manual_layout() {
        let message = "ab".repeat(32);
        let mut preimage = BITCOIN_SIGNED_MESSAGE_MAGIC.to_vec();
        preimage.push(64);
        preimage.extend_from_slice(message.as_bytes());
        assert_eq!(message_digest(message.as_bytes()), sha256(&sha256(&preimage)));
    }

    #[test]
    fn test_long_message_uses_multibyte_varint() {
        let message = vec![b'a'; 300];
        let mut preimage = BITCOIN_SIGNED_MESSAGE_MAGIC.to_vec();
        preimage.extend_from_slice(&[0xfd, 0x2c, 0x01]);
        preimage.extend_from_slice(&message);
        assert_eq!(message_digest(&message), sha256(&sha256(&preimage)));
    }
}
