//! SafeTx struct shape.
//!
//! Only one typed-data struct is ever hashed, so its encoding is a fixed
//! table of slots rather than a type-string interpreter.

use serde::{Deserialize, Serialize};

use crate::chunks::{
    FieldSpec, BASE_GAS, GAS_PRICE, GAS_TOKEN, NONCE, OPERATION, REFUND_RECEIVER, SAFE_TX_GAS, TO,
    VALUE,
};
use crate::types::WORD_SIZE;

/// Magic prefix for EIP-712 encoding
pub const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];

/// Source of one 32-byte word of the encoded struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructSlot {
    /// The network's SafeTx type hash
    TypeHash,
    /// A chunk field, left-zero-padded to a word
    Field(FieldSpec),
    /// keccak256 of the calldata payload
    DataHash,
}

/// `SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,
/// uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)`
pub const SAFE_TX_LAYOUT: [StructSlot; 11] = [
    StructSlot::TypeHash,
    StructSlot::Field(TO),
    StructSlot::Field(VALUE),
    StructSlot::DataHash,
    StructSlot::Field(OPERATION),
    StructSlot::Field(SAFE_TX_GAS),
    StructSlot::Field(BASE_GAS),
    StructSlot::Field(GAS_PRICE),
    StructSlot::Field(GAS_TOKEN),
    StructSlot::Field(REFUND_RECEIVER),
    StructSlot::Field(NONCE),
];

pub const STRUCT_BUFFER_LEN: usize = SAFE_TX_LAYOUT.len() * WORD_SIZE;

/// typeHash, chainId, verifyingContract
pub const DOMAIN_BUFFER_LEN: usize = 3 * WORD_SIZE;

/// Every intermediate hash of one SafeTx computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712PreImage {
    #[serde(with = "hex_word")]
    pub payload_hash: [u8; 32],
    #[serde(with = "hex_word")]
    pub domain_separator: [u8; 32],
    #[serde(with = "hex_word")]
    pub struct_hash: [u8; 32],
    #[serde(with = "hex_word")]
    pub final_hash: [u8; 32],
}

mod hex_word {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(word: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(word)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_layout_shape() {
        assert_eq!(STRUCT_BUFFER_LEN, 352);
        assert_eq!(SAFE_TX_LAYOUT[0], StructSlot::TypeHash);
        assert_eq!(SAFE_TX_LAYOUT[3], StructSlot::DataHash);
        let fields = SAFE_TX_LAYOUT
            .iter()
            .filter(|slot| matches!(slot, StructSlot::Field(_)))
            .count();
        assert_eq!(fields, 9);
    }

    #[test]
    fn test_preimage_json() {
        let pre = Eip712PreImage {
            payload_hash: [1; 32],
            domain_separator: [2; 32],
            struct_hash: [3; 32],
            final_hash: [4; 32],
        };
        let json = serde_json::to_string(&pre).unwrap();
        assert!(json.contains(&format!("\"finalHash\":\"0x{}\"", "04".repeat(32))));
        let back: Eip712PreImage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pre);
    }
}
