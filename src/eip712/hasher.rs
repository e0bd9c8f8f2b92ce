//! EIP-712 Hashing
//!
//! Domain separator, struct hash and final combination for `SafeTx`.

use super::stream::PayloadHasher;
use super::types::*;
use crate::chunks::{ChunkReader, ChunkResult, VERIFYING_CONTRACT};
use crate::config::NetworkConfig;
use crate::log_debug;
use crate::types::WORD_SIZE;
use crate::utils::keccak256;

/// Hash engine bound to one network's constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeTxHasher {
    domain_separator_typehash: [u8; 32],
    chain_id_word: [u8; 32],
    safe_tx_typehash: [u8; 32],
}

impl SafeTxHasher {
    pub fn new(network: &NetworkConfig) -> Self {
        Self {
            domain_separator_typehash: network.domain_separator_typehash,
            chain_id_word: network.chain_id_word,
            safe_tx_typehash: network.safe_tx_typehash,
        }
    }

    /// hashStruct(SafeTx), reading every field word from the chunk stream
    pub fn struct_hash(
        &self,
        reader: &mut ChunkReader<'_>,
        payload_hash: &[u8; 32],
    ) -> ChunkResult<[u8; 32]> {
        let mut buffer = [0u8; STRUCT_BUFFER_LEN];

        for (slot, word) in SAFE_TX_LAYOUT.iter().zip(buffer.chunks_exact_mut(WORD_SIZE)) {
            match slot {
                StructSlot::TypeHash => word.copy_from_slice(&self.safe_tx_typehash),
                StructSlot::DataHash => word.copy_from_slice(payload_hash),
                StructSlot::Field(field) => word.copy_from_slice(&reader.read_word(field)?),
            }
        }

        Ok(keccak256(&buffer))
    }

    /// Domain separator for an already-fetched verifying-contract word
    pub fn domain_separator_for(&self, verifying_contract: &[u8; 32]) -> [u8; 32] {
        let mut buffer = [0u8; DOMAIN_BUFFER_LEN];
        buffer[..32].copy_from_slice(&self.domain_separator_typehash);
        buffer[32..64].copy_from_slice(&self.chain_id_word);
        buffer[64..].copy_from_slice(verifying_contract);
        keccak256(&buffer)
    }

    pub fn domain_separator(&self, reader: &mut ChunkReader<'_>) -> ChunkResult<[u8; 32]> {
        let verifying_contract = reader.read_word(&VERIFYING_CONTRACT)?;
        Ok(self.domain_separator_for(&verifying_contract))
    }

    /// Every intermediate hash, in the order they are computed
    pub fn compute_preimage(&self, reader: &mut ChunkReader<'_>) -> ChunkResult<Eip712PreImage> {
        let payload_hash = PayloadHasher::hash_stream(reader)?;
        let struct_hash = self.struct_hash(reader, &payload_hash)?;
        let domain_separator = self.domain_separator(reader)?;
        let final_hash = final_hash(&domain_separator, &struct_hash);

        log_debug!(
            "eip712",
            "SafeTx hashed",
            payload_hash = hex::encode(payload_hash),
            final_hash = hex::encode(final_hash),
        );

        Ok(Eip712PreImage {
            payload_hash,
            domain_separator,
            struct_hash,
            final_hash,
        })
    }

    /// The 32-byte value that gets signed
    pub fn compute(&self, reader: &mut ChunkReader<'_>) -> ChunkResult<[u8; 32]> {
        Ok(self.compute_preimage(reader)?.final_hash)
    }
}

/// keccak256(0x19 0x01 ‖ domainSeparator ‖ structHash)
pub fn final_hash(domain_separator: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    let mut data = [0u8; 2 + 32 + 32];
    data[..2].copy_from_slice(&EIP712_PREFIX);
    data[2..34].copy_from_slice(domain_separator);
    data[34..].copy_from_slice(struct_hash);
    keccak256(&data)
}

#[cfg(test)]
mod hasher_tests {
    use super::*;

    #[test]
    fn test_final_hash_layout() {
        let domain = [0xaa; 32];
        let structh = [0xbb; 32];
        let mut expected = vec![0x19, 0x01];
        expected.extend_from_slice(&domain);
        expected.extend_from_slice(&structh);
        assert_eq!(final_hash(&domain, &structh), keccak256(&expected));
        assert_ne!(final_hash(&domain, &structh), final_hash(&structh, &domain));
    }

    #[test]
    fn test_domain_separator_depends_on_chain() {
        let contract = [0x11; 32];
        let mainnet = SafeTxHasher::new(&NetworkConfig::mainnet());
        let testnet = SafeTxHasher::new(&NetworkConfig::testnet());
        assert_ne!(
            mainnet.domain_separator_for(&contract),
            testnet.domain_separator_for(&contract)
        );
    }
}
