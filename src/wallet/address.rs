//! Address Verifier
//!
//! Checks that the redeemer address decoded from the calldata belongs to the
//! key that is about to sign. Every failure collapses to `false`.

use bitcoin::key::CompressedPublicKey;
use bitcoin::secp256k1::{PublicKey, Secp256k1, VerifyOnly};
use bitcoin::Address;

use super::keyring::{KeyError, KeyProvider};
use crate::fields::MAX_ADDRESS_LENGTH_STR;
use crate::types::AddressType;
use crate::{log_debug, log_warn};

/// Address-encoding collaborator
pub trait AddressEncoder {
    fn encode(&self, compressed_pubkey: &[u8; 33], address_type: AddressType)
        -> Result<String, KeyError>;
}

/// Encoder backed by the `bitcoin` crate
pub struct BitcoinAddressEncoder {
    secp: Secp256k1<VerifyOnly>,
    network: bitcoin::Network,
}

impl BitcoinAddressEncoder {
    pub fn new(network: bitcoin::Network) -> Self {
        Self {
            secp: Secp256k1::verification_only(),
            network,
        }
    }
}

impl AddressEncoder for BitcoinAddressEncoder {
    fn encode(
        &self,
        compressed_pubkey: &[u8; 33],
        address_type: AddressType,
    ) -> Result<String, KeyError> {
        let pk = PublicKey::from_slice(compressed_pubkey)
            .map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;
        let compressed = CompressedPublicKey(pk);

        let address = match address_type {
            AddressType::Legacy => Address::p2pkh(compressed.pubkey_hash(), self.network),
            AddressType::WrappedSegwit => Address::p2shwpkh(&compressed, self.network),
            AddressType::NativeSegwit => Address::p2wpkh(&compressed, self.network),
            AddressType::Taproot => {
                let (internal_key, _) = pk.x_only_public_key();
                Address::p2tr(&self.secp, internal_key, None, self.network)
            }
        };
        Ok(address.to_string())
    }
}

/// Binds the key and address collaborators for one request
pub struct AddressVerifier<'a> {
    keys: &'a dyn KeyProvider,
    encoder: &'a dyn AddressEncoder,
}

impl<'a> AddressVerifier<'a> {
    pub fn new(keys: &'a dyn KeyProvider, encoder: &'a dyn AddressEncoder) -> Self {
        Self { keys, encoder }
    }

    /// True only when the key at `path` renders as exactly `candidate`
    pub fn verify(&self, path: &[u32], candidate: &str, address_type: AddressType) -> bool {
        if candidate.is_empty() || candidate.len() > MAX_ADDRESS_LENGTH_STR {
            log_warn!("address", "candidate address has invalid length");
            return false;
        }

        let derived = match self
            .keys
            .compressed_public_key(path)
            .and_then(|pk| self.encoder.encode(&pk, address_type))
        {
            Ok(address) => address,
            Err(e) => {
                log_warn!("address", format!("address derivation failed: {}", e));
                return false;
            }
        };

        let matches = derived.as_bytes() == candidate.as_bytes();
        log_debug!("address", format!("{} address match: {}", address_type, matches));
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::derivation_path::HARDENED;
    use crate::wallet::keyring::SeedKeyring;

    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn keyring() -> SeedKeyring {
        SeedKeyring::from_seed(&hex::decode(SEED).unwrap(), bitcoin::Network::Bitcoin).unwrap()
    }

    #[test]
    fn test_master_p2pkh_matches_bip32_vector() {
        let keys = keyring();
        let encoder = BitcoinAddressEncoder::new(bitcoin::Network::Bitcoin);
        let pk = keys.compressed_public_key(&[]).unwrap();
        assert_eq!(
            encoder.encode(&pk, AddressType::Legacy).unwrap(),
            "15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma"
        );
    }

    #[test]
    fn test_encoder_prefixes() {
        let keys = keyring();
        let encoder = BitcoinAddressEncoder::new(bitcoin::Network::Bitcoin);
        let pk = keys.compressed_public_key(&[84 | HARDENED]).unwrap();
        assert!(encoder.encode(&pk, AddressType::WrappedSegwit).unwrap().starts_with('3'));
        assert!(encoder.encode(&pk, AddressType::NativeSegwit).unwrap().starts_with("bc1q"));
        assert!(encoder.encode(&pk, AddressType::Taproot).unwrap().starts_with("bc1p"));
    }

    #[test]
    fn test_verify_round_trip_and_mismatch() {
        let keys = keyring();
        let encoder = BitcoinAddressEncoder::new(bitcoin::Network::Bitcoin);
        let verifier = AddressVerifier::new(&keys, &encoder);

        let path = [84 | HARDENED, HARDENED, HARDENED, 0, 0];
        let pk = keys.compressed_public_key(&path).unwrap();
        let address = encoder.encode(&pk, AddressType::NativeSegwit).unwrap();

        assert!(verifier.verify(&path, &address, AddressType::NativeSegwit));
        assert!(!verifier.verify(&path, &address, AddressType::Taproot));
        assert!(!verifier.verify(&[84 | HARDENED], &address, AddressType::NativeSegwit));
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let keys = keyring();
        let encoder = BitcoinAddressEncoder::new(bitcoin::Network::Bitcoin);
        let verifier = AddressVerifier::new(&keys, &encoder);

        let pk = keys.compressed_public_key(&[]).unwrap();
        let address = encoder.encode(&pk, AddressType::NativeSegwit).unwrap();
        assert!(!verifier.verify(&[], &address.to_uppercase(), AddressType::NativeSegwit));
    }

    #[test]
    fn test_verify_rejects_empty_and_oversize() {
        let keys = keyring();
        let encoder = BitcoinAddressEncoder::new(bitcoin::Network::Bitcoin);
        let verifier = AddressVerifier::new(&keys, &encoder);
        assert!(!verifier.verify(&[], "", AddressType::Legacy));
        assert!(!verifier.verify(&[], &"1".repeat(MAX_ADDRESS_LENGTH_STR + 1), AddressType::Legacy));
    }
}
