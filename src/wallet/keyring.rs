//! BIP-32 key access.
//!
//! [`KeyProvider`] is the narrow interface the handler uses for anything
//! involving private key material: public key derivation and ECDSA signing
//! at a path. [`SeedKeyring`] implements it from a BIP-32 seed.

use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv};
use bitcoin::secp256k1::{All, Message, PublicKey, Secp256k1};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<bitcoin::bip32::Error> for KeyError {
    fn from(e: bitcoin::bip32::Error) -> Self {
        KeyError::Derivation(format!("BIP32 error: {}", e))
    }
}

/// DER-encoded ECDSA signature plus the parity of R's y coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerSignature {
    #[serde(with = "hex_bytes")]
    pub der: Vec<u8>,
    pub parity_odd: bool,
}

/// Key derivation and signing collaborator
pub trait KeyProvider {
    /// 33-byte SEC1 compressed public key at `path`
    fn compressed_public_key(&self, path: &[u32]) -> Result<[u8; 33], KeyError>;

    /// ECDSA signature of a prehashed 32-byte digest with the key at `path`
    fn sign_digest(&self, path: &[u32], digest: &[u8; 32]) -> Result<DerSignature, KeyError>;
}

/// Keys derived from an in-memory BIP-32 seed
pub struct SeedKeyring {
    secp: Secp256k1<All>,
    master: Xpriv,
}

impl SeedKeyring {
    pub fn from_seed(seed: &[u8], network: bitcoin::Network) -> Result<Self, KeyError> {
        let master = Xpriv::new_master(network, seed)?;
        Ok(Self {
            secp: Secp256k1::new(),
            master,
        })
    }

    fn derive(&self, path: &[u32]) -> Result<Xpriv, KeyError> {
        let path: DerivationPath = path.iter().map(|step| ChildNumber::from(*step)).collect();
        Ok(self.master.derive_priv(&self.secp, &path)?)
    }
}

impl KeyProvider for SeedKeyring {
    fn compressed_public_key(&self, path: &[u32]) -> Result<[u8; 33], KeyError> {
        let child = self.derive(path)?;
        Ok(PublicKey::from_secret_key(&self.secp, &child.private_key).serialize())
    }

    fn sign_digest(&self, path: &[u32], digest: &[u8; 32]) -> Result<DerSignature, KeyError> {
        let mut child = self.derive(path)?;
        let message = Message::from_digest(*digest);

        // RFC 6979 nonces: same key and digest always give the same signature
        let signature = self.secp.sign_ecdsa_recoverable(&message, &child.private_key);
        child.private_key.non_secure_erase();

        let (recovery_id, _) = signature.serialize_compact();
        let der = signature.to_standard().serialize_der().to_vec();

        Ok(DerSignature {
            der,
            parity_odd: recovery_id.to_i32() & 1 == 1,
        })
    }
}

impl Drop for SeedKeyring {
    fn drop(&mut self) {
        self.master.private_key.non_secure_erase();
    }
}

impl std::fmt::Debug for SeedKeyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedKeyring")
            .field("network", &self.master.network)
            .field("master", &"[REDACTED]")
            .finish()
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
