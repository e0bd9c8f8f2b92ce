//! Redeemer output script extraction and decoding.

use bitcoin::{Address, Script};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunks::{REDEEMER_SCRIPT, REDEEMER_SCRIPT_LEN};
use crate::types::{AddressType, Chunk};

/// Cap on the declared length, which counts its own prefix byte
pub const MAX_REDEEMER_LEN: usize = 32;

/// Longest address string a redeemer may decode to
pub const MAX_ADDRESS_LENGTH_STR: usize = 74;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("redeemer script is empty")]
    Empty,

    #[error("unrecognized output script type")]
    UnknownType,

    #[error("cannot encode output script as an address: {0}")]
    InvalidAddress(String),

    #[error("address too long: {0} chars")]
    AddressTooLong(usize),
}

/// Standard output script templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScriptType {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
    P2tr,
    /// Witness program of a version this signer cannot derive
    UnknownSegwit,
}

impl ScriptType {
    /// Address type a single key must produce to own this script.
    /// P2SH is assumed to wrap P2WPKH; script-hash outputs with an
    /// arbitrary witness script cannot belong to one key.
    pub fn address_type(self) -> Option<AddressType> {
        match self {
            ScriptType::P2pkh => Some(AddressType::Legacy),
            ScriptType::P2sh => Some(AddressType::WrappedSegwit),
            ScriptType::P2wpkh => Some(AddressType::NativeSegwit),
            ScriptType::P2tr => Some(AddressType::Taproot),
            ScriptType::P2wsh | ScriptType::UnknownSegwit => None,
        }
    }
}

/// Output of the script decoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedScript {
    pub script_type: ScriptType,
    pub address: String,
}

/// Script-type/address decoding collaborator
pub trait ScriptDecoder {
    fn decode(&self, script: &[u8]) -> Result<DecodedScript, ScriptError>;
}

/// Decoder backed by the `bitcoin` crate's script templates
#[derive(Debug, Clone, Copy)]
pub struct BitcoinScriptDecoder {
    network: bitcoin::Network,
}

impl BitcoinScriptDecoder {
    pub fn new(network: bitcoin::Network) -> Self {
        Self { network }
    }
}

impl ScriptDecoder for BitcoinScriptDecoder {
    fn decode(&self, script: &[u8]) -> Result<DecodedScript, ScriptError> {
        if script.is_empty() {
            return Err(ScriptError::Empty);
        }
        let script = Script::from_bytes(script);

        let script_type = if script.is_p2pkh() {
            ScriptType::P2pkh
        } else if script.is_p2sh() {
            ScriptType::P2sh
        } else if script.is_p2wpkh() {
            ScriptType::P2wpkh
        } else if script.is_p2wsh() {
            ScriptType::P2wsh
        } else if script.is_p2tr() {
            ScriptType::P2tr
        } else if script.is_witness_program() {
            ScriptType::UnknownSegwit
        } else {
            return Err(ScriptError::UnknownType);
        };

        let address = Address::from_script(script, self.network)
            .map_err(|e| ScriptError::InvalidAddress(e.to_string()))?
            .to_string();
        if address.len() > MAX_ADDRESS_LENGTH_STR {
            return Err(ScriptError::AddressTooLong(address.len()));
        }

        Ok(DecodedScript {
            script_type,
            address,
        })
    }
}

/// Borrow the redeemer output script out of its chunk.
///
/// The declared length is capped at 32 and includes the script's own length
/// prefix byte at offset 32, so at most 31 script bytes follow.
pub fn redeemer_script(chunk: &Chunk) -> Result<&[u8], ScriptError> {
    let len_bytes = REDEEMER_SCRIPT_LEN
        .bytes(chunk)
        .map_err(|_| ScriptError::Empty)?;
    let declared = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
    let declared = declared.min(MAX_REDEEMER_LEN);
    if declared <= 1 {
        return Err(ScriptError::Empty);
    }

    REDEEMER_SCRIPT
        .truncated(declared - 1)
        .bytes(chunk)
        .map_err(|_| ScriptError::Empty)
}
