//! Safe Withdrawal Signer
//!
//! Signs withdrawals of a Safe-style multisig whose calldata is streamed from
//! an untrusted host in Merkle-authenticated 64-byte chunks.
//!
//! # Architecture
//!
//! This crate provides:
//! - **chunks**: authenticated chunk retrieval and the calldata field table
//! - **fields**: amount and redeemer-script decoding
//! - **wallet**: BIP-32 keys, address encoding, redeemer ownership check
//! - **ui**: the confirmation screen
//! - **eip712**: streaming SafeTx hashing
//! - **message_signer**: Bitcoin-message digest and 65-byte signature encoding
//! - **handler**: the withdrawal command state machine
//!
//! # Security
//!
//! No signature is produced until the redeemer address has been shown to
//! belong to the signing key and the user has approved the amount. Key
//! material is erased when the keyring is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use safe_withdraw::prelude::*;
//!
//! let handler = WithdrawHandler::new(&config, &keys, &encoder, &decoder);
//! let response = handler.handle(&raw_request, &mut source, &mut ui);
//! ```

pub mod chunks;
pub mod config;
pub mod eip712;
pub mod error;
pub mod fields;
pub mod handler;
pub mod message_signer;
pub mod types;
pub mod ui;
pub mod utils;
pub mod wallet;

pub use error::{StatusWord, WithdrawError, WithdrawResult};
pub use types::*;

/// Everything needed to wire up and run a handler
pub mod prelude {
    pub use crate::chunks::{ChunkReader, ChunkSource, LeafProvider, MerkleChunkSource, PayloadHost};
    pub use crate::config::{Network, NetworkConfig, WithdrawConfig};
    pub use crate::eip712::{Eip712PreImage, SafeTxHasher};
    pub use crate::error::{StatusWord, WithdrawError, WithdrawResult};
    pub use crate::fields::{BitcoinScriptDecoder, ScriptDecoder};
    pub use crate::handler::{encode_request, WithdrawHandler};
    pub use crate::message_signer::WithdrawSignature;
    pub use crate::types::{AddressType, Response, WithdrawalRequest};
    pub use crate::ui::{ConfirmationUi, ScriptedUi, TerminalUi};
    pub use crate::wallet::{AddressEncoder, BitcoinAddressEncoder, KeyProvider, SeedKeyring};
}
