//! Network Configuration
//!
//! Per-deployment constants that bind a signature to one chain and one
//! Safe contract family:
//! - EIP-155 chain id, already ABI-encoded as a 32-byte word
//! - EIP-712 domain separator type-hash
//! - SafeTx struct type-hash
//! - Asset ticker shown on the confirmation screen
//!
//! These values are handed to the hash engine explicitly; nothing here is
//! global state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")
pub const DOMAIN_SEPARATOR_TYPEHASH: [u8; 32] = [
    0x47, 0xe7, 0x95, 0x34, 0xa2, 0x45, 0x95, 0x2e, 0x8b, 0x16, 0x89, 0x3a, 0x33, 0x6b, 0x85, 0xa3,
    0xd9, 0xea, 0x9f, 0xa8, 0xc5, 0x73, 0xf3, 0xd8, 0x03, 0xaf, 0xb9, 0x2a, 0x79, 0x46, 0x92, 0x18,
];

/// keccak256 of the SafeTx type string (to, value, data, operation, safeTxGas,
/// baseGas, gasPrice, gasToken, refundReceiver, nonce)
pub const SAFE_TX_TYPEHASH: [u8; 32] = [
    0xbb, 0x83, 0x10, 0xd4, 0x86, 0x36, 0x8d, 0xb6, 0xbd, 0x6f, 0x84, 0x94, 0x02, 0xfd, 0xd7, 0x3a,
    0xd5, 0x3d, 0x31, 0x6b, 0x5a, 0x4b, 0x26, 0x44, 0xad, 0x6e, 0xfe, 0x0f, 0x94, 0x12, 0x86, 0xd8,
];

pub const DEFAULT_TICKER: &str = "stBTC";
pub const MAX_TICKER_LEN: usize = 5;

pub const MAINNET_CHAIN_ID: u64 = 1;
/// Sepolia
pub const TESTNET_CHAIN_ID: u64 = 11_155_111;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("ticker must be 1..={max} ASCII alphanumerics, got {0:?}", max = MAX_TICKER_LEN)]
    InvalidTicker(String),

    #[error("cannot read config: {0}")]
    Io(String),

    #[error("invalid config JSON: {0}")]
    Json(String),
}

/// Deployment the signer is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn chain_id(self) -> u64 {
        match self {
            Network::Mainnet => MAINNET_CHAIN_ID,
            Network::Testnet => TESTNET_CHAIN_ID,
        }
    }

    /// Network used to encode the redeemer's Bitcoin address
    pub fn bitcoin_network(self) -> bitcoin::Network {
        match self {
            Network::Mainnet => bitcoin::Network::Bitcoin,
            Network::Testnet => bitcoin::Network::Testnet,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "acre" => Ok(Network::Mainnet),
            "testnet" | "sepolia" | "acre-testnet" => Ok(Network::Testnet),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Zero-padded big-endian ABI word for a chain id
pub fn chain_id_word(chain_id: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&chain_id.to_be_bytes());
    word
}

/// Constants the hash engine and display path depend on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network: Network,
    pub chain_id_word: [u8; 32],
    pub domain_separator_typehash: [u8; 32],
    pub safe_tx_typehash: [u8; 32],
    pub ticker: String,
    pub bitcoin_network: bitcoin::Network,
}

impl NetworkConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            chain_id_word: chain_id_word(network.chain_id()),
            domain_separator_typehash: DOMAIN_SEPARATOR_TYPEHASH,
            safe_tx_typehash: SAFE_TX_TYPEHASH,
            ticker: DEFAULT_TICKER.to_string(),
            bitcoin_network: network.bitcoin_network(),
        }
    }

    pub fn mainnet() -> Self {
        Self::for_network(Network::Mainnet)
    }

    pub fn testnet() -> Self {
        Self::for_network(Network::Testnet)
    }

    /// Override the chain id (forks, local devnets)
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id_word = chain_id_word(chain_id);
        self
    }

    pub fn with_ticker(mut self, ticker: &str) -> Result<Self, ConfigError> {
        validate_ticker(ticker)?;
        self.ticker = ticker.to_string();
        Ok(self)
    }
}

fn validate_ticker(ticker: &str) -> Result<(), ConfigError> {
    let ok = !ticker.is_empty()
        && ticker.len() <= MAX_TICKER_LEN
        && ticker.chars().all(|c| c.is_ascii_alphanumeric());
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidTicker(ticker.to_string()))
    }
}

/// On-disk shape of the signer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WithdrawSettings {
    pub network: Network,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub auto_approve: bool,
}

/// Everything one withdrawal handler needs besides its collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawConfig {
    pub network: NetworkConfig,
    /// Skip the confirmation wait. Honoured only with the
    /// `autoapprove-for-perf-tests` feature.
    pub auto_approve: bool,
}

impl WithdrawConfig {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            auto_approve: false,
        }
    }

    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    /// Whether the confirmation step is actually skipped in this build
    pub fn skips_confirmation(&self) -> bool {
        self.auto_approve && cfg!(feature = "autoapprove-for-perf-tests")
    }

    pub fn from_settings(settings: &WithdrawSettings) -> Result<Self, ConfigError> {
        let mut network = NetworkConfig::for_network(settings.network);
        if let Some(chain_id) = settings.chain_id {
            network = network.with_chain_id(chain_id);
        }
        if let Some(ref ticker) = settings.ticker {
            network = network.with_ticker(ticker)?;
        }
        Ok(Self::new(network).with_auto_approve(settings.auto_approve))
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: WithdrawSettings =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        Self::from_settings(&settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&json)
    }
}
