//! Streaming Hash Engine
//!
//! EIP-712 hashing of a Safe `SafeTx` whose calldata arrives as
//! authenticated chunks. The payload hash is computed incrementally, so
//! memory use does not grow with the number of chunks.
//!
//! # Reference
//! - <https://eips.ethereum.org/EIPS/eip-712>
//!
//! # Example
//! ```rust,ignore
//! use safe_withdraw::eip712::SafeTxHasher;
//!
//! let hasher = SafeTxHasher::new(&NetworkConfig::mainnet());
//! let final_hash = hasher.compute(&mut reader)?;
//! ```

pub mod hasher;
pub mod stream;
pub mod types;

pub use hasher::*;
pub use stream::*;
pub use types::*;
