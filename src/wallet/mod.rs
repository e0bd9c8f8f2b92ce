//! Wallet Module
//!
//! Key derivation and signing behind [`KeyProvider`], address rendering
//! behind [`AddressEncoder`], and the redeemer ownership check built on both.

pub mod address;
pub mod derivation_path;
pub mod keyring;

pub use address::*;
pub use derivation_path::*;
pub use keyring::*;
