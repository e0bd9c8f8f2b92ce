//! Builders shared by the integration tests.

#![allow(dead_code)]

use bitcoin::key::CompressedPublicKey;
use bitcoin::Address;
use safe_withdraw::types::{Chunk, CHUNK_SIZE};
use safe_withdraw::wallet::{KeyProvider, SeedKeyring};

/// BIP-32 test vector 1
pub const SEED_HEX: &str = "000102030405060708090a0b0c0d0e0f";

pub const ONE_TOKEN: u64 = 1_000_000_000_000_000_000;

pub fn keyring(network: bitcoin::Network) -> SeedKeyring {
    SeedKeyring::from_seed(&hex::decode(SEED_HEX).unwrap(), network).unwrap()
}

pub fn p2wpkh_script(keys: &SeedKeyring, path: &[u32], network: bitcoin::Network) -> Vec<u8> {
    let pk = keys.compressed_public_key(path).unwrap();
    let compressed = CompressedPublicKey::from_slice(&pk).unwrap();
    Address::p2wpkh(&compressed, network).script_pubkey().to_bytes()
}

pub fn p2pkh_script(keys: &SeedKeyring, path: &[u32], network: bitcoin::Network) -> Vec<u8> {
    let pk = keys.compressed_public_key(path).unwrap();
    let compressed = CompressedPublicKey::from_slice(&pk).unwrap();
    Address::p2pkh(compressed.pubkey_hash(), network)
        .script_pubkey()
        .to_bytes()
}

/// Withdrawal calldata laid out as the host chunks it: filler everywhere,
/// the amount in chunk 5 and the length-prefixed redeemer script in chunk 10
pub fn withdrawal_chunks(amount: u64, redeemer_script: &[u8], n_chunks: usize) -> Vec<Chunk> {
    assert!(n_chunks >= 11 && redeemer_script.len() <= 31);

    let mut chunks: Vec<Chunk> = (0..n_chunks)
        .map(|i| {
            let mut chunk = [0u8; CHUNK_SIZE];
            for (j, b) in chunk.iter_mut().enumerate() {
                *b = (i as u8).wrapping_mul(31).wrapping_add(j as u8);
            }
            chunk
        })
        .collect();

    chunks[5][56..64].copy_from_slice(&amount.to_be_bytes());

    let redeemer = &mut chunks[10];
    redeemer[30..].fill(0);
    redeemer[30..32].copy_from_slice(&((redeemer_script.len() + 1) as u16).to_be_bytes());
    redeemer[32] = redeemer_script.len() as u8;
    redeemer[33..33 + redeemer_script.len()].copy_from_slice(redeemer_script);
    chunks
}

pub fn flatten(chunks: &[Chunk]) -> Vec<u8> {
    chunks.iter().flat_map(|c| c.iter().copied()).collect()
}
