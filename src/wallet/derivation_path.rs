//! Key Derivation Path handling
//!
//! Converts between the raw `u32` steps a request carries and the
//! `m/84'/0'/0'` notation used in logs and on the command line.

use crate::types::MAX_BIP32_PATH_STEPS;

/// Hardened offset for BIP-32 derivation
pub const HARDENED: u32 = 0x80000000;

/// Shown in place of a path when the master key signs
pub const MASTER_KEY_LABEL: &str = "(Master key)";

/// Single component of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationComponent {
    pub index: u32,
    pub hardened: bool,
}

impl DerivationComponent {
    pub fn new(index: u32, hardened: bool) -> Self {
        Self { index, hardened }
    }

    pub fn from_raw(raw: u32) -> Self {
        Self {
            index: raw & !HARDENED,
            hardened: raw & HARDENED != 0,
        }
    }

    /// Get the full index including hardened bit
    pub fn full_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED
        } else {
            self.index
        }
    }
}

impl std::fmt::Display for DerivationComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// `m/...` notation, or the master-key label for an empty path
pub fn format_bip32_path(path: &[u32]) -> String {
    if path.is_empty() {
        return MASTER_KEY_LABEL.to_string();
    }
    let mut out = String::from("m");
    for step in path {
        out.push('/');
        out.push_str(&DerivationComponent::from_raw(*step).to_string());
    }
    out
}

/// Parse `m`, `m/84'/0'/0'/0/0` (also `h`/`H` hardened markers)
pub fn parse_bip32_path(path: &str) -> Result<Vec<u32>, String> {
    let trimmed = path.trim();

    if trimmed == "m" || trimmed == "M" {
        return Ok(Vec::new());
    }
    if !trimmed.starts_with("m/") && !trimmed.starts_with("M/") {
        return Err("Derivation path must start with 'm/'".to_string());
    }

    let mut steps = Vec::new();
    for component_str in trimmed[2..].split('/') {
        steps.push(parse_component(component_str)?.full_index());
    }

    if steps.len() > MAX_BIP32_PATH_STEPS {
        return Err(format!(
            "Derivation path has {} steps, at most {} allowed",
            steps.len(),
            MAX_BIP32_PATH_STEPS
        ));
    }
    Ok(steps)
}

/// Parse a single path component
fn parse_component(s: &str) -> Result<DerivationComponent, String> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err("Empty path component".to_string());
    }

    let (number_str, hardened) =
        if trimmed.ends_with('\'') || trimmed.ends_with('h') || trimmed.ends_with('H') {
            (&trimmed[..trimmed.len() - 1], true)
        } else {
            (trimmed, false)
        };

    let index: u32 = number_str
        .parse()
        .map_err(|e| format!("Invalid path component '{}': {}", s, e))?;

    if index >= HARDENED {
        return Err(format!("Path component {} exceeds maximum value", index));
    }

    Ok(DerivationComponent::new(index, hardened))
}
