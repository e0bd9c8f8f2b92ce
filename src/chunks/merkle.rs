//! Merkle leaf authentication.
//!
//! Tree convention (shared with the host):
//! - leaf hash = sha256(0x00 || leaf bytes)
//! - node hash = sha256(0x01 || left || right)
//! - a tree over `n > 1` leaves puts the largest power of two strictly below
//!   `n` into the left subtree
//!
//! Proofs list sibling hashes from the leaf level up to the level just
//! below the root.

use sha2::{Digest, Sha256};

pub const LEAF_PREFIX: u8 = 0x00;
pub const NODE_PREFIX: u8 = 0x01;

/// Deepest proof accepted, enough for 2^64 leaves
pub const MAX_PROOF_DEPTH: usize = 64;

pub fn leaf_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(data);
    hasher.finalize().into()
}

pub fn node_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Number of leaves in the left subtree of a tree with `size >= 2` leaves
pub fn left_subtree_size(size: u64) -> u64 {
    debug_assert!(size >= 2);
    1u64 << (63 - (size - 1).leading_zeros())
}

/// Root-to-leaf turns for leaf `index`; `true` means the leaf lies right.
/// Returns `None` when `index` is not a leaf of a tree of `size` leaves.
pub fn leaf_directions(size: u64, index: u64) -> Option<Vec<bool>> {
    if index >= size {
        return None;
    }
    let (mut size, mut index) = (size, index);
    let mut directions = Vec::new();
    while size > 1 {
        let left = left_subtree_size(size);
        if index < left {
            directions.push(false);
            size = left;
        } else {
            directions.push(true);
            index -= left;
            size -= left;
        }
    }
    Some(directions)
}

/// Check that `leaf` is leaf `index` of the `size`-leaf tree under `root`
pub fn verify_leaf(
    root: &[u8; 32],
    size: u64,
    index: u64,
    leaf: &[u8],
    proof: &[[u8; 32]],
) -> bool {
    if proof.len() > MAX_PROOF_DEPTH {
        return false;
    }
    let Some(directions) = leaf_directions(size, index) else {
        return false;
    };
    if directions.len() != proof.len() {
        return false;
    }

    let mut acc = leaf_hash(leaf);
    for (sibling, is_right) in proof.iter().zip(directions.iter().rev()) {
        acc = if *is_right {
            node_hash(sibling, &acc)
        } else {
            node_hash(&acc, sibling)
        };
    }
    acc == *root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_subtree_size() {
        assert_eq!(left_subtree_size(2), 1);
        assert_eq!(left_subtree_size(3), 2);
        assert_eq!(left_subtree_size(4), 2);
        assert_eq!(left_subtree_size(5), 4);
        assert_eq!(left_subtree_size(11), 8);
        assert_eq!(left_subtree_size(16), 8);
    }

    #[test]
    fn test_directions() {
        assert_eq!(leaf_directions(1, 0), Some(vec![]));
        assert_eq!(leaf_directions(3, 2), Some(vec![true]));
        assert_eq!(leaf_directions(3, 1), Some(vec![false, true]));
        assert_eq!(leaf_directions(3, 3), None);
    }

    #[test]
    fn test_three_leaf_tree_by_hand() {
        let leaves: Vec<[u8; 32]> = (0u8..3).map(|i| leaf_hash(&[i; 64])).collect();
        let root = node_hash(&node_hash(&leaves[0], &leaves[1]), &leaves[2]);

        assert!(verify_leaf(&root, 3, 0, &[0u8; 64], &[leaves[1], leaves[2]]));
        assert!(verify_leaf(&root, 3, 2, &[2u8; 64], &[node_hash(&leaves[0], &leaves[1])]));

        // Wrong leaf, wrong index, wrong size
        assert!(!verify_leaf(&root, 3, 0, &[9u8; 64], &[leaves[1], leaves[2]]));
        assert!(!verify_leaf(&root, 3, 1, &[0u8; 64], &[leaves[1], leaves[2]]));
        assert!(!verify_leaf(&root, 2, 0, &[0u8; 64], &[leaves[1], leaves[2]]));
    }

    #[test]
    fn test_single_leaf_root_is_leaf_hash() {
        let root = leaf_hash(b"only");
        assert!(verify_leaf(&root, 1, 0, b"only", &[]));
        assert!(!verify_leaf(&root, 1, 0, b"only", &[root]));
    }
}
