//! Authenticated append-only Merkle tree over SM3.
//!
//! The layer fixes the following protocol knobs:
//!
//! * **Hash:** SM3 via the scheduled backend; digests are 32 bytes.
//! * **Domain separation:** RFC6962 tags — `0x00` before leaf payloads,
//!   `0x01` before concatenated child digests — so a leaf can never be
//!   confused with an internal node of matching byte content.
//! * **Shape:** RFC6962 recursive split at the largest power of two
//!   strictly below the range size; the empty tree's root is the fixed
//!   [`EMPTY_TREE_ROOT`] constant.
//! * **Non-inclusion:** sorted-key bracketing. Leaves are maintained in
//!   byte order and an absent key is witnessed by the inclusion proofs of
//!   its adjacent present neighbors.

mod proof;
mod tree;
mod types;

pub use proof::{
    verify_inclusion, verify_non_inclusion, InclusionProof, Neighbor, NonInclusionProof,
};
pub use tree::{
    hash_leaf, hash_nodes, MerkleTree, EMPTY_TREE_ROOT, LEAF_PREFIX, NODE_PREFIX,
};
pub use types::{MerkleError, PathElement, Side};
