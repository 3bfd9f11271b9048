//! SM3 hash engine with a length-extension demonstration and an
//! RFC6962-style authenticated Merkle tree.
//!
//! The crate is pure, synchronous computation with no I/O:
//!
//! * [`sm3`] / [`Sm3Core`] / [`Sm3Optimized`] — the GB/T 32905-2016 hash
//!   with a reference and a throughput compression backend producing
//!   byte-identical digests.
//! * [`extension`] — the length-extension weakness of the unkeyed
//!   Merkle–Damgård construction, demonstrated by resuming compression
//!   from a published digest.
//! * [`merkle`] — an authenticated tree over ordered leaves (RFC6962
//!   domain separation and shape) with inclusion and sorted-key
//!   non-inclusion proofs, built for leaf counts in the 100 000 range.
//!
//! Proof and digest types derive serde; callers pick their own wire
//! encoding. With the default `parallel` feature, tree construction
//! fans leaf hashing out to rayon workers without affecting any root.

pub mod extension;
pub mod merkle;
pub mod sm3;
pub mod utils;

pub use extension::{forged_preimage, length_extend, Extension};
pub use merkle::{
    verify_inclusion, verify_non_inclusion, InclusionProof, MerkleError, MerkleTree, Neighbor,
    NonInclusionProof, PathElement, Side, EMPTY_TREE_ROOT,
};
pub use sm3::{sm3, standard_padding, Digest, Sm3, Sm3Core, Sm3Error, Sm3Optimized, DIGEST_SIZE};
