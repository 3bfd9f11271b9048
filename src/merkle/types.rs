use core::fmt;

use serde::{Deserialize, Serialize};

use crate::sm3::Digest;

/// Position of a proof sibling relative to the node being folded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// One step of an authentication path, leaf-to-root order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathElement {
    /// Which side of the concatenation the sibling occupies.
    pub side: Side,
    /// Sibling subtree digest.
    pub sibling: Digest,
}

/// Errors emitted by the tree and proof layer.
///
/// A proof that is well-shaped but fails cryptographically is *not* an
/// error; verification reports it as `Ok(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MerkleError {
    /// Leaf index at or beyond the leaf count.
    InvalidIndex { index: usize, leaf_count: usize },
    /// Proof element count or neighbor structure inconsistent with the
    /// stated leaf count.
    MalformedProof { reason: &'static str },
    /// Proof requested on a tree with zero leaves.
    EmptyTree,
    /// Non-inclusion requested for a key the tree contains.
    KeyPresent { index: usize },
}

impl fmt::Display for MerkleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MerkleError::InvalidIndex { index, leaf_count } => {
                write!(
                    f,
                    "leaf index {} out of range for {} leaves",
                    index, leaf_count
                )
            }
            MerkleError::MalformedProof { reason } => {
                write!(f, "malformed proof: {}", reason)
            }
            MerkleError::EmptyTree => write!(f, "tree has no leaves"),
            MerkleError::KeyPresent { index } => {
                write!(f, "key is present at leaf index {}", index)
            }
        }
    }
}

impl std::error::Error for MerkleError {}
