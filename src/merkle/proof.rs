use serde::{Deserialize, Serialize};

use crate::sm3::Digest;

use super::tree::{hash_leaf, hash_nodes};
use super::types::{MerkleError, PathElement, Side};

/// Sibling path proving a leaf is present under a root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Path elements in leaf-to-root order.
    pub path: Vec<PathElement>,
}

impl InclusionProof {
    /// Number of path elements.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// True for the single-leaf tree, whose proof carries no siblings.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Present leaf bracketing an absent key, with its own inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Index of the neighbor leaf in the sorted sequence.
    pub index: usize,
    /// Raw bytes of the neighbor leaf.
    pub leaf: Vec<u8>,
    /// Inclusion proof binding the neighbor to the root.
    pub proof: InclusionProof,
}

/// Evidence that a key is absent from a tree with byte-sorted leaves.
///
/// An interior gap carries both neighbors; a key sorting before the first
/// or after the last leaf carries only the one that exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonInclusionProof {
    /// Nearest present leaf sorting strictly below the key.
    pub predecessor: Option<Neighbor>,
    /// Nearest present leaf sorting strictly above the key.
    pub successor: Option<Neighbor>,
}

/// Path length the recursive split dictates for `index` within a tree of
/// `leaf_count` leaves. Promoted odd-tail nodes contribute no element.
fn expected_path_len(mut index: usize, mut count: usize) -> usize {
    let mut len = 0;
    while count > 1 {
        let promoted = count % 2 == 1 && index == count - 1;
        if !promoted {
            len += 1;
        }
        index /= 2;
        count = count.div_ceil(2);
    }
    len
}

/// Recomputes the leaf hash, folds the path in its recorded left/right
/// order and compares against `root`.
///
/// Shape problems (zero leaves, index out of range, path length
/// inconsistent with the stated leaf count) are errors; a well-shaped
/// proof that fails to reproduce the root is `Ok(false)`.
pub fn verify_inclusion(
    root: &Digest,
    leaf: &[u8],
    index: usize,
    leaf_count: usize,
    proof: &InclusionProof,
) -> Result<bool, MerkleError> {
    if leaf_count == 0 {
        return Err(MerkleError::EmptyTree);
    }
    if index >= leaf_count {
        return Err(MerkleError::InvalidIndex { index, leaf_count });
    }
    if proof.path.len() != expected_path_len(index, leaf_count) {
        return Err(MerkleError::MalformedProof {
            reason: "path length inconsistent with index and leaf count",
        });
    }

    let mut digest = hash_leaf(leaf);
    for element in &proof.path {
        digest = match element.side {
            Side::Right => hash_nodes(&digest, &element.sibling),
            Side::Left => hash_nodes(&element.sibling, &digest),
        };
    }
    Ok(digest == *root)
}

/// Checks a bracketing-neighbor absence claim against `root`.
///
/// Both neighbor proofs must verify, the key must sort strictly between
/// the neighbor leaves and the neighbors must be adjacent in the sorted
/// sequence (or sit at the relevant end of it). Ordering and adjacency
/// violations are verification failures (`Ok(false)`); a proof carrying no
/// neighbor at all is malformed.
pub fn verify_non_inclusion(
    root: &Digest,
    key: &[u8],
    leaf_count: usize,
    proof: &NonInclusionProof,
) -> Result<bool, MerkleError> {
    if leaf_count == 0 {
        return Err(MerkleError::EmptyTree);
    }

    if let Some(pred) = &proof.predecessor {
        if !verify_inclusion(root, &pred.leaf, pred.index, leaf_count, &pred.proof)? {
            return Ok(false);
        }
        if pred.leaf.as_slice() >= key {
            return Ok(false);
        }
    }
    if let Some(succ) = &proof.successor {
        if !verify_inclusion(root, &succ.leaf, succ.index, leaf_count, &succ.proof)? {
            return Ok(false);
        }
        if succ.leaf.as_slice() <= key {
            return Ok(false);
        }
    }

    match (&proof.predecessor, &proof.successor) {
        (Some(pred), Some(succ)) => Ok(succ.index == pred.index + 1),
        (Some(pred), None) => Ok(pred.index == leaf_count - 1),
        (None, Some(succ)) => Ok(succ.index == 0),
        (None, None) => Err(MerkleError::MalformedProof {
            reason: "non-inclusion proof carries no bracketing neighbor",
        }),
    }
}
