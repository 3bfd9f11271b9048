use crate::sm3::{Digest, Sm3Optimized};

use super::proof::{InclusionProof, Neighbor, NonInclusionProof};
use super::types::{MerkleError, PathElement, Side};

/// Domain-separation tag prefixed to leaf payloads (RFC6962).
pub const LEAF_PREFIX: u8 = 0x00;

/// Domain-separation tag prefixed to concatenated child digests (RFC6962).
pub const NODE_PREFIX: u8 = 0x01;

/// Root of the empty tree: `sm3(b"")`, the SM3 analogue of RFC6962's
/// `MTH({})`.
pub const EMPTY_TREE_ROOT: Digest = Digest::from_bytes([
    0x1a, 0xb2, 0x1d, 0x83, 0x55, 0xcf, 0xa1, 0x7f, 0x8e, 0x61, 0x19, 0x48, 0x31, 0xe8, 0x1a, 0x8f,
    0x22, 0xbe, 0xc8, 0xc7, 0x28, 0xfe, 0xfb, 0x74, 0x7e, 0xd0, 0x35, 0xeb, 0x50, 0x82, 0xaa, 0x2b,
]);

/// Hashes a leaf payload under the leaf domain tag.
pub fn hash_leaf(payload: &[u8]) -> Digest {
    let mut hasher = Sm3Optimized::new();
    hasher.update(&[LEAF_PREFIX]);
    hasher.update(payload);
    hasher.finalize()
}

/// Hashes an ordered child pair under the node domain tag. The argument
/// order is the concatenation order and is never commuted.
pub fn hash_nodes(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sm3Optimized::new();
    hasher.update(&[NODE_PREFIX]);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    hasher.finalize()
}

/// Authenticated append-only tree over an ordered leaf sequence.
///
/// Shape follows the RFC6962 recursive split: a range is divided at the
/// largest power of two strictly below its size. The tree is stored as an
/// array-of-levels arena where an odd trailing node is promoted unchanged
/// to the next level; that representation reproduces the recursive-split
/// roots and proof paths exactly. Sealed once built; appending means
/// rebuilding from the extended leaf sequence.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    leaves: Vec<Vec<u8>>,
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Builds and seals a tree over the given leaves. Deterministic for a
    /// given ordered input; an empty input yields the empty tree.
    pub fn from_leaves<I, B>(leaves: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let leaves: Vec<Vec<u8>> = leaves
            .into_iter()
            .map(|leaf| leaf.as_ref().to_vec())
            .collect();
        let levels = build_levels(&leaves);
        Self { leaves, levels }
    }

    /// Number of leaves committed by the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Raw bytes of the leaf at `index`.
    pub fn leaf(&self, index: usize) -> Option<&[u8]> {
        self.leaves.get(index).map(|leaf| leaf.as_slice())
    }

    /// Root digest; [`EMPTY_TREE_ROOT`] for a tree with zero leaves.
    pub fn root(&self) -> Digest {
        self.levels
            .last()
            .and_then(|level| level.first().copied())
            .unwrap_or(EMPTY_TREE_ROOT)
    }

    /// Authentication path for the leaf at `index`, leaf-to-root order.
    pub fn inclusion_proof(&self, index: usize) -> Result<InclusionProof, MerkleError> {
        if self.leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }
        if index >= self.leaves.len() {
            return Err(MerkleError::InvalidIndex {
                index,
                leaf_count: self.leaves.len(),
            });
        }

        let mut path = Vec::with_capacity(self.levels.len().saturating_sub(1));
        let mut current = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let size = level.len();
            let promoted = size % 2 == 1 && current == size - 1;
            if !promoted {
                let element = if current % 2 == 0 {
                    PathElement {
                        side: Side::Right,
                        sibling: level[current + 1],
                    }
                } else {
                    PathElement {
                        side: Side::Left,
                        sibling: level[current - 1],
                    }
                };
                path.push(element);
            }
            current /= 2;
        }

        Ok(InclusionProof { path })
    }

    /// Bracketing-neighbor proof that `key` is absent.
    ///
    /// Requires leaves sorted by byte order; the verifier enforces the
    /// ordering and adjacency of the returned neighbors, so an unsorted
    /// tree can only produce proofs that fail to verify.
    pub fn non_inclusion_proof(&self, key: &[u8]) -> Result<NonInclusionProof, MerkleError> {
        if self.leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }
        let insertion = match self
            .leaves
            .binary_search_by(|leaf| leaf.as_slice().cmp(key))
        {
            Ok(index) => return Err(MerkleError::KeyPresent { index }),
            Err(position) => position,
        };

        let predecessor = match insertion.checked_sub(1) {
            Some(index) => Some(self.neighbor(index)?),
            None => None,
        };
        let successor = if insertion < self.leaves.len() {
            Some(self.neighbor(insertion)?)
        } else {
            None
        };

        Ok(NonInclusionProof {
            predecessor,
            successor,
        })
    }

    fn neighbor(&self, index: usize) -> Result<Neighbor, MerkleError> {
        Ok(Neighbor {
            index,
            leaf: self.leaves[index].clone(),
            proof: self.inclusion_proof(index)?,
        })
    }
}

fn build_levels(leaves: &[Vec<u8>]) -> Vec<Vec<Digest>> {
    if leaves.is_empty() {
        return Vec::new();
    }

    let mut levels = vec![hash_leaf_level(leaves)];
    while levels.last().map_or(0, Vec::len) > 1 {
        let next = combine_level(levels.last().expect("level pushed above"));
        levels.push(next);
    }
    levels
}

fn hash_leaf_level(leaves: &[Vec<u8>]) -> Vec<Digest> {
    #[cfg(feature = "parallel")]
    if crate::utils::parallelism_enabled() {
        use rayon::prelude::*;
        let chunk = crate::utils::preferred_chunk_size(leaves.len());
        return leaves
            .par_iter()
            .with_min_len(chunk)
            .with_max_len(chunk)
            .map(|leaf| hash_leaf(leaf))
            .collect();
    }
    leaves.iter().map(|leaf| hash_leaf(leaf)).collect()
}

fn combine_level(current: &[Digest]) -> Vec<Digest> {
    let next_len = current.len().div_ceil(2);
    let combine = |index: usize| {
        let left = index * 2;
        if left + 1 < current.len() {
            hash_nodes(&current[left], &current[left + 1])
        } else {
            // Odd trailing node: promoted to the next level unchanged.
            current[left]
        }
    };

    #[cfg(feature = "parallel")]
    if crate::utils::parallelism_enabled() {
        use rayon::prelude::*;
        let chunk = crate::utils::preferred_chunk_size(next_len);
        return (0..next_len)
            .into_par_iter()
            .with_min_len(chunk)
            .with_max_len(chunk)
            .map(combine)
            .collect();
    }
    (0..next_len).map(combine).collect()
}
