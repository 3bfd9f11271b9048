use sm3_merkle::{verify_non_inclusion, MerkleError, MerkleTree, Neighbor, NonInclusionProof};

/// Sorted even-numbered keys, leaving odd keys as provable gaps.
fn sorted_tree(count: usize) -> (Vec<Vec<u8>>, MerkleTree) {
    let leaves: Vec<Vec<u8>> = (0..count)
        .map(|i| format!("key_{:08}", i * 2).into_bytes())
        .collect();
    let tree = MerkleTree::from_leaves(&leaves);
    (leaves, tree)
}

#[test]
fn interior_gaps_verify_as_absent() {
    let (_, tree) = sorted_tree(50);
    let root = tree.root();

    for i in 0..49usize {
        let absent = format!("key_{:08}", i * 2 + 1).into_bytes();
        let proof = tree.non_inclusion_proof(&absent).unwrap();

        let pred = proof.predecessor.as_ref().unwrap();
        let succ = proof.successor.as_ref().unwrap();
        assert_eq!(pred.index + 1, succ.index);
        assert!(verify_non_inclusion(&root, &absent, tree.leaf_count(), &proof).unwrap());
    }
}

#[test]
fn keys_outside_the_covered_range_verify_as_absent() {
    let (leaves, tree) = sorted_tree(13);
    let root = tree.root();

    let before = b"key_".to_vec();
    let proof = tree.non_inclusion_proof(&before).unwrap();
    assert!(proof.predecessor.is_none());
    assert_eq!(proof.successor.as_ref().unwrap().index, 0);
    assert!(verify_non_inclusion(&root, &before, tree.leaf_count(), &proof).unwrap());

    let after = b"key_99999999".to_vec();
    let proof = tree.non_inclusion_proof(&after).unwrap();
    assert!(proof.successor.is_none());
    assert_eq!(
        proof.predecessor.as_ref().unwrap().index,
        leaves.len() - 1
    );
    assert!(verify_non_inclusion(&root, &after, tree.leaf_count(), &proof).unwrap());
}

#[test]
fn present_keys_never_verify_as_absent() {
    let (leaves, tree) = sorted_tree(20);
    let root = tree.root();

    for leaf in &leaves {
        // Generation refuses outright.
        assert!(matches!(
            tree.non_inclusion_proof(leaf).unwrap_err(),
            MerkleError::KeyPresent { .. }
        ));
    }

    // A proof for a real gap re-targeted at a present key fails the
    // strict ordering checks.
    let gap = b"key_00000003".to_vec();
    let proof = tree.non_inclusion_proof(&gap).unwrap();
    for leaf in &leaves {
        assert!(!verify_non_inclusion(&root, leaf, tree.leaf_count(), &proof).unwrap());
    }
}

#[test]
fn non_adjacent_neighbors_fail_verification() {
    let (leaves, tree) = sorted_tree(10);
    let root = tree.root();
    let absent = b"key_00000005".to_vec();

    // Honest neighbors are 2 and 3; widen the bracket to 2 and 4.
    let pred = Neighbor {
        index: 2,
        leaf: leaves[2].clone(),
        proof: tree.inclusion_proof(2).unwrap(),
    };
    let succ = Neighbor {
        index: 4,
        leaf: leaves[4].clone(),
        proof: tree.inclusion_proof(4).unwrap(),
    };
    let widened = NonInclusionProof {
        predecessor: Some(pred),
        successor: Some(succ),
    };
    assert!(!verify_non_inclusion(&root, &absent, tree.leaf_count(), &widened).unwrap());
}

#[test]
fn lone_neighbor_must_sit_at_the_boundary() {
    let (leaves, tree) = sorted_tree(10);
    let root = tree.root();
    let absent = b"key_00000005".to_vec();

    // Claiming "after the last leaf" with an interior predecessor fails.
    let interior = NonInclusionProof {
        predecessor: Some(Neighbor {
            index: 2,
            leaf: leaves[2].clone(),
            proof: tree.inclusion_proof(2).unwrap(),
        }),
        successor: None,
    };
    assert!(!verify_non_inclusion(&root, &absent, tree.leaf_count(), &interior).unwrap());
}

#[test]
fn tampered_neighbor_proof_fails_verification() {
    let (_, tree) = sorted_tree(10);
    let root = tree.root();
    let absent = b"key_00000005".to_vec();

    let mut proof = tree.non_inclusion_proof(&absent).unwrap();
    let pred = proof.predecessor.as_mut().unwrap();
    let mut bytes = pred.proof.path[0].sibling.into_bytes();
    bytes[0] ^= 0x01;
    pred.proof.path[0].sibling = bytes.into();
    assert!(!verify_non_inclusion(&root, &absent, tree.leaf_count(), &proof).unwrap());
}

#[test]
fn shape_errors_for_degenerate_claims() {
    let (_, tree) = sorted_tree(10);
    let root = tree.root();
    let absent = b"key_00000005".to_vec();

    let hollow = NonInclusionProof {
        predecessor: None,
        successor: None,
    };
    assert!(matches!(
        verify_non_inclusion(&root, &absent, tree.leaf_count(), &hollow).unwrap_err(),
        MerkleError::MalformedProof { .. }
    ));

    let proof = tree.non_inclusion_proof(&absent).unwrap();
    assert_eq!(
        verify_non_inclusion(&root, &absent, 0, &proof).unwrap_err(),
        MerkleError::EmptyTree
    );
}

#[test]
fn large_sorted_tree_supports_absence_queries() {
    let (_, tree) = sorted_tree(10_000);
    let root = tree.root();

    for gap in [1usize, 999, 9_999, 19_997] {
        let absent = format!("key_{:08}", gap).into_bytes();
        let proof = tree.non_inclusion_proof(&absent).unwrap();
        assert!(verify_non_inclusion(&root, &absent, tree.leaf_count(), &proof).unwrap());
    }
}
