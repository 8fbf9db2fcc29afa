use assert_matches::assert_matches;
use proptest::prelude::*;

use crate::{
    test_utils::{erasured_data, random_namespaced_data, random_square},
    *,
};

type Enmt = ErasuredNamespacedMerkleTree<Sha256Hasher>;

const SHARE_SIZE: usize = 64;

fn share_with_namespace(ns: [u8; NAMESPACE_SIZE], size: usize) -> Vec<u8> {
    let mut share = vec![0xab; size];
    share[..NAMESPACE_SIZE].copy_from_slice(&ns);
    share
}

fn small_config() -> SquareConfig {
    SquareConfig::default().with_share_size(SHARE_SIZE)
}

fn builder(width: usize) -> ExtendedDataSquareBuilder<ReedSolomonCodec, ErasuredNmtConstructor> {
    ExtendedDataSquareBuilder::new(ReedSolomonCodec::new(), ErasuredNmtConstructor::new(width))
        .with_config(small_config())
}

fn plain_root<'a>(shares: impl IntoIterator<Item = &'a Share>) -> NamespacedHash {
    let mut tree = NamespaceMerkleTree::<Sha256Hasher>::new();
    for share in shares {
        tree.push(share.as_bytes()).expect("sorted shares");
    }
    tree.root()
}

// ── ENMT push ────────────────────────────────────────────────────────

#[test]
fn test_push_erasured_data() {
    for (size, seed) in [(8, 1), (128, 2)] {
        let data = random_namespaced_data(size, 256, seed);
        let mut tree = Enmt::new(size);
        for (cell, leaf) in erasured_data(&data).iter().enumerate() {
            tree.push(leaf, SquareIndex::new(0, cell))
                .unwrap_or_else(|e| panic!("push {} of size {}: {}", cell, size, e));
        }
        assert_eq!(tree.len(), 2 * size);
        assert_eq!(tree.capacity(), 2 * size);
    }
}

#[test]
fn test_push_over_capacity() {
    // 16 shares of data and 16 of parity into a tree built for width 15.
    let leaves = erasured_data(&random_namespaced_data(16, 256, 3));
    assert_eq!(leaves.len(), 32);

    let mut tree = ErasuredNmtConstructor::new(15).construct();
    for (cell, leaf) in leaves.iter().enumerate() {
        let result = tree.push(leaf, SquareIndex::new(0, cell));
        if cell < 30 {
            result.expect("within capacity");
        } else {
            assert_matches!(result, Err(Error::CapacityExceeded { capacity: 30 }));
            break;
        }
    }
    assert_eq!(tree.len(), 30);
}

#[test]
fn test_push_in_reverse_order_fails() {
    let mut data = random_namespaced_data(8, 256, 4);
    data.reverse();

    let mut tree = Enmt::new(8);
    tree.push(&data[0], SquareIndex::new(0, 0)).unwrap();
    assert_matches!(
        tree.push(&data[1], SquareIndex::new(0, 1)),
        Err(Error::OrderViolation { cell: 1, previous, current }) if current < previous
    );
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_push_out_of_range_index() {
    let share = share_with_namespace([1; NAMESPACE_SIZE], SHARE_SIZE);
    let mut tree = Enmt::new(4);
    assert_matches!(
        tree.push(&share, SquareIndex::new(8, 0)),
        Err(Error::IndexOutOfRange {
            axis: 8,
            cell: 0,
            width: 8
        })
    );
    assert_matches!(
        tree.push(&share, SquareIndex::new(0, 9)),
        Err(Error::IndexOutOfRange { cell: 9, .. })
    );
    assert!(tree.is_empty());
}

#[test]
fn test_huge_width_does_not_overflow() {
    let mut tree = Enmt::new(usize::MAX / 2 + 1);
    assert_eq!(tree.capacity(), usize::MAX);
    assert_eq!(tree.original_width(), usize::MAX / 2 + 1);

    let share = share_with_namespace([1; NAMESPACE_SIZE], SHARE_SIZE);
    tree.push(&share, SquareIndex::new(0, 0)).unwrap();
    assert_eq!(tree.namespaces(), &[NamespaceId([1; NAMESPACE_SIZE])]);
}

#[test]
fn test_capacity_checked_before_index() {
    let share = share_with_namespace([1; NAMESPACE_SIZE], SHARE_SIZE);
    let mut tree = Enmt::new(1);
    tree.push(&share, SquareIndex::new(0, 0)).unwrap();
    tree.push(&share, SquareIndex::new(0, 1)).unwrap();
    assert_matches!(
        tree.push(&share, SquareIndex::new(0, 7)),
        Err(Error::CapacityExceeded { capacity: 2 })
    );
}

#[test]
fn test_parity_cells_get_reserved_namespace() {
    let high = share_with_namespace([9; NAMESPACE_SIZE], SHARE_SIZE);
    let low = share_with_namespace([0; NAMESPACE_SIZE], SHARE_SIZE);

    // Row 0 of a width-2 square: cells 2 and 3 are parity, whatever their
    // bytes say.
    let mut row = Enmt::new(2);
    row.push(&high, SquareIndex::new(0, 0)).unwrap();
    row.push(&high, SquareIndex::new(0, 1)).unwrap();
    row.push(&low, SquareIndex::new(0, 2)).unwrap();
    row.push(&low, SquareIndex::new(0, 3)).unwrap();
    assert_eq!(
        row.namespaces(),
        &[
            NamespaceId([9; NAMESPACE_SIZE]),
            NamespaceId([9; NAMESPACE_SIZE]),
            PARITY_SHARES_NAMESPACE,
            PARITY_SHARES_NAMESPACE
        ]
    );

    // Row 2 lies in Q2/Q3: every cell is parity.
    let mut parity_row = Enmt::new(2);
    parity_row.push(&high, SquareIndex::new(2, 0)).unwrap();
    parity_row.push(&low, SquareIndex::new(2, 1)).unwrap();
    assert!(parity_row.namespaces().iter().all(|ns| *ns == PARITY_SHARES_NAMESPACE));
}

#[test]
fn test_original_share_cannot_use_parity_namespace() {
    let share = share_with_namespace([0xff; NAMESPACE_SIZE], SHARE_SIZE);
    let mut tree = Enmt::new(2);
    assert_matches!(
        tree.push(&share, SquareIndex::new(0, 0)),
        Err(Error::ReservedNamespace)
    );
    // The same bytes are fine in a parity cell.
    tree.push(&share, SquareIndex::new(0, 2)).unwrap();
}

#[test]
fn test_short_share_rejected() {
    let mut tree = Enmt::new(2);
    assert_matches!(
        tree.push(&[1, 2, 3], SquareIndex::new(0, 2)),
        Err(Error::ShareTooShort { len: 3 })
    );
}

// ── ENMT root ────────────────────────────────────────────────────────

#[test]
fn test_root_differs_from_plain_nmt() {
    let data = random_namespaced_data(8, 256, 5);

    let mut plain = NamespaceMerkleTree::<Sha256Hasher>::new();
    for leaf in &data {
        plain.push(leaf).unwrap();
    }

    let mut tree = Enmt::new(8);
    for (cell, leaf) in erasured_data(&data).iter().enumerate() {
        tree.push(leaf, SquareIndex::new(0, cell)).unwrap();
    }

    assert_ne!(plain.root(), tree.root());
}

#[test]
fn test_root_namespace_range_excludes_parity() {
    let data = random_namespaced_data(8, 256, 6);
    let mut tree = Enmt::new(8);
    for (cell, leaf) in erasured_data(&data).iter().enumerate() {
        tree.push(leaf, SquareIndex::new(0, cell)).unwrap();
    }
    let root = tree.root();
    assert_eq!(root.min_namespace(), NamespaceId::from_prefix(&data[0]).unwrap());
    assert_eq!(root.max_namespace(), NamespaceId::from_prefix(&data[7]).unwrap());
}

#[test]
fn test_root_is_deterministic() {
    let leaves = erasured_data(&random_namespaced_data(8, 256, 7));
    let build = || {
        let mut tree = Enmt::new(8);
        for (cell, leaf) in leaves.iter().enumerate() {
            tree.push(leaf, SquareIndex::new(3, cell)).unwrap();
        }
        tree.root()
    };
    assert_eq!(build(), build());
}

#[test]
fn test_underlying_tree_delegation() {
    let data = random_namespaced_data(4, SHARE_SIZE, 8);
    let mut tree = Enmt::new(4);
    for (cell, leaf) in erasured_data(&data).iter().enumerate() {
        tree.push(leaf, SquareIndex::new(0, cell)).unwrap();
    }

    assert_eq!(tree.tree().root(), tree.root());
    assert_eq!(tree.tree().len(), 8);
    // Each leaf is the assigned namespace followed by the whole share.
    let first = &tree.tree().leaves()[0];
    assert_eq!(&first[..NAMESPACE_SIZE], &data[0][..NAMESPACE_SIZE]);
    assert_eq!(&first[NAMESPACE_SIZE..], data[0].as_slice());
    let last = &tree.tree().leaves()[7];
    assert_eq!(&last[..NAMESPACE_SIZE], PARITY_SHARES_NAMESPACE.as_bytes());
}

#[test]
fn test_proofs_through_underlying_tree() {
    let data = random_namespaced_data(8, SHARE_SIZE, 9);
    let mut tree = Enmt::new(8);
    for (cell, leaf) in erasured_data(&data).iter().enumerate() {
        tree.push(leaf, SquareIndex::new(0, cell)).unwrap();
    }
    let root = tree.root();
    let leaves = tree.tree().leaves();

    let proof = tree.tree().prove_range(2, 5).unwrap();
    proof.verify::<Sha256Hasher, _>(&root, &leaves[2..5]).unwrap();

    let mut tampered = leaves[2..5].to_vec();
    tampered[1][NAMESPACE_SIZE + 10] ^= 1;
    assert_matches!(
        proof.verify::<Sha256Hasher, _>(&root, &tampered),
        Err(NmtError::InvalidProof(_))
    );

    let namespace = NamespaceId::from_prefix(&data[3]).unwrap();
    let proof = tree.tree().prove_namespace(namespace).unwrap();
    let start = proof.start as usize;
    let end = proof.end as usize;
    proof
        .verify_namespace::<Sha256Hasher, _>(&root, namespace, &leaves[start..end])
        .unwrap();
}

// ── constructors ─────────────────────────────────────────────────────

#[test]
fn test_constructor_builds_independent_trees() {
    let constructor = ErasuredNmtConstructor::new(4);
    let mut a = constructor.construct();
    let b = constructor.construct();
    a.push(&share_with_namespace([1; NAMESPACE_SIZE], SHARE_SIZE), SquareIndex::new(0, 0))
        .unwrap();
    assert_eq!(a.len(), 1);
    assert!(b.is_empty());
    assert_eq!(b.capacity(), 8);
    assert_eq!(b.original_width(), 4);
}

#[test]
fn test_closure_as_constructor() {
    let shares = random_square(2, SHARE_SIZE, 10);
    let blake = ExtendedDataSquareBuilder::new(ReedSolomonCodec::new(), || {
        ErasuredNamespacedMerkleTree::<Blake3Hasher>::new(2)
    })
    .with_config(small_config())
    .build(shares.clone())
    .unwrap();
    let sha = builder(2).build(shares).unwrap();

    assert_eq!(blake.row_roots().len(), 4);
    assert_ne!(blake.row_roots(), sha.row_roots());
}

// ── extended data square ─────────────────────────────────────────────

#[test]
fn test_extended_data_square_4x4() {
    let shares = random_square(4, DEFAULT_SHARE_SIZE, 11);
    let eds = extend_square(shares.clone()).unwrap();

    assert_eq!(eds.width(), 8);
    assert_eq!(eds.original_width(), 4);
    assert_eq!(eds.row_roots().len(), 8);
    assert_eq!(eds.col_roots().len(), 8);
    assert_eq!(eds.original_shares(), shares.iter().collect::<Vec<_>>());

    let again = extend_square(shares).unwrap();
    assert_eq!(eds.row_roots(), again.row_roots());
    assert_eq!(eds.col_roots(), again.col_roots());

    for i in 0..4 {
        let row = eds.row(i).unwrap();
        assert_ne!(eds.row_roots()[i], plain_root(&row[..4]));
        let col = eds.column(i).unwrap();
        assert_ne!(eds.col_roots()[i], plain_root(col[..4].iter().copied()));
    }
    for i in 4..8 {
        for root in [eds.row_roots()[i], eds.col_roots()[i]] {
            assert_eq!(root.min_namespace(), PARITY_SHARES_NAMESPACE);
            assert_eq!(root.max_namespace(), PARITY_SHARES_NAMESPACE);
        }
    }
}

#[test]
fn test_quadrants_are_codewords() {
    let eds = builder(4).build(random_square(4, SHARE_SIZE, 12)).unwrap();

    let encode = |shares: Vec<&Share>| {
        let data: Vec<&[u8]> = shares[..4].iter().map(|s| s.as_bytes()).collect();
        let parity = ReedSolomonCodec.encode(&data).unwrap();
        let expected: Vec<&[u8]> = shares[4..].iter().map(|s| s.as_bytes()).collect();
        assert_eq!(parity.iter().map(Vec::as_slice).collect::<Vec<_>>(), expected);
    };
    // Q3 was produced from the rows of Q2, so the columns of Q1 must
    // extend into it as well.
    for i in 0..8 {
        encode(eds.row(i).unwrap().iter().collect());
        encode(eds.column(i).unwrap());
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let shares = random_square(8, SHARE_SIZE, 13);
    let build = |parallel| {
        builder(8)
            .with_config(small_config().with_parallel(parallel))
            .build(shares.clone())
            .unwrap()
    };
    let parallel = build(true);
    let sequential = build(false);
    assert_eq!(parallel.flattened(), sequential.flattened());
    assert_eq!(parallel.roots(Axis::Row), sequential.roots(Axis::Row));
    assert_eq!(parallel.roots(Axis::Col), sequential.roots(Axis::Col));
    assert_eq!(parallel.data_root(), sequential.data_root());
}

#[test]
fn test_cell_accessors() {
    let eds = extend_square(random_square(2, DEFAULT_SHARE_SIZE, 14)).unwrap();
    assert_eq!(eds.flattened().len(), 16);
    assert_eq!(eds.cell(1, 3), Some(&eds.flattened()[7]));
    assert_eq!(eds.cell(4, 0), None);
    assert!(eds.row(4).is_none());
    assert!(eds.column(4).is_none());
    assert_eq!(eds.column(1).unwrap()[2], eds.cell(2, 1).unwrap());
}

#[test]
fn test_data_root_commits_to_every_share() {
    let mut shares = random_square(4, DEFAULT_SHARE_SIZE, 15);
    let before = extend_square(shares.clone()).unwrap().data_root();
    assert_eq!(before, extend_square(shares.clone()).unwrap().data_root());

    let mut bytes = shares[5].as_bytes().to_vec();
    bytes[100] ^= 0x01;
    shares[5] = Share::new(bytes).unwrap();
    assert_ne!(before, extend_square(shares).unwrap().data_root());
}

#[test]
fn test_import_recomputes_roots() {
    let eds = extend_square(random_square(4, DEFAULT_SHARE_SIZE, 16)).unwrap();
    let constructor = ErasuredNmtConstructor::new(4);
    for parallel in [true, false] {
        let config = SquareConfig::default().with_parallel(parallel);
        let imported =
            ExtendedDataSquare::import(eds.flattened().to_vec(), &constructor, &config).unwrap();
        assert_eq!(imported.original_width(), 4);
        assert_eq!(imported.row_roots(), eds.row_roots());
        assert_eq!(imported.col_roots(), eds.col_roots());
        assert_eq!(imported.data_root(), eds.data_root());
    }

    let odd = random_square(3, SHARE_SIZE, 17);
    assert_matches!(
        ExtendedDataSquare::import(odd, &ErasuredNmtConstructor::new(1), &small_config()),
        Err(Error::InvalidSquareSize { shares: 9 })
    );
}

#[test]
fn test_import_checks_config_and_tree_size() {
    let eds = builder(2).build(random_square(2, SHARE_SIZE, 25)).unwrap();
    let shares = eds.flattened().to_vec();

    assert_matches!(
        ExtendedDataSquare::import(
            shares.clone(),
            &ErasuredNmtConstructor::new(2),
            &SquareConfig::default()
        ),
        Err(Error::UnevenShares {
            position: 0,
            expected: DEFAULT_SHARE_SIZE,
            found: SHARE_SIZE
        })
    );
    assert_matches!(
        ExtendedDataSquare::import(shares.clone(), &ErasuredNmtConstructor::new(3), &small_config()),
        Err(Error::TreeSizeMismatch {
            expected: 4,
            capacity: 6
        })
    );
    let narrow = SquareConfig {
        max_original_width: 1,
        ..small_config()
    };
    assert_matches!(
        ExtendedDataSquare::import(shares, &ErasuredNmtConstructor::new(2), &narrow),
        Err(Error::TooManyShares { width: 2, max: 1 })
    );
}

// ── build failures ───────────────────────────────────────────────────

#[test]
fn test_build_rejects_non_square_input() {
    let shares = random_square(4, DEFAULT_SHARE_SIZE, 18);
    assert_matches!(
        extend_square(shares[..15].to_vec()),
        Err(Error::InvalidSquareSize { shares: 15 })
    );
    assert_matches!(
        extend_square(Vec::new()),
        Err(Error::InvalidSquareSize { shares: 0 })
    );
}

#[test]
fn test_build_rejects_too_wide_square() {
    let config = SquareConfig {
        max_original_width: 2,
        ..small_config()
    };
    let result = builder(3)
        .with_config(config)
        .build(random_square(3, SHARE_SIZE, 19));
    assert_matches!(result, Err(Error::TooManyShares { width: 3, max: 2 }));
}

#[test]
fn test_build_rejects_uneven_shares() {
    let mut shares = random_square(2, SHARE_SIZE, 20);
    shares[3] = Share::new(vec![1u8; SHARE_SIZE - 1]).unwrap();
    let result = builder(2).build(shares);
    assert_matches!(
        result,
        Err(Error::UnevenShares {
            position: 3,
            expected: SHARE_SIZE,
            found
        }) if found == SHARE_SIZE - 1
    );
}

#[test]
fn test_build_rejects_reserved_namespace() {
    let mut shares = random_square(2, SHARE_SIZE, 21);
    shares[3] = Share::new(share_with_namespace([0xff; NAMESPACE_SIZE], SHARE_SIZE)).unwrap();
    let result = builder(2).build(shares);
    assert_matches!(result, Err(Error::ReservedNamespace));
}

#[test]
fn test_build_aborts_on_unsorted_axis() {
    let mut shares = random_square(2, SHARE_SIZE, 22);
    shares.swap(0, 1);
    let result = builder(2).build(shares);
    assert_matches!(result, Err(Error::OrderViolation { cell: 1, .. }));
}

#[test]
fn test_build_rejects_trees_sized_for_a_smaller_square() {
    let result = builder(1).build(random_square(2, SHARE_SIZE, 23));
    assert_matches!(
        result,
        Err(Error::TreeSizeMismatch {
            expected: 4,
            capacity: 2
        })
    );
}

#[test]
fn test_build_rejects_trees_sized_for_a_larger_square() {
    // A width-2 tree would treat every cell of a width-1 square as
    // original data and commit parity under codec bytes.
    for parallel in [true, false] {
        let result = builder(2)
            .with_config(small_config().with_parallel(parallel))
            .build(random_square(1, SHARE_SIZE, 99));
        assert_matches!(
            result,
            Err(Error::TreeSizeMismatch {
                expected: 2,
                capacity: 4
            })
        );
    }
}

#[test]
fn test_closure_constructor_width_is_checked() {
    let result = compute_extended_data_square(
        random_square(2, DEFAULT_SHARE_SIZE, 26),
        ReedSolomonCodec::new(),
        || ErasuredNamespacedMerkleTree::<Sha256Hasher>::new(4),
    );
    assert_matches!(
        result,
        Err(Error::TreeSizeMismatch {
            expected: 4,
            capacity: 8
        })
    );
}

struct FailingCodec;

impl Codec for FailingCodec {
    fn encode(&self, _data: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
        Err(Error::Codec("unavailable".into()))
    }

    fn max_chunks(&self) -> usize {
        128
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[test]
fn test_codec_failure_propagates() {
    let result = compute_extended_data_square(
        random_square(2, DEFAULT_SHARE_SIZE, 24),
        FailingCodec,
        ErasuredNmtConstructor::new(2),
    );
    assert_matches!(result, Err(Error::Codec(msg)) if msg == "unavailable");
}

// ── properties ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_tree_accepts_exactly_twice_original_width(width in 1usize..32, extra in 1usize..4) {
        let share = share_with_namespace([1; NAMESPACE_SIZE], SHARE_SIZE);
        let mut tree = Enmt::new(width);
        for cell in 0..2 * width {
            prop_assert!(tree.push(&share, SquareIndex::new(0, cell)).is_ok());
        }
        for cell in 0..extra {
            prop_assert_eq!(
                tree.push(&share, SquareIndex::new(0, cell)),
                Err(Error::CapacityExceeded { capacity: 2 * width })
            );
        }
        prop_assert_eq!(tree.len(), 2 * width);
    }

    #[test]
    fn prop_descending_namespaces_rejected(a in 0u8..0xff, b in 0u8..0xff) {
        prop_assume!(a != b);
        let (high, low) = (a.max(b), a.min(b));
        let mut tree = Enmt::new(2);
        tree.push(&share_with_namespace([high; NAMESPACE_SIZE], SHARE_SIZE), SquareIndex::new(0, 0)).unwrap();
        let result = tree.push(&share_with_namespace([low; NAMESPACE_SIZE], SHARE_SIZE), SquareIndex::new(0, 1));
        prop_assert!(
            matches!(result, Err(Error::OrderViolation { cell: 1, .. })),
            "unexpected result: {:?}",
            result
        );
    }
}
