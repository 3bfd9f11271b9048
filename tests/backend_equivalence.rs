use proptest::prelude::*;
use sm3_merkle::{Sm3Core, Sm3Optimized};

#[test]
fn edge_size_corpus() {
    // Sizes straddling every padding regime, up to a megabyte.
    for len in [0usize, 1, 55, 56, 63, 64, 65, 1000, 1_000_000] {
        let message: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
        assert_eq!(
            Sm3Core::hash(&message),
            Sm3Optimized::hash(&message),
            "len {}",
            len
        );
    }
}

proptest! {
    #[test]
    fn scheduled_backend_matches_reference(message in proptest::collection::vec(any::<u8>(), 0..2048)) {
        prop_assert_eq!(Sm3Core::hash(&message), Sm3Optimized::hash(&message));
    }

    #[test]
    fn split_updates_match_one_shot(
        message in proptest::collection::vec(any::<u8>(), 0..512),
        split in any::<prop::sample::Index>(),
    ) {
        let at = split.index(message.len() + 1);
        let mut hasher = Sm3Optimized::new();
        hasher.update(&message[..at]);
        hasher.update(&message[at..]);
        prop_assert_eq!(hasher.finalize(), Sm3Optimized::hash(&message));
    }
}
