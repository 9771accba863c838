//! Wallet overlap across scanned tokens.

use crate::{CoreError, CoreResult, OverlapStore, WalletAddress};
use std::collections::BTreeSet;

/// Minimum number of scanned tokens for an overlap to mean anything.
pub const MIN_TOKENS_FOR_OVERLAP: usize = 2;

/// Wallets present in every scanned buyer set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    /// Common wallets, sorted for stable display.
    pub wallets: BTreeSet<WalletAddress>,
    /// Number of buyer sets intersected.
    pub tokens_compared: usize,
}

impl Overlap {
    /// True when the scans share no wallet at all.
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }
}

/// Intersect every buyer set currently in `store`.
///
/// Recomputed from a fresh snapshot on each call; the store is not modified.
pub fn compute_overlap(store: &OverlapStore) -> CoreResult<Overlap> {
    let mut sets = store.all_sets();
    if sets.len() < MIN_TOKENS_FOR_OVERLAP {
        return Err(CoreError::InsufficientData { tracked: sets.len() });
    }

    // Start from the smallest set so the retained set never grows.
    sets.sort_by_key(|s| s.len());
    let tokens_compared = sets.len();

    let mut common: BTreeSet<WalletAddress> = sets[0].wallets().iter().cloned().collect();
    for set in &sets[1..] {
        if common.is_empty() {
            break;
        }
        common.retain(|w| set.contains(w));
    }

    Ok(Overlap {
        wallets: common,
        tokens_compared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenId;
    use pretty_assertions::assert_eq;

    fn token(s: &str) -> TokenId {
        TokenId::new(s).unwrap()
    }

    fn wallets(items: &[&str]) -> Vec<WalletAddress> {
        items.iter().map(|w| WalletAddress::new(w).unwrap()).collect()
    }

    fn wallet_set(items: &[&str]) -> BTreeSet<WalletAddress> {
        wallets(items).into_iter().collect()
    }

    #[test]
    fn test_empty_store_is_insufficient() {
        let store = OverlapStore::new();
        assert_eq!(
            compute_overlap(&store),
            Err(CoreError::InsufficientData { tracked: 0 })
        );
    }

    #[test]
    fn test_single_token_is_insufficient() {
        let store = OverlapStore::new();
        store.record(token("A"), wallets(&["W1"]));
        assert_eq!(
            compute_overlap(&store),
            Err(CoreError::InsufficientData { tracked: 1 })
        );
    }

    #[test]
    fn test_two_token_intersection() {
        let store = OverlapStore::new();
        store.record(token("A"), wallets(&["W1", "W2", "W3"]));
        store.record(token("B"), wallets(&["W2", "W3", "W4"]));

        let overlap = compute_overlap(&store).unwrap();
        assert_eq!(overlap.wallets, wallet_set(&["W2", "W3"]));
        assert_eq!(overlap.tokens_compared, 2);
    }

    #[test]
    fn test_disjoint_sets_give_empty_result() {
        let store = OverlapStore::new();
        store.record(token("A"), wallets(&["W1"]));
        store.record(token("B"), wallets(&["W2"]));

        let overlap = compute_overlap(&store).unwrap();
        assert!(overlap.is_empty());
        assert_eq!(overlap.len(), 0);
    }

    #[test]
    fn test_rescan_uses_latest_set() {
        let store = OverlapStore::new();
        store.record(token("A"), wallets(&["W1", "W2"]));
        store.record(token("B"), wallets(&["W1", "W2", "W3"]));
        store.record(token("A"), wallets(&["W3"]));

        let overlap = compute_overlap(&store).unwrap();
        assert_eq!(overlap.wallets, wallet_set(&["W3"]));
    }

    #[test]
    fn test_intersection_spans_all_sets() {
        let store = OverlapStore::new();
        store.record(token("A"), wallets(&["W1", "W2", "W3", "W4"]));
        store.record(token("B"), wallets(&["W2", "W3", "W4"]));
        store.record(token("C"), wallets(&["W3", "W4", "W5"]));
        store.record(token("D"), wallets(&["W4", "W3", "W9"]));

        let overlap = compute_overlap(&store).unwrap();
        assert_eq!(overlap.wallets, wallet_set(&["W3", "W4"]));
        assert_eq!(overlap.tokens_compared, 4);
    }

    #[test]
    fn test_record_order_does_not_matter() {
        let scans = [
            ("A", vec!["W1", "W2", "W3"]),
            ("B", vec!["W2", "W3"]),
            ("C", vec!["W3", "W2", "W7"]),
        ];

        let forward = OverlapStore::new();
        for (t, w) in scans.iter() {
            forward.record(token(t), wallets(w));
        }
        let reverse = OverlapStore::new();
        for (t, w) in scans.iter().rev() {
            reverse.record(token(t), wallets(w));
        }

        assert_eq!(
            compute_overlap(&forward).unwrap(),
            compute_overlap(&reverse).unwrap()
        );
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let store = OverlapStore::new();
        store.record(token("A"), wallets(&["W1", "W2"]));
        store.record(token("B"), wallets(&["W2"]));

        let first = compute_overlap(&store).unwrap();
        let second = compute_overlap(&store).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_result_reflects_new_records() {
        let store = OverlapStore::new();
        store.record(token("A"), wallets(&["W1", "W2"]));
        store.record(token("B"), wallets(&["W1", "W2"]));
        assert_eq!(compute_overlap(&store).unwrap().len(), 2);

        store.record(token("C"), wallets(&["W2"]));
        assert_eq!(compute_overlap(&store).unwrap().wallets, wallet_set(&["W2"]));
    }

    #[test]
    fn test_membership_matches_every_set() {
        let store = OverlapStore::new();
        store.record(token("A"), wallets(&["W1", "W2", "W3", "W5"]));
        store.record(token("B"), wallets(&["W2", "W3", "W5", "W6"]));
        store.record(token("C"), wallets(&["W5", "W3", "W8"]));

        let overlap = compute_overlap(&store).unwrap();
        let sets = store.all_sets();
        for candidate in wallets(&["W1", "W2", "W3", "W5", "W6", "W8", "W9"]) {
            let in_all = sets.iter().all(|s| s.contains(&candidate));
            assert_eq!(overlap.wallets.contains(&candidate), in_all, "{}", candidate);
        }
    }
}
