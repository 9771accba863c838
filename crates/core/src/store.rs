//! In-memory registry of per-token buyer sets.

use crate::{TokenId, WalletAddress};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Early buyers observed for one token at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerSet {
    token: TokenId,
    wallets: HashSet<WalletAddress>,
}

impl BuyerSet {
    /// Build a set from scan results. Duplicate addresses collapse.
    pub fn new(token: TokenId, wallets: impl IntoIterator<Item = WalletAddress>) -> Self {
        Self {
            token,
            wallets: wallets.into_iter().collect(),
        }
    }

    pub fn token(&self) -> &TokenId {
        &self.token
    }

    pub fn wallets(&self) -> &HashSet<WalletAddress> {
        &self.wallets
    }

    pub fn contains(&self, wallet: &WalletAddress) -> bool {
        self.wallets.contains(wallet)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

/// Bounds on how many scans the store keeps and for how long.
///
/// The default keeps every scan for the lifetime of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum number of tracked tokens. Recording a new token beyond this
    /// evicts the least recently recorded one.
    pub max_tokens: Option<usize>,
    /// Age after which a scan is no longer considered.
    pub ttl: Option<Duration>,
}

impl RetentionPolicy {
    /// Keep everything forever.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens.max(1));
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

#[derive(Debug)]
struct Entry {
    set: BuyerSet,
    seq: u64,
    recorded_at: Instant,
}

/// Process-wide map from token to its latest buyer set.
///
/// Each `record` replaces the whole set for a token in one map insert, so
/// readers never observe a partially written set.
#[derive(Debug, Default)]
pub struct OverlapStore {
    entries: DashMap<TokenId, Entry>,
    policy: RetentionPolicy,
    next_seq: AtomicU64,
}

impl OverlapStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a retention policy.
    pub fn with_policy(policy: RetentionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Insert or replace the buyer set for `token`.
    pub fn record(&self, token: TokenId, buyers: impl IntoIterator<Item = WalletAddress>) {
        self.prune_expired();

        if let Some(max) = self.policy.max_tokens {
            if !self.entries.contains_key(&token) {
                while self.entries.len() >= max {
                    if !self.evict_oldest() {
                        break;
                    }
                }
            }
        }

        let entry = Entry {
            set: BuyerSet::new(token.clone(), buyers),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            recorded_at: Instant::now(),
        };
        self.entries.insert(token, entry);
    }

    /// Snapshot of every live buyer set. Order is unspecified.
    pub fn all_sets(&self) -> Vec<BuyerSet> {
        self.entries
            .iter()
            .filter(|e| self.is_live(e.value()))
            .map(|e| e.value().set.clone())
            .collect()
    }

    /// Number of distinct tokens currently tracked.
    pub fn count(&self) -> usize {
        if self.policy.ttl.is_none() {
            return self.entries.len();
        }
        self.entries.iter().filter(|e| self.is_live(e.value())).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Tracked tokens, sorted.
    pub fn tokens(&self) -> Vec<TokenId> {
        let mut tokens: Vec<TokenId> = self
            .entries
            .iter()
            .filter(|e| self.is_live(e.value()))
            .map(|e| e.key().clone())
            .collect();
        tokens.sort();
        tokens
    }

    pub fn get(&self, token: &TokenId) -> Option<BuyerSet> {
        self.entries
            .get(token)
            .filter(|e| self.is_live(e.value()))
            .map(|e| e.value().set.clone())
    }

    /// Forget a token. Returns its last set if it was tracked.
    pub fn remove(&self, token: &TokenId) -> Option<BuyerSet> {
        self.entries.remove(token).map(|(_, e)| e.set)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    fn is_live(&self, entry: &Entry) -> bool {
        match self.policy.ttl {
            Some(ttl) => entry.recorded_at.elapsed() < ttl,
            None => true,
        }
    }

    fn prune_expired(&self) {
        if self.policy.ttl.is_some() {
            self.entries.retain(|_, e| self.is_live(e));
        }
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|e| e.value().seq)
            .map(|e| e.key().clone());

        match oldest {
            Some(token) => self.entries.remove(&token).is_some(),
            None => false,
        }
    }
}
