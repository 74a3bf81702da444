//! Pending state records for [`StateMode::Nonce`](super::StateMode::Nonce).

use crate::auth::oauth::StateParam;
use crate::auth::ShopDomain;
use moka::future::Cache;
use std::time::{Duration, Instant};

/// Upper bound on concurrently pending installs.
const MAX_PENDING: u64 = 10_000;

/// Short-lived, single-use mapping from issued nonces to the shop they were
/// issued for.
///
/// Records expire after the configured TTL and are removed on first lookup,
/// so a state can complete at most one install. Concurrent installs for
/// different shops use different keys and never contend.
///
/// # Capacity
///
/// At most `max_pending` records are held (default 10,000). Beyond
/// that the cache evicts records to make room, and an evicted install fails
/// its callback with `InvalidState`. A warning is logged once the store is
/// 90% full.
#[derive(Clone, Debug)]
pub struct StateStore {
    pending: Cache<String, (ShopDomain, Instant)>,
    ttl: Duration,
    warn_at: u64,
}

impl StateStore {
    /// Creates an empty store whose records live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_PENDING)
    }

    /// Creates an empty store holding at most `max_pending` records.
    #[must_use]
    pub fn with_capacity(ttl: Duration, max_pending: u64) -> Self {
        Self {
            pending: Cache::builder()
                .max_capacity(max_pending)
                .time_to_live(ttl)
                .build(),
            ttl,
            warn_at: max_pending - max_pending / 10,
        }
    }

    /// Records that `state` was issued for `shop`.
    pub async fn issue(&self, state: &StateParam, shop: &ShopDomain) {
        self.pending
            .insert(state.as_ref().to_string(), (shop.clone(), Instant::now()))
            .await;

        if self.is_near_capacity() {
            tracing::warn!(
                pending = self.pending.entry_count(),
                "Pending install store is near capacity; older installs may be evicted"
            );
        }
    }

    /// Returns `true` once the store is at least 90% full.
    ///
    /// The count is approximate until the cache runs its pending
    /// maintenance.
    #[must_use]
    pub fn is_near_capacity(&self) -> bool {
        self.pending.entry_count() >= self.warn_at
    }

    /// Consumes the record for `state`, returning the shop it was issued for.
    pub async fn take(&self, state: &StateParam) -> Option<ShopDomain> {
        // Eviction is lazy, so re-check the age of whatever was removed.
        let (shop, issued_at) = self.pending.remove(state.as_ref()).await?;
        (issued_at.elapsed() < self.ttl).then_some(shop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_take_returns_issued_shop_once() {
        let store = StateStore::new(Duration::from_secs(60));
        let shop = ShopDomain::parse("foo.myshopify.com").unwrap();
        let state = StateParam::nonce();

        store.issue(&state, &shop).await;

        assert_eq!(store.take(&state).await, Some(shop));
        assert_eq!(store.take(&state).await, None);
    }

    #[tokio::test]
    async fn test_unknown_state_is_absent() {
        let store = StateStore::new(Duration::from_secs(60));
        assert_eq!(store.take(&StateParam::from_raw("never-issued")).await, None);
    }

    #[tokio::test]
    async fn test_reports_when_near_capacity() {
        let store = StateStore::with_capacity(Duration::from_secs(60), 10);
        let shop = ShopDomain::parse("foo.myshopify.com").unwrap();

        for _ in 0..8 {
            store.issue(&StateParam::nonce(), &shop).await;
        }
        store.pending.run_pending_tasks().await;
        assert!(!store.is_near_capacity());

        store.issue(&StateParam::nonce(), &shop).await;
        store.pending.run_pending_tasks().await;
        assert!(store.is_near_capacity());
    }

    #[tokio::test]
    async fn test_records_expire() {
        let store = StateStore::new(Duration::from_millis(50));
        let shop = ShopDomain::parse("foo.myshopify.com").unwrap();
        let state = StateParam::nonce();

        store.issue(&state, &shop).await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.take(&state).await, None);
    }
}
