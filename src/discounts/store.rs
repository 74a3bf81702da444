//! Discount storage backends.

use super::{Discount, DiscountError, NewDiscount};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Storage for discounts.
///
/// Implementations must be safe to share across request tasks.
#[async_trait]
pub trait DiscountStore: Send + Sync {
    /// Stores `discount` and returns it with its assigned id.
    async fn create(&self, discount: NewDiscount) -> Result<Discount, DiscountError>;

    /// Returns all discounts in creation order.
    async fn list(&self) -> Result<Vec<Discount>, DiscountError>;

    /// Removes the discount with `id`. Returns whether one was removed;
    /// deleting an unknown id is not an error.
    async fn delete(&self, id: u64) -> Result<bool, DiscountError>;
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    discounts: Vec<Discount>,
}

/// A process-local [`DiscountStore`]. Contents are lost on restart.
///
/// Ids start at 1 and are never reused, even after deletes.
#[derive(Debug, Default)]
pub struct InMemoryDiscountStore {
    inner: RwLock<Inner>,
}

impl InMemoryDiscountStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiscountStore for InMemoryDiscountStore {
    async fn create(&self, discount: NewDiscount) -> Result<Discount, DiscountError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let discount = discount.into_discount(inner.next_id);
        inner.discounts.push(discount.clone());
        Ok(discount)
    }

    async fn list(&self) -> Result<Vec<Discount>, DiscountError> {
        Ok(self.inner.read().await.discounts.clone())
    }

    async fn delete(&self, id: u64) -> Result<bool, DiscountError> {
        let mut inner = self.inner.write().await;
        let before = inner.discounts.len();
        inner.discounts.retain(|d| d.id != id);
        Ok(inner.discounts.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discounts::DiscountKind;
    use chrono::Utc;

    fn new_discount(code: &str) -> NewDiscount {
        let now = Utc::now();
        NewDiscount {
            code: code.to_string(),
            amount: 10.0,
            kind: DiscountKind::Percentage,
            start_date: now,
            end_date: now,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryDiscountStore::new();

        let first = store.create(new_discount("A")).await.unwrap();
        let second = store.create(new_discount("B")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.code, "B");
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let store = InMemoryDiscountStore::new();
        for code in ["A", "B", "C"] {
            store.create(new_discount(code)).await.unwrap();
        }

        let codes: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(codes, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryDiscountStore::new();
        let created = store.create(new_discount("A")).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(!store.delete(999).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryDiscountStore::new();
        let first = store.create(new_discount("A")).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create(new_discount("B")).await.unwrap();
        assert_eq!(second.id, 2);
    }
}
