use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::order::{Order, OrderUpdate};
use super::order_repository::{OrderRepository, PersistenceError, UpdateOutcome};

/// Order store held in process memory. Identifiers start at 1.
pub struct InMemoryOrderRepository {
    orders: RwLock<BTreeMap<i64, Order>>,
    next_id: AtomicI64,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: &Order) -> Result<i64, PersistenceError> {
        let order_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Order::restore(
            order_id,
            order.customer_id,
            order.created_at,
            order.shipped_at,
            order.delivered_at,
            order.line_items.clone(),
        );

        self.orders.write().await.insert(order_id, stored);
        Ok(order_id)
    }

    async fn find_all(&self) -> Result<Vec<Order>, PersistenceError> {
        Ok(self.orders.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>, PersistenceError> {
        Ok(self.orders.read().await.get(&order_id).cloned())
    }

    async fn update(
        &self,
        order_id: i64,
        update: &OrderUpdate,
    ) -> Result<UpdateOutcome, PersistenceError> {
        // Held across read, validate and write
        let mut orders = self.orders.write().await;

        let Some(stored) = orders.get_mut(&order_id) else {
            return Ok(UpdateOutcome::NotFound);
        };

        match stored.apply(update) {
            Ok(()) => Ok(UpdateOutcome::Updated(stored.clone())),
            Err(e) => Ok(UpdateOutcome::Rejected(e)),
        }
    }

    async fn delete_by_id(&self, order_id: i64) -> Result<bool, PersistenceError> {
        Ok(self.orders.write().await.remove(&order_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{LineItem, OrderError};
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn sample_order() -> Order {
        Order::new(Uuid::new_v4(), vec![LineItem::new("sku-123", 2)])
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryOrderRepository::new();

        let first = repo.insert(&sample_order()).await.unwrap();
        let second = repo.insert(&sample_order()).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_identical_inserts_are_not_deduplicated() {
        let repo = InMemoryOrderRepository::new();
        let order = sample_order();

        let first = repo.insert(&order).await.unwrap();
        let second = repo.insert(&order).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_id_returns_stored_copy() {
        let repo = InMemoryOrderRepository::new();
        let order = sample_order();

        let id = repo.insert(&order).await.unwrap();
        let stored = repo.find_by_id(id).await.unwrap().unwrap();

        assert_eq!(stored.order_id(), id);
        assert_eq!(stored.line_items, order.line_items);
        assert!(repo.find_by_id(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_writes_timestamps() {
        let repo = InMemoryOrderRepository::new();
        let id = repo.insert(&sample_order()).await.unwrap();
        let shipped = Utc::now();

        let outcome = repo
            .update(id, &OrderUpdate { shipped_at: Some(shipped), delivered_at: None })
            .await
            .unwrap();

        assert!(matches!(outcome, UpdateOutcome::Updated(ref order) if order.shipped_at == Some(shipped)));
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().shipped_at, Some(shipped));
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_order_unchanged() {
        let repo = InMemoryOrderRepository::new();
        let id = repo.insert(&sample_order()).await.unwrap();

        let outcome = repo
            .update(id, &OrderUpdate { shipped_at: None, delivered_at: Some(Utc::now()) })
            .await
            .unwrap();

        assert!(matches!(outcome, UpdateOutcome::Rejected(OrderError::NotShipped)));
        assert!(repo.find_by_id(id).await.unwrap().unwrap().delivered_at.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_updates_do_not_lose_writes() {
        let repo = InMemoryOrderRepository::new();
        let id = repo.insert(&sample_order()).await.unwrap();
        let at = |s: &str| Some(s.parse::<DateTime<Utc>>().unwrap());

        let first = OrderUpdate {
            shipped_at: at("2022-01-02T12:00:00Z"),
            delivered_at: at("2022-01-03T12:00:00Z"),
        };
        let second = OrderUpdate {
            shipped_at: at("2022-01-04T12:00:00Z"),
            delivered_at: None,
        };

        let (a, b) = tokio::join!(repo.update(id, &first), repo.update(id, &second));
        let stored = repo.find_by_id(id).await.unwrap().unwrap();

        // Whichever ran second validated against the first one's write
        assert!(stored.validate().is_ok());
        let updated: Vec<Order> = [a.unwrap(), b.unwrap()]
            .into_iter()
            .filter_map(|outcome| match outcome {
                UpdateOutcome::Updated(order) => Some(order),
                _ => None,
            })
            .collect();
        assert!(updated.contains(&stored));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_order() {
        let repo = InMemoryOrderRepository::new();

        let outcome = repo.update(9, &OrderUpdate::default()).await.unwrap();
        assert!(matches!(outcome, UpdateOutcome::NotFound));
        assert!(!repo.delete_by_id(9).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_order() {
        let repo = InMemoryOrderRepository::new();
        let id = repo.insert(&sample_order()).await.unwrap();

        assert!(repo.delete_by_id(id).await.unwrap());
        assert_eq!(repo.len().await, 0);
    }
}
