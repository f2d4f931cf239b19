use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::order::{Order, OrderUpdate};
use super::order_repository::{OrderRepository, PersistenceError, UpdateOutcome};

/// Repository whose every call fails as if the pool were exhausted. Counts calls.
#[derive(Default)]
pub struct FailingOrderRepository {
    calls: AtomicUsize,
}

impl FailingOrderRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(PersistenceError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl OrderRepository for FailingOrderRepository {
    async fn insert(&self, _order: &Order) -> Result<i64, PersistenceError> {
        self.fail()
    }

    async fn find_all(&self) -> Result<Vec<Order>, PersistenceError> {
        self.fail()
    }

    async fn find_by_id(&self, _order_id: i64) -> Result<Option<Order>, PersistenceError> {
        self.fail()
    }

    async fn update(
        &self,
        _order_id: i64,
        _update: &OrderUpdate,
    ) -> Result<UpdateOutcome, PersistenceError> {
        self.fail()
    }

    async fn delete_by_id(&self, _order_id: i64) -> Result<bool, PersistenceError> {
        self.fail()
    }
}
