use async_trait::async_trait;
use std::time::Duration;

use crate::domain::order::{Order, OrderError, OrderUpdate};

// ============================================================================
// Order Repository - Persistence Port
// ============================================================================
//
// The HTTP layer only sees this trait. Production wires the Postgres
// implementation, tests wire the in-memory one.
//
// Inserts are NOT idempotent: calling insert twice with the same order stores
// two orders with two identifiers.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("repository call timed out after {0:?}")]
    Timeout(Duration),
}

/// Result of applying an update to a stored order
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(Order),
    NotFound,
    Rejected(OrderError),
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order and its line items, returning the generated identifier
    async fn insert(&self, order: &Order) -> Result<i64, PersistenceError>;

    /// All orders, ascending by identifier
    async fn find_all(&self) -> Result<Vec<Order>, PersistenceError>;

    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>, PersistenceError>;

    /// Read, validate and write one order as a single step, so concurrent
    /// updates to the same order are serialized and never validate a stale copy.
    async fn update(
        &self,
        order_id: i64,
        update: &OrderUpdate,
    ) -> Result<UpdateOutcome, PersistenceError>;

    /// Returns false if no such order exists
    async fn delete_by_id(&self, order_id: i64) -> Result<bool, PersistenceError>;
}
