// ============================================================================
// Order Persistence
// ============================================================================
//
// One trait, two implementations:
// - PostgresOrderRepository  - sqlx over a PgPool (production)
// - InMemoryOrderRepository  - BTreeMap behind a tokio RwLock (tests)
//
// ============================================================================

pub mod order_repository;
pub mod postgres;
#[cfg(test)]
pub mod in_memory;
#[cfg(test)]
pub mod failing;

pub use order_repository::{OrderRepository, PersistenceError, UpdateOutcome};
pub use postgres::PostgresOrderRepository;
#[cfg(test)]
pub use in_memory::InMemoryOrderRepository;
#[cfg(test)]
pub use failing::FailingOrderRepository;
