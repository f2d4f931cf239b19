use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::order::{LineItem, Order, OrderUpdate};
use super::order_repository::{OrderRepository, PersistenceError, UpdateOutcome};

// ============================================================================
// Postgres Order Repository
// ============================================================================
//
// Tables (created by db::migrate):
// - orders      (order_id BIGSERIAL, customer_id, created_at, shipped_at, delivered_at)
// - line_items  (order_id -> orders ON DELETE CASCADE, position, sku, quantity)
//
// An insert writes the order row and all line item rows in one transaction,
// the line items in a single UNNEST statement. An update locks the order row
// (SELECT ... FOR UPDATE) before validating, so concurrent updates serialize.
// If the caller drops the future before commit, the transaction is rolled
// back when it is dropped.
//
// ============================================================================

type OrderRow = (i64, Uuid, DateTime<Utc>, Option<DateTime<Utc>>, Option<DateTime<Utc>>);

const SELECT_ORDERS: &str =
    "SELECT order_id, customer_id, created_at, shipped_at, delivered_at FROM orders";

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load line items for the given orders, keyed by order id and kept in position order
    async fn load_line_items(
        &self,
        order_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<LineItem>>, PersistenceError> {
        let rows: Vec<(i64, String, i32)> = sqlx::query_as(
            "SELECT order_id, sku, quantity FROM line_items
             WHERE order_id = ANY($1)
             ORDER BY order_id, position",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items: HashMap<i64, Vec<LineItem>> = HashMap::new();
        for (order_id, sku, quantity) in rows {
            items.entry(order_id).or_default().push(LineItem { sku, quantity });
        }

        Ok(items)
    }

    async fn assemble(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, PersistenceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.0).collect();
        let mut items = self.load_line_items(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|(order_id, customer_id, created_at, shipped_at, delivered_at)| {
                Order::restore(
                    order_id,
                    customer_id,
                    created_at,
                    shipped_at,
                    delivered_at,
                    items.remove(&order_id).unwrap_or_default(),
                )
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: &Order) -> Result<i64, PersistenceError> {
        let mut tx = self.pool.begin().await?;

        let (order_id,): (i64,) = sqlx::query_as(
            "INSERT INTO orders (customer_id, created_at, shipped_at, delivered_at)
             VALUES ($1, $2, $3, $4)
             RETURNING order_id",
        )
        .bind(order.customer_id)
        .bind(order.created_at)
        .bind(order.shipped_at)
        .bind(order.delivered_at)
        .fetch_one(&mut *tx)
        .await?;

        let positions: Vec<i32> = (0..order.line_items.len() as i32).collect();
        let skus: Vec<String> = order.line_items.iter().map(|item| item.sku.clone()).collect();
        let quantities: Vec<i32> = order.line_items.iter().map(|item| item.quantity).collect();

        sqlx::query(
            "INSERT INTO line_items (order_id, position, sku, quantity)
             SELECT $1, item.position, item.sku, item.quantity
             FROM UNNEST($2::int[], $3::text[], $4::int[]) AS item(position, sku, quantity)",
        )
        .bind(order_id)
        .bind(positions)
        .bind(skus)
        .bind(quantities)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            order_id = order_id,
            line_item_count = order.line_items.len(),
            "Inserted order rows"
        );

        Ok(order_id)
    }

    async fn find_all(&self) -> Result<Vec<Order>, PersistenceError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!("{SELECT_ORDERS} ORDER BY order_id"))
            .fetch_all(&self.pool)
            .await?;

        self.assemble(rows).await
    }

    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>, PersistenceError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{SELECT_ORDERS} WHERE order_id = $1"))
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        order_id: i64,
        update: &OrderUpdate,
    ) -> Result<UpdateOutcome, PersistenceError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{SELECT_ORDERS} WHERE order_id = $1 FOR UPDATE"))
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((order_id, customer_id, created_at, shipped_at, delivered_at)) = row else {
            return Ok(UpdateOutcome::NotFound);
        };

        let items: Vec<(String, i32)> = sqlx::query_as(
            "SELECT sku, quantity FROM line_items WHERE order_id = $1 ORDER BY position",
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut order = Order::restore(
            order_id,
            customer_id,
            created_at,
            shipped_at,
            delivered_at,
            items
                .into_iter()
                .map(|(sku, quantity)| LineItem { sku, quantity })
                .collect(),
        );

        if let Err(e) = order.apply(update) {
            // Dropping tx releases the row lock
            return Ok(UpdateOutcome::Rejected(e));
        }

        sqlx::query("UPDATE orders SET shipped_at = $2, delivered_at = $3 WHERE order_id = $1")
            .bind(order_id)
            .bind(order.shipped_at)
            .bind(order.delivered_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(UpdateOutcome::Updated(order))
    }

    async fn delete_by_id(&self, order_id: i64) -> Result<bool, PersistenceError> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Integration Tests
// ============================================================================
//
// These need a live Postgres. Run with:
//   DATABASE_URL=postgres://... cargo test -- --ignored
//
// ============================================================================
