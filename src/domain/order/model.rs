use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::errors::OrderError;
use super::value_objects::LineItem;

// ============================================================================
// Order - Domain Model
// ============================================================================
//
// An order owns its line items. The identifier is assigned by the store on
// insert and is zero until then; once assigned it never changes.
//
// ============================================================================

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Order {
    order_id: i64,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(rename = "lineitems")]
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Unsaved order created now
    pub fn new(customer_id: Uuid, line_items: Vec<LineItem>) -> Self {
        Self {
            order_id: 0,
            customer_id,
            created_at: Utc::now(),
            shipped_at: None,
            delivered_at: None,
            line_items,
        }
    }

    /// Rebuild a stored order from its persisted columns
    pub(crate) fn restore(
        order_id: i64,
        customer_id: Uuid,
        created_at: DateTime<Utc>,
        shipped_at: Option<DateTime<Utc>>,
        delivered_at: Option<DateTime<Utc>>,
        line_items: Vec<LineItem>,
    ) -> Self {
        Self {
            order_id,
            customer_id,
            created_at,
            shipped_at,
            delivered_at,
            line_items,
        }
    }

    pub fn order_id(&self) -> i64 {
        self.order_id
    }

    pub fn is_persisted(&self) -> bool {
        self.order_id != 0
    }

    /// Attach the store-generated identifier. Ignored if one is already set.
    pub fn with_id(mut self, order_id: i64) -> Self {
        if !self.is_persisted() {
            self.order_id = order_id;
        }
        self
    }

    /// Business rules an order must satisfy before it is written
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.line_items.is_empty() {
            return Err(OrderError::EmptyLineItems);
        }

        for item in &self.line_items {
            item.validate()?;
        }

        match (self.shipped_at, self.delivered_at) {
            (None, Some(_)) => Err(OrderError::NotShipped),
            (Some(shipped), Some(delivered)) if delivered < shipped => {
                Err(OrderError::DeliveredBeforeShipped)
            }
            _ => Ok(()),
        }
    }

    /// Apply a partial update, leaving the order untouched if the result is invalid
    pub fn apply(&mut self, update: &OrderUpdate) -> Result<(), OrderError> {
        let mut next = self.clone();
        if let Some(shipped_at) = update.shipped_at {
            next.shipped_at = Some(shipped_at);
        }
        if let Some(delivered_at) = update.delivered_at {
            next.delivered_at = Some(delivered_at);
        }

        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// Body of a create request
#[derive(Deserialize, Clone, Debug)]
pub struct NewOrder {
    pub customer_id: Uuid,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "lineitems")]
    pub line_items: Vec<LineItem>,
}

impl NewOrder {
    /// Validate and turn the request into an unsaved order
    pub fn into_order(self) -> Result<Order, OrderError> {
        let mut order = Order::new(self.customer_id, self.line_items);
        if let Some(created_at) = self.created_at {
            order.created_at = created_at;
        }

        order.validate()?;
        Ok(order)
    }
}

/// Body of an update request; absent fields are left as they are
#[derive(Deserialize, Clone, Debug, Default)]
pub struct OrderUpdate {
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Unit Tests
// ============================================================================
