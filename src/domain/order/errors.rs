// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order must contain at least one line item")]
    EmptyLineItems,

    #[error("Line item sku cannot be empty")]
    EmptySku,

    #[error("Invalid quantity {quantity} for sku {sku}")]
    InvalidQuantity { sku: String, quantity: i32 },

    #[error("Order cannot be delivered before it is shipped")]
    NotShipped,

    #[error("Delivery time precedes shipping time")]
    DeliveredBeforeShipped,
}
