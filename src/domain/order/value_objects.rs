use serde::{Deserialize, Serialize};

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// One product line within an order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LineItem {
    #[serde(alias = "product_id")]
    pub sku: String,
    pub quantity: i32,
}

impl LineItem {
    #[cfg(test)]
    pub fn new(sku: impl Into<String>, quantity: i32) -> Self {
        Self {
            sku: sku.into(),
            quantity,
        }
    }

    pub fn validate(&self) -> Result<(), OrderError> {
        if self.sku.trim().is_empty() {
            return Err(OrderError::EmptySku);
        }

        if self.quantity < 1 {
            return Err(OrderError::InvalidQuantity {
                sku: self.sku.clone(),
                quantity: self.quantity,
            });
        }

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
