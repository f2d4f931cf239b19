// ============================================================================
// Order Domain - Business Rules for Orders
// ============================================================================
//
// - Value objects (LineItem)
// - Model (Order, NewOrder, OrderUpdate)
// - Errors (OrderError enum)
//
// Persistence lives in src/repository/, HTTP in src/http/.
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod model;

// Re-export for convenience
pub use value_objects::*;
pub use errors::*;
pub use model::*;
