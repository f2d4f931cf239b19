// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Domain types and validation rules, free of HTTP and SQL concerns.
//
// ============================================================================

pub mod order;
