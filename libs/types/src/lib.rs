//! Types library for the order risk gateway
//!
//! This library provides the core type definitions shared across the
//! gateway system: wire-sized identifiers, order and trade records,
//! and the order response status.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, TradeId, ListingId)
//! - `order`: Resting orders, trade fills, and order sides
//! - `response`: Accept/reject status for order responses

// Public modules
pub mod ids;
pub mod order;
pub mod response;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::order::*;
    pub use crate::response::*;
}
