//! Unique identifier types for gateway entities
//!
//! All IDs wrap the `u64` carried on the wire. The protocol assigns
//! identifiers on the producer side, so these are plain transparent
//! newtypes rather than generated values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a resting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Create from a raw wire value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw wire value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for OrderId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(u64);

impl TradeId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TradeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a financial instrument (listing)
///
/// One instrument's books and trade ledger live under one listing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(u64);

impl ListingId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ListingId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_roundtrip() {
        let id = OrderId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(OrderId::from(42), id);
    }

    #[test]
    fn test_order_id_display() {
        assert_eq!(OrderId::new(7).to_string(), "7");
    }

    #[test]
    fn test_order_id_serialization() {
        let id = OrderId::new(99);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "99");
        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_listing_id_distinct_from_order_id() {
        let listing = ListingId::new(1);
        assert_eq!(listing.as_u64(), 1);
        assert_eq!(listing.to_string(), "1");
    }

    #[test]
    fn test_trade_id_roundtrip() {
        let id = TradeId::new(314);
        assert_eq!(id.as_u64(), 314);
        assert_eq!(TradeId::from(314), id);
    }
}
