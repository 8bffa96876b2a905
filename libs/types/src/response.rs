//! Order response status
//!
//! Wire values match the protocol exactly: 0 = ACCEPTED, 1 = REJECTED.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Outcome of a risk-checked order operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Operation applied; state mutated
    Accepted,
    /// Operation refused; state untouched
    Rejected,
}

/// Error for an out-of-range status value on the wire
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid order status value: {value}")]
pub struct InvalidStatus {
    pub value: u16,
}

impl OrderStatus {
    /// Wire value for this status
    pub fn to_wire(self) -> u16 {
        match self {
            OrderStatus::Accepted => 0,
            OrderStatus::Rejected => 1,
        }
    }

    /// Parse a wire status value
    pub fn from_wire(value: u16) -> Result<Self, InvalidStatus> {
        match value {
            0 => Ok(OrderStatus::Accepted),
            1 => Ok(OrderStatus::Rejected),
            _ => Err(InvalidStatus { value }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Accepted => write!(f, "ACCEPTED"),
            OrderStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}
