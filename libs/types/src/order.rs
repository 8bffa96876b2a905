//! Resting order and trade ledger types
//!
//! A resting order carries an unsigned quantity magnitude; a trade
//! fill carries a signed quantity whose sign encodes direction
//! (negative = short exposure, positive = long exposure).

use crate::ids::{OrderId, TradeId};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Parse the wire side byte (`b'B'` / `b'S'`).
    ///
    /// Any other byte is not a side; the dispatcher decides what to do
    /// with such messages.
    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Side::Buy),
            b'S' => Some(Side::Sell),
            _ => None,
        }
    }

    /// Wire side byte for this side
    pub fn to_wire(self) -> u8 {
        match self {
            Side::Buy => b'B',
            Side::Sell => b'S',
        }
    }
}

/// A buy or sell order resting in an instrument's book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrder {
    /// Producer-assigned order identifier
    pub id: OrderId,
    /// Quantity magnitude
    pub quantity: u64,
    /// Limit price in minor units
    pub price: u64,
}

impl RestingOrder {
    pub fn new(id: OrderId, quantity: u64, price: u64) -> Self {
        Self {
            id,
            quantity,
            price,
        }
    }
}

/// A trade recorded in an instrument's ledger
///
/// The quantity is signed: its sign is fixed at insertion time by the
/// configured trade sign convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeFill {
    /// Producer-assigned trade identifier
    pub id: TradeId,
    /// Signed quantity (direction encoded in the sign)
    pub quantity: i64,
    /// Execution price in minor units
    pub price: u64,
}

impl TradeFill {
    pub fn new(id: TradeId, quantity: i64, price: u64) -> Self {
        Self {
            id,
            quantity,
            price,
        }
    }
}
