//! Wire message definitions
//!
//! # Binary Format (per frame)
//! ```text
//! [version:         u16]  offset 0
//! [payload_size:    u16]  offset 2
//! [sequence_number: u32]  offset 4
//! [timestamp:       u64]  offset 8   — Unix nanos, producer-assigned
//! [payload:       bytes]  offset 16  — shape selected by the u16 type
//!                                      tag in its first two bytes
//! ```
//!
//! The payload set is closed: five variants, each with a fixed type
//! tag and a fixed encoded size. Adding a variant forces every match
//! site in the codec and dispatcher to be revisited.

use serde::{Deserialize, Serialize};
use types::ids::{ListingId, OrderId, TradeId};
use types::response::OrderStatus;

/// Encoded size of the frame header in bytes
pub const HEADER_SIZE: usize = 16;

/// Frame header preceding every payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Protocol version; frames with a foreign version are dropped
    pub version: u16,
    /// Exact byte count of the payload that follows
    pub payload_size: u16,
    /// Producer-assigned, monotonically increasing per connection
    pub sequence_number: u32,
    /// Unix nanosecond timestamp, producer-assigned
    pub timestamp: u64,
}

/// Submit a new resting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub listing_id: ListingId,
    pub order_id: OrderId,
    pub order_quantity: u64,
    pub order_price: u64,
    /// Raw side byte; `b'B'` / `b'S'` are the recognised values
    pub side: u8,
}

impl NewOrder {
    pub const MESSAGE_TYPE: u16 = 1;
    /// tag(2) + listing(8) + order(8) + quantity(8) + price(8) + side(1)
    pub const WIRE_SIZE: usize = 35;
}

/// Delete a resting order wherever it rests (carries no listing id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOrder {
    pub order_id: OrderId,
}

impl DeleteOrder {
    pub const MESSAGE_TYPE: u16 = 2;
    /// tag(2) + order(8)
    pub const WIRE_SIZE: usize = 10;
}

/// Replace the quantity of a resting order (carries no listing id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyOrderQuantity {
    pub order_id: OrderId,
    pub new_quantity: u64,
}

impl ModifyOrderQuantity {
    pub const MESSAGE_TYPE: u16 = 3;
    /// tag(2) + order(8) + quantity(8)
    pub const WIRE_SIZE: usize = 18;
}

/// Record a trade against a resting order of the same id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub listing_id: ListingId,
    pub trade_id: TradeId,
    pub trade_quantity: u64,
    pub trade_price: u64,
}

impl Trade {
    pub const MESSAGE_TYPE: u16 = 4;
    /// tag(2) + listing(8) + trade(8) + quantity(8) + price(8)
    pub const WIRE_SIZE: usize = 34;
}

/// Accept/reject verdict returned by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Order id or trade id the verdict refers to
    pub order_id: OrderId,
    pub status: OrderStatus,
}

impl OrderResponse {
    pub const MESSAGE_TYPE: u16 = 5;
    /// tag(2) + order(8) + status(2)
    pub const WIRE_SIZE: usize = 12;
}

/// Closed set of payload variants
///
/// Matched exhaustively at decode and dispatch time; there is no
/// open-ended fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    NewOrder(NewOrder),
    DeleteOrder(DeleteOrder),
    ModifyOrderQuantity(ModifyOrderQuantity),
    Trade(Trade),
    OrderResponse(OrderResponse),
}

impl Payload {
    /// Type tag written at payload offset 0
    pub fn message_type(&self) -> u16 {
        match self {
            Payload::NewOrder(_) => NewOrder::MESSAGE_TYPE,
            Payload::DeleteOrder(_) => DeleteOrder::MESSAGE_TYPE,
            Payload::ModifyOrderQuantity(_) => ModifyOrderQuantity::MESSAGE_TYPE,
            Payload::Trade(_) => Trade::MESSAGE_TYPE,
            Payload::OrderResponse(_) => OrderResponse::MESSAGE_TYPE,
        }
    }

    /// Exact encoded size of this payload in bytes
    pub fn wire_size(&self) -> usize {
        match self {
            Payload::NewOrder(_) => NewOrder::WIRE_SIZE,
            Payload::DeleteOrder(_) => DeleteOrder::WIRE_SIZE,
            Payload::ModifyOrderQuantity(_) => ModifyOrderQuantity::WIRE_SIZE,
            Payload::Trade(_) => Trade::WIRE_SIZE,
            Payload::OrderResponse(_) => OrderResponse::WIRE_SIZE,
        }
    }
}

/// One decoded protocol frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub header: Header,
    pub payload: Payload,
}
