//! Binary codec — field-by-field little-endian frame encoding
//!
//! The codec never relies on in-memory struct layout: every field is
//! written and read explicitly with `to_le_bytes`/`from_le_bytes`, so
//! the byte layout is identical on every target. Exact encoded sizes
//! are asserted at startup via [`assert_wire_sizes`].
//!
//! Framing note: the codec expects one complete message per input
//! buffer. Reassembly of a message split across reads is a documented
//! limitation, not attempted here.

use thiserror::Error;
use types::response::{InvalidStatus, OrderStatus};

use crate::messages::{
    DeleteOrder, Header, Message, ModifyOrderQuantity, NewOrder, OrderResponse, Payload, Trade,
    HEADER_SIZE,
};

/// Codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Header version differs from the configured protocol version.
    ///
    /// Callers must treat this as "drop, no response" — it is not an
    /// error to report back to the peer.
    #[error("protocol version mismatch: got {got}, want {want}")]
    ProtocolMismatch { got: u16, want: u16 },

    /// Unrecognised type tag; fatal for this read only
    #[error("unknown message type tag: {tag}")]
    UnknownMessageType { tag: u16 },

    /// Buffer too short for the selected shape
    #[error("truncated frame: need {need} bytes, got {got}")]
    Truncated { need: usize, got: usize },

    /// Status field outside the ACCEPTED/REJECTED range
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),
}

/// Stateless frame codec bound to one protocol version
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    version: u16,
}

impl Codec {
    /// Create a codec for the given protocol version
    pub fn new(version: u16) -> Self {
        Self { version }
    }

    /// The protocol version this codec accepts and emits
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Decode one frame from a read buffer.
    ///
    /// Steps: header first (version gate), then the type tag at offset
    /// 16, then the payload shape selected by that tag.
    pub fn decode(&self, data: &[u8]) -> Result<Message, CodecError> {
        let header = decode_header(data)?;
        if header.version != self.version {
            return Err(CodecError::ProtocolMismatch {
                got: header.version,
                want: self.version,
            });
        }

        let body = &data[HEADER_SIZE..];
        if body.len() < 2 {
            return Err(CodecError::Truncated {
                need: HEADER_SIZE + 2,
                got: data.len(),
            });
        }
        let tag = u16::from_le_bytes(body[0..2].try_into().unwrap());

        let payload = match tag {
            NewOrder::MESSAGE_TYPE => decode_new_order(body)?,
            DeleteOrder::MESSAGE_TYPE => decode_delete_order(body)?,
            ModifyOrderQuantity::MESSAGE_TYPE => decode_modify_order_quantity(body)?,
            Trade::MESSAGE_TYPE => decode_trade(body)?,
            OrderResponse::MESSAGE_TYPE => decode_order_response(body)?,
            _ => return Err(CodecError::UnknownMessageType { tag }),
        };

        Ok(Message { header, payload })
    }

    /// Encode one frame.
    ///
    /// The header's `payload_size` is written from the variant's true
    /// encoded size; the output length is exactly `16 + payload_size`.
    pub fn encode(&self, message: &Message) -> Vec<u8> {
        let payload_size = message.payload.wire_size();
        let mut buf = Vec::with_capacity(HEADER_SIZE + payload_size);

        buf.extend_from_slice(&message.header.version.to_le_bytes());
        buf.extend_from_slice(&(payload_size as u16).to_le_bytes());
        buf.extend_from_slice(&message.header.sequence_number.to_le_bytes());
        buf.extend_from_slice(&message.header.timestamp.to_le_bytes());

        buf.extend_from_slice(&message.payload.message_type().to_le_bytes());
        match &message.payload {
            Payload::NewOrder(p) => {
                buf.extend_from_slice(&p.listing_id.as_u64().to_le_bytes());
                buf.extend_from_slice(&p.order_id.as_u64().to_le_bytes());
                buf.extend_from_slice(&p.order_quantity.to_le_bytes());
                buf.extend_from_slice(&p.order_price.to_le_bytes());
                buf.push(p.side);
            }
            Payload::DeleteOrder(p) => {
                buf.extend_from_slice(&p.order_id.as_u64().to_le_bytes());
            }
            Payload::ModifyOrderQuantity(p) => {
                buf.extend_from_slice(&p.order_id.as_u64().to_le_bytes());
                buf.extend_from_slice(&p.new_quantity.to_le_bytes());
            }
            Payload::Trade(p) => {
                buf.extend_from_slice(&p.listing_id.as_u64().to_le_bytes());
                buf.extend_from_slice(&p.trade_id.as_u64().to_le_bytes());
                buf.extend_from_slice(&p.trade_quantity.to_le_bytes());
                buf.extend_from_slice(&p.trade_price.to_le_bytes());
            }
            Payload::OrderResponse(p) => {
                buf.extend_from_slice(&p.order_id.as_u64().to_le_bytes());
                buf.extend_from_slice(&p.status.to_wire().to_le_bytes());
            }
        }

        buf
    }
}

/// Assert that every message variant encodes to its declared size.
///
/// Called once at process startup by each binary. A mismatch means the
/// codec and the declared layout have diverged, which would corrupt
/// every frame on the wire, so this panics.
pub fn assert_wire_sizes() {
    let codec = Codec::new(1);
    let header = Header {
        version: 1,
        payload_size: 0,
        sequence_number: 0,
        timestamp: 0,
    };

    let samples = [
        Payload::NewOrder(NewOrder {
            listing_id: 1.into(),
            order_id: 1.into(),
            order_quantity: 1,
            order_price: 1,
            side: b'B',
        }),
        Payload::DeleteOrder(DeleteOrder { order_id: 1.into() }),
        Payload::ModifyOrderQuantity(ModifyOrderQuantity {
            order_id: 1.into(),
            new_quantity: 1,
        }),
        Payload::Trade(Trade {
            listing_id: 1.into(),
            trade_id: 1.into(),
            trade_quantity: 1,
            trade_price: 1,
        }),
        Payload::OrderResponse(OrderResponse {
            order_id: 1.into(),
            status: OrderStatus::Accepted,
        }),
    ];

    for payload in samples {
        let encoded = codec.encode(&Message { header, payload });
        let want = HEADER_SIZE + payload.wire_size();
        assert_eq!(
            encoded.len(),
            want,
            "wire size mismatch for tag {}: encoded {} bytes, declared {}",
            payload.message_type(),
            encoded.len(),
            want
        );
    }
}

// ── Field readers ───────────────────────────────────────────────────

fn decode_header(data: &[u8]) -> Result<Header, CodecError> {
    if data.len() < HEADER_SIZE {
        return Err(CodecError::Truncated {
            need: HEADER_SIZE,
            got: data.len(),
        });
    }
    Ok(Header {
        version: u16::from_le_bytes(data[0..2].try_into().unwrap()),
        payload_size: u16::from_le_bytes(data[2..4].try_into().unwrap()),
        sequence_number: u32::from_le_bytes(data[4..8].try_into().unwrap()),
        timestamp: u64::from_le_bytes(data[8..16].try_into().unwrap()),
    })
}

fn require(body: &[u8], need: usize) -> Result<(), CodecError> {
    if body.len() < need {
        return Err(CodecError::Truncated {
            need: HEADER_SIZE + need,
            got: HEADER_SIZE + body.len(),
        });
    }
    Ok(())
}

fn read_u64(body: &[u8], pos: usize) -> u64 {
    u64::from_le_bytes(body[pos..pos + 8].try_into().unwrap())
}

fn decode_new_order(body: &[u8]) -> Result<Payload, CodecError> {
    require(body, NewOrder::WIRE_SIZE)?;
    Ok(Payload::NewOrder(NewOrder {
        listing_id: read_u64(body, 2).into(),
        order_id: read_u64(body, 10).into(),
        order_quantity: read_u64(body, 18),
        order_price: read_u64(body, 26),
        side: body[34],
    }))
}

fn decode_delete_order(body: &[u8]) -> Result<Payload, CodecError> {
    require(body, DeleteOrder::WIRE_SIZE)?;
    Ok(Payload::DeleteOrder(DeleteOrder {
        order_id: read_u64(body, 2).into(),
    }))
}

fn decode_modify_order_quantity(body: &[u8]) -> Result<Payload, CodecError> {
    require(body, ModifyOrderQuantity::WIRE_SIZE)?;
    Ok(Payload::ModifyOrderQuantity(ModifyOrderQuantity {
        order_id: read_u64(body, 2).into(),
        new_quantity: read_u64(body, 10),
    }))
}

fn decode_trade(body: &[u8]) -> Result<Payload, CodecError> {
    require(body, Trade::WIRE_SIZE)?;
    Ok(Payload::Trade(Trade {
        listing_id: read_u64(body, 2).into(),
        trade_id: read_u64(body, 10).into(),
        trade_quantity: read_u64(body, 18),
        trade_price: read_u64(body, 26),
    }))
}

fn decode_order_response(body: &[u8]) -> Result<Payload, CodecError> {
    require(body, OrderResponse::WIRE_SIZE)?;
    let status = u16::from_le_bytes(body[10..12].try_into().unwrap());
    Ok(Payload::OrderResponse(OrderResponse {
        order_id: read_u64(body, 2).into(),
        status: OrderStatus::from_wire(status)?,
    }))
}

// ── Tests ───────────────────────────────────────────────────────────
