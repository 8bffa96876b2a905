//! Wire protocol library for the order risk gateway
//!
//! Defines the fixed-width binary message layout and the codec that
//! translates between raw frames and typed messages.
//!
//! **Key invariants:**
//! - Byte order is pinned little-endian on every field
//! - One encoded message is exactly `16 + payload_size` bytes
//! - Every payload size is asserted at startup, never inferred from
//!   in-memory struct layout

pub mod codec;
pub mod messages;

pub use codec::{Codec, CodecError};
pub use messages::{Header, Message, Payload};
