//! Error types for the risk engine
//!
//! Risk failures are ordinary values threaded through every mutating
//! call; they surface to clients as REJECTED responses and never
//! escape the dispatcher as a crash.

use thiserror::Error;
use types::ids::TradeId;
use types::order::Side;

/// Failures from instrument-level risk checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    /// Recomputed exposure reached or exceeded the configured limit.
    ///
    /// The triggering mutation has already been rolled back when this
    /// is returned.
    #[error("{side:?} exposure {exposure} breaches exclusive limit {limit}")]
    ThresholdExceeded {
        side: Side,
        exposure: i64,
        limit: i64,
    },

    /// No resting order with matching id, quantity, and price
    #[error("no resting order matches trade {trade_id} (quantity {quantity}, price {price})")]
    NoMatchingOrder {
        trade_id: TradeId,
        quantity: u64,
        price: u64,
    },
}

/// Contract violations between codec and dispatcher
///
/// These are not client errors: a well-formed client message can never
/// produce one. They must not be silently swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A payload variant the dispatcher does not serve (an inbound
    /// OrderResponse) reached `consume`.
    #[error("unexpected inbound message type tag {tag}")]
    UnexpectedMessage { tag: u16 },
}
