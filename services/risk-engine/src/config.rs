//! Risk engine configuration
//!
//! Session-scoped exposure limits and the trade sign convention.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::order::Side;

/// Error for a non-positive exposure limit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("limit {name} must be positive, got {value}")]
pub struct InvalidLimit {
    pub name: &'static str,
    pub value: i64,
}

/// Exclusive upper bounds on aggregate buy and sell exposure
///
/// Supplied once per session; exposure reaching a bound is a breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLimits {
    max_buy: i64,
    max_sell: i64,
}

impl RiskLimits {
    /// Create validated limits; both must be positive.
    pub fn new(max_buy: i64, max_sell: i64) -> Result<Self, InvalidLimit> {
        if max_buy <= 0 {
            return Err(InvalidLimit {
                name: "max_buy",
                value: max_buy,
            });
        }
        if max_sell <= 0 {
            return Err(InvalidLimit {
                name: "max_sell",
                value: max_sell,
            });
        }
        Ok(Self { max_buy, max_sell })
    }

    pub fn max_buy(&self) -> i64 {
        self.max_buy
    }

    pub fn max_sell(&self) -> i64 {
        self.max_sell
    }
}

/// Sign convention for trades matched against resting orders
///
/// The protocol does not define whether a trade matched to a resting
/// buy order is long or short, so the convention is an explicit flag
/// rather than a hard-coded assumption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSignConvention {
    /// A trade matching a resting BUY order contributes a negative
    /// signed quantity; a SELL match contributes positive. Default.
    #[default]
    ShortOnBuyMatch,
    /// The opposite orientation: BUY match positive, SELL match
    /// negative.
    LongOnBuyMatch,
}

impl TradeSignConvention {
    /// Signed ledger contribution of a trade of `quantity` matched
    /// against a resting order on `matched` side.
    pub fn signed_quantity(self, matched: Side, quantity: u64) -> i64 {
        let magnitude = quantity as i64;
        match (self, matched) {
            (TradeSignConvention::ShortOnBuyMatch, Side::Buy) => -magnitude,
            (TradeSignConvention::ShortOnBuyMatch, Side::Sell) => magnitude,
            (TradeSignConvention::LongOnBuyMatch, Side::Buy) => magnitude,
            (TradeSignConvention::LongOnBuyMatch, Side::Sell) => -magnitude,
        }
    }
}
