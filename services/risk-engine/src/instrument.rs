//! Per-instrument resting books, trade ledger, and derived exposure
//!
//! One `Instrument` holds three id-keyed maps (buy orders, sell
//! orders, trades) and four exposure scalars. The scalars are
//! recomputed from scratch after every mutation so they can never
//! drift from the map contents. Every mutating operation either fully
//! applies or fully rolls back: a rejected call leaves the instrument
//! identical to its state immediately before the call.

use std::collections::HashMap;

use types::ids::{OrderId, TradeId};
use types::order::{RestingOrder, Side, TradeFill};

use crate::config::{RiskLimits, TradeSignConvention};
use crate::errors::RiskError;

/// Books, ledger, and exposure for one listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instrument {
    buy_orders: HashMap<OrderId, RestingOrder>,
    sell_orders: HashMap<OrderId, RestingOrder>,
    trades: HashMap<TradeId, TradeFill>,

    /// Σ buy order quantities
    buy_qty: i64,
    /// Σ sell order quantities
    sell_qty: i64,
    /// Σ signed trade quantities
    net_pos: i64,
    /// max(buy_qty, net_pos + buy_qty)
    buy_side: i64,
    /// max(sell_qty, sell_qty - net_pos)
    sell_side: i64,
}

impl Instrument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a buy order and enforce the buy-side limit.
    ///
    /// On breach the insertion is rolled back before returning
    /// `ThresholdExceeded`.
    pub fn add_buy(&mut self, order: RestingOrder, max_buy: i64) -> Result<(), RiskError> {
        let displaced = self.buy_orders.insert(order.id, order);
        self.recompute();

        if self.buy_side >= max_buy {
            let exposure = self.buy_side;
            self.restore_buy(order.id, displaced);
            return Err(RiskError::ThresholdExceeded {
                side: Side::Buy,
                exposure,
                limit: max_buy,
            });
        }
        Ok(())
    }

    /// Insert a sell order and enforce the sell-side limit.
    pub fn add_sell(&mut self, order: RestingOrder, max_sell: i64) -> Result<(), RiskError> {
        let displaced = self.sell_orders.insert(order.id, order);
        self.recompute();

        if self.sell_side >= max_sell {
            let exposure = self.sell_side;
            self.restore_sell(order.id, displaced);
            return Err(RiskError::ThresholdExceeded {
                side: Side::Sell,
                exposure,
                limit: max_sell,
            });
        }
        Ok(())
    }

    /// Record a trade against a resting order of the same id.
    ///
    /// The trade must match an existing resting order by id AND
    /// quantity AND price in either book. The matched side and the
    /// configured convention fix the sign of the ledger entry. Both
    /// side limits are enforced; on breach the insertion is rolled
    /// back.
    pub fn add_trade(
        &mut self,
        trade_id: TradeId,
        quantity: u64,
        price: u64,
        limits: &RiskLimits,
        convention: TradeSignConvention,
    ) -> Result<(), RiskError> {
        let resting_id = OrderId::new(trade_id.as_u64());
        let matched_side = if matches_resting(&self.buy_orders, resting_id, quantity, price) {
            Side::Buy
        } else if matches_resting(&self.sell_orders, resting_id, quantity, price) {
            Side::Sell
        } else {
            return Err(RiskError::NoMatchingOrder {
                trade_id,
                quantity,
                price,
            });
        };

        let signed = convention.signed_quantity(matched_side, quantity);
        let displaced = self
            .trades
            .insert(trade_id, TradeFill::new(trade_id, signed, price));
        self.recompute();

        let breach = if self.buy_side >= limits.max_buy() {
            Some((Side::Buy, self.buy_side, limits.max_buy()))
        } else if self.sell_side >= limits.max_sell() {
            Some((Side::Sell, self.sell_side, limits.max_sell()))
        } else {
            None
        };

        if let Some((side, exposure, limit)) = breach {
            match displaced {
                Some(previous) => self.trades.insert(trade_id, previous),
                None => self.trades.remove(&trade_id),
            };
            self.recompute();
            return Err(RiskError::ThresholdExceeded {
                side,
                exposure,
                limit,
            });
        }
        Ok(())
    }

    /// Remove a resting order from whichever book holds it.
    ///
    /// The trade ledger is never touched. Returns whether an order was
    /// found.
    pub fn delete_order(&mut self, id: OrderId) -> bool {
        if self.buy_orders.remove(&id).is_some() || self.sell_orders.remove(&id).is_some() {
            self.recompute();
            return true;
        }
        false
    }

    /// Replace the quantity of a resting order, enforcing the owning
    /// side's limit.
    ///
    /// Returns whether an order was found; on breach the previous
    /// quantity is restored before returning `ThresholdExceeded`.
    pub fn modify_order(
        &mut self,
        id: OrderId,
        new_quantity: u64,
        limits: &RiskLimits,
    ) -> Result<bool, RiskError> {
        if let Some(order) = self.buy_orders.get_mut(&id) {
            let previous = order.quantity;
            order.quantity = new_quantity;
            self.recompute();

            if self.buy_side >= limits.max_buy() {
                let exposure = self.buy_side;
                if let Some(order) = self.buy_orders.get_mut(&id) {
                    order.quantity = previous;
                }
                self.recompute();
                return Err(RiskError::ThresholdExceeded {
                    side: Side::Buy,
                    exposure,
                    limit: limits.max_buy(),
                });
            }
            return Ok(true);
        }

        if let Some(order) = self.sell_orders.get_mut(&id) {
            let previous = order.quantity;
            order.quantity = new_quantity;
            self.recompute();

            if self.sell_side >= limits.max_sell() {
                let exposure = self.sell_side;
                if let Some(order) = self.sell_orders.get_mut(&id) {
                    order.quantity = previous;
                }
                self.recompute();
                return Err(RiskError::ThresholdExceeded {
                    side: Side::Sell,
                    exposure,
                    limit: limits.max_sell(),
                });
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Whether both books and the ledger are empty
    pub fn is_empty(&self) -> bool {
        self.buy_orders.is_empty() && self.sell_orders.is_empty() && self.trades.is_empty()
    }

    pub fn buy_orders(&self) -> &HashMap<OrderId, RestingOrder> {
        &self.buy_orders
    }

    pub fn sell_orders(&self) -> &HashMap<OrderId, RestingOrder> {
        &self.sell_orders
    }

    pub fn trades(&self) -> &HashMap<TradeId, TradeFill> {
        &self.trades
    }

    pub fn buy_qty(&self) -> i64 {
        self.buy_qty
    }

    pub fn sell_qty(&self) -> i64 {
        self.sell_qty
    }

    pub fn net_pos(&self) -> i64 {
        self.net_pos
    }

    pub fn buy_side(&self) -> i64 {
        self.buy_side
    }

    pub fn sell_side(&self) -> i64 {
        self.sell_side
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn restore_buy(&mut self, id: OrderId, displaced: Option<RestingOrder>) {
        match displaced {
            Some(previous) => self.buy_orders.insert(id, previous),
            None => self.buy_orders.remove(&id),
        };
        self.recompute();
    }

    fn restore_sell(&mut self, id: OrderId, displaced: Option<RestingOrder>) {
        match displaced {
            Some(previous) => self.sell_orders.insert(id, previous),
            None => self.sell_orders.remove(&id),
        };
        self.recompute();
    }

    /// Recompute all four scalars from map contents.
    fn recompute(&mut self) {
        self.buy_qty = self
            .buy_orders
            .values()
            .map(|order| order.quantity as i64)
            .sum();
        self.sell_qty = self
            .sell_orders
            .values()
            .map(|order| order.quantity as i64)
            .sum();
        self.net_pos = self.trades.values().map(|fill| fill.quantity).sum();
        self.buy_side = self.buy_qty.max(self.net_pos + self.buy_qty);
        self.sell_side = self.sell_qty.max(self.sell_qty - self.net_pos);
    }
}

/// Whether `book` holds an order with exactly this id, quantity, and
/// price.
fn matches_resting(
    book: &HashMap<OrderId, RestingOrder>,
    id: OrderId,
    quantity: u64,
    price: u64,
) -> bool {
    book.get(&id)
        .is_some_and(|order| order.quantity == quantity && order.price == price)
}
