//! Order store — per-session message dispatcher
//!
//! One `OrderStore` serves exactly one session. It owns the mapping
//! from listing id to [`Instrument`] (lazily created on first
//! reference), routes decoded messages, and maps every risk failure
//! to a REJECTED response. No error from a well-formed message
//! escapes `consume`.

use std::collections::HashMap;

use protocol::messages::{Message, Payload};
use types::ids::ListingId;
use types::order::{RestingOrder, Side};
use types::response::OrderStatus;

use crate::config::{RiskLimits, TradeSignConvention};
use crate::errors::DispatchError;
use crate::instrument::Instrument;

/// Data for one outgoing OrderResponse frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub status: OrderStatus,
    /// Order id or trade id the verdict refers to
    pub id: u64,
}

impl Response {
    fn accepted(id: u64) -> Self {
        Self {
            status: OrderStatus::Accepted,
            id,
        }
    }

    fn rejected(id: u64) -> Self {
        Self {
            status: OrderStatus::Rejected,
            id,
        }
    }
}

/// Session-scoped dispatcher over per-listing instruments
#[derive(Debug, Clone)]
pub struct OrderStore {
    instruments: HashMap<ListingId, Instrument>,
    limits: RiskLimits,
    version: u16,
    convention: TradeSignConvention,
}

impl OrderStore {
    /// Create a store with the default trade sign convention.
    pub fn new(limits: RiskLimits, version: u16) -> Self {
        Self::with_convention(limits, version, TradeSignConvention::default())
    }

    /// Create a store with an explicit trade sign convention.
    pub fn with_convention(
        limits: RiskLimits,
        version: u16,
        convention: TradeSignConvention,
    ) -> Self {
        Self {
            instruments: HashMap::new(),
            limits,
            version,
            convention,
        }
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Read access to one instrument, if it exists.
    pub fn instrument(&self, listing_id: ListingId) -> Option<&Instrument> {
        self.instruments.get(&listing_id)
    }

    /// Route one decoded message and produce its response.
    ///
    /// `Ok(None)` is the "no response" sentinel: the message was
    /// dropped silently (header version mismatch). An inbound
    /// OrderResponse is a codec/dispatcher contract violation and
    /// returns `Err`; the session owner decides how to fail.
    pub fn consume(&mut self, message: &Message) -> Result<Option<Response>, DispatchError> {
        if message.header.version != self.version {
            return Ok(None);
        }

        let response = match &message.payload {
            Payload::NewOrder(new_order) => self.on_new_order(new_order),
            Payload::DeleteOrder(delete) => self.on_delete_order(delete),
            Payload::ModifyOrderQuantity(modify) => self.on_modify_order(modify),
            Payload::Trade(trade) => self.on_trade(trade),
            Payload::OrderResponse(_) => {
                return Err(DispatchError::UnexpectedMessage {
                    tag: message.payload.message_type(),
                })
            }
        };

        Ok(Some(response))
    }

    /// Route a NewOrder to the instrument for its listing id.
    ///
    /// A side byte other than `'B'`/`'S'` is an ACCEPTED no-op that
    /// mutates nothing: peers expect an acknowledgement for such
    /// frames rather than a rejection.
    fn on_new_order(&mut self, new_order: &protocol::messages::NewOrder) -> Response {
        let id = new_order.order_id.as_u64();
        let side = match Side::from_wire(new_order.side) {
            Some(side) => side,
            None => return Response::accepted(id),
        };
        if !quantity_fits(new_order.order_quantity) {
            return Response::rejected(id);
        }

        let order = RestingOrder::new(
            new_order.order_id,
            new_order.order_quantity,
            new_order.order_price,
        );
        let result = match side {
            Side::Buy => self.with_instrument(new_order.listing_id, |instrument, limits, _| {
                instrument.add_buy(order, limits.max_buy()).is_ok()
            }),
            Side::Sell => self.with_instrument(new_order.listing_id, |instrument, limits, _| {
                instrument.add_sell(order, limits.max_sell()).is_ok()
            }),
        };

        if result {
            Response::accepted(id)
        } else {
            Response::rejected(id)
        }
    }

    /// DeleteOrder carries no listing id: search every instrument's
    /// resting books in map iteration order; first hit wins.
    fn on_delete_order(&mut self, delete: &protocol::messages::DeleteOrder) -> Response {
        let id = delete.order_id.as_u64();
        let found = self
            .instruments
            .values_mut()
            .any(|instrument| instrument.delete_order(delete.order_id));

        if found {
            Response::accepted(id)
        } else {
            Response::rejected(id)
        }
    }

    /// ModifyOrderQuantity searches all instruments like delete; a
    /// zero or un-representable quantity is rejected up front without
    /// searching.
    fn on_modify_order(&mut self, modify: &protocol::messages::ModifyOrderQuantity) -> Response {
        let id = modify.order_id.as_u64();
        if modify.new_quantity == 0 || !quantity_fits(modify.new_quantity) {
            return Response::rejected(id);
        }

        for instrument in self.instruments.values_mut() {
            match instrument.modify_order(modify.order_id, modify.new_quantity, &self.limits) {
                Ok(true) => return Response::accepted(id),
                Ok(false) => continue,
                Err(_) => return Response::rejected(id),
            }
        }
        Response::rejected(id)
    }

    /// Route a Trade to the instrument for its listing id; a zero or
    /// un-representable quantity, or a zero price, is rejected before
    /// touching any state.
    fn on_trade(&mut self, trade: &protocol::messages::Trade) -> Response {
        let id = trade.trade_id.as_u64();
        if trade.trade_quantity == 0
            || trade.trade_price == 0
            || !quantity_fits(trade.trade_quantity)
        {
            return Response::rejected(id);
        }

        let trade = *trade;
        let result = self.with_instrument(trade.listing_id, |instrument, limits, convention| {
            instrument
                .add_trade(
                    trade.trade_id,
                    trade.trade_quantity,
                    trade.trade_price,
                    limits,
                    convention,
                )
                .is_ok()
        });

        if result {
            Response::accepted(id)
        } else {
            Response::rejected(id)
        }
    }

    /// Run `op` on the lazily-created instrument for `listing_id`.
    ///
    /// A freshly created instrument that the failed operation left
    /// empty is removed again, so a rejection creates no state.
    fn with_instrument(
        &mut self,
        listing_id: ListingId,
        op: impl FnOnce(&mut Instrument, &RiskLimits, TradeSignConvention) -> bool,
    ) -> bool {
        let created = !self.instruments.contains_key(&listing_id);
        let instrument = self.instruments.entry(listing_id).or_default();
        let accepted = op(instrument, &self.limits, self.convention);

        if !accepted && created && instrument.is_empty() {
            self.instruments.remove(&listing_id);
        }
        accepted
    }
}

/// Exposure arithmetic is `i64`; a wire quantity that cannot be
/// represented must never reach an instrument, where it would wrap
/// negative and slip under the limits.
fn quantity_fits(quantity: u64) -> bool {
    i64::try_from(quantity).is_ok()
}
