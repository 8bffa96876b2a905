//! Property tests for the instrument engine
//!
//! Two invariants hold for any operation sequence:
//! - an operation that does not report success leaves the instrument
//!   exactly as it was before the call
//! - after every call, both exposure scalars sit strictly below their
//!   configured limits

use proptest::prelude::*;
use risk_engine::{Instrument, RiskLimits, TradeSignConvention};
use types::ids::{OrderId, TradeId};
use types::order::RestingOrder;

const MAX_BUY: i64 = 20;
const MAX_SELL: i64 = 15;

#[derive(Debug, Clone)]
enum Op {
    AddBuy { id: u64, quantity: u64, price: u64 },
    AddSell { id: u64, quantity: u64, price: u64 },
    Trade { id: u64, quantity: u64, price: u64 },
    Delete { id: u64 },
    Modify { id: u64, quantity: u64 },
}

/// Small id and price spaces so sequences actually hit resting
/// orders with matching and mismatching trades.
fn op_strategy() -> impl Strategy<Value = Op> {
    let id = 0u64..8;
    let quantity = 1u64..30;
    let price = prop_oneof![Just(100u64), Just(200u64)];

    prop_oneof![
        (id.clone(), quantity.clone(), price.clone())
            .prop_map(|(id, quantity, price)| Op::AddBuy { id, quantity, price }),
        (id.clone(), quantity.clone(), price.clone())
            .prop_map(|(id, quantity, price)| Op::AddSell { id, quantity, price }),
        (id.clone(), quantity.clone(), price)
            .prop_map(|(id, quantity, price)| Op::Trade { id, quantity, price }),
        id.clone().prop_map(|id| Op::Delete { id }),
        (id, quantity).prop_map(|(id, quantity)| Op::Modify { id, quantity }),
    ]
}

/// Apply one operation; returns whether it fully applied.
fn apply(instrument: &mut Instrument, op: &Op, limits: &RiskLimits) -> bool {
    match op {
        Op::AddBuy {
            id,
            quantity,
            price,
        } => instrument
            .add_buy(
                RestingOrder::new(OrderId::new(*id), *quantity, *price),
                limits.max_buy(),
            )
            .is_ok(),
        Op::AddSell {
            id,
            quantity,
            price,
        } => instrument
            .add_sell(
                RestingOrder::new(OrderId::new(*id), *quantity, *price),
                limits.max_sell(),
            )
            .is_ok(),
        Op::Trade {
            id,
            quantity,
            price,
        } => instrument
            .add_trade(
                TradeId::new(*id),
                *quantity,
                *price,
                limits,
                TradeSignConvention::default(),
            )
            .is_ok(),
        Op::Delete { id } => instrument.delete_order(OrderId::new(*id)),
        Op::Modify { id, quantity } => matches!(
            instrument.modify_order(OrderId::new(*id), *quantity, limits),
            Ok(true)
        ),
    }
}

proptest! {
    #[test]
    fn failed_operations_leave_state_untouched(
        ops in prop::collection::vec(op_strategy(), 1..64)
    ) {
        let limits = RiskLimits::new(MAX_BUY, MAX_SELL).unwrap();
        let mut instrument = Instrument::new();

        for op in &ops {
            let before = instrument.clone();
            let applied = apply(&mut instrument, op, &limits);
            if !applied {
                prop_assert_eq!(&instrument, &before);
            }
        }
    }

    #[test]
    fn exposure_stays_strictly_below_limits(
        ops in prop::collection::vec(op_strategy(), 1..64)
    ) {
        let limits = RiskLimits::new(MAX_BUY, MAX_SELL).unwrap();
        let mut instrument = Instrument::new();

        for op in &ops {
            apply(&mut instrument, op, &limits);
            prop_assert!(instrument.buy_side() < limits.max_buy());
            prop_assert!(instrument.sell_side() < limits.max_sell());
        }
    }

    #[test]
    fn scalars_equal_full_recompute(
        ops in prop::collection::vec(op_strategy(), 1..64)
    ) {
        let limits = RiskLimits::new(MAX_BUY, MAX_SELL).unwrap();
        let mut instrument = Instrument::new();

        for op in &ops {
            apply(&mut instrument, op, &limits);

            let buy_qty: i64 = instrument
                .buy_orders()
                .values()
                .map(|order| order.quantity as i64)
                .sum();
            let sell_qty: i64 = instrument
                .sell_orders()
                .values()
                .map(|order| order.quantity as i64)
                .sum();
            let net_pos: i64 = instrument.trades().values().map(|fill| fill.quantity).sum();

            prop_assert_eq!(instrument.buy_qty(), buy_qty);
            prop_assert_eq!(instrument.sell_qty(), sell_qty);
            prop_assert_eq!(instrument.net_pos(), net_pos);
            prop_assert_eq!(instrument.buy_side(), buy_qty.max(net_pos + buy_qty));
            prop_assert_eq!(instrument.sell_side(), sell_qty.max(sell_qty - net_pos));
        }
    }
}
