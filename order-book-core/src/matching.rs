use crate::ladder::Ladder;
use crate::types::{Id, Price, Quantity, Sequence, Side, Trade};
use std::collections::HashMap;

/// Consumes `incoming_quantity` against the opposite ladder, price-time
/// priority, and appends one trade per fill to `trades`.
///
/// `incoming_price` is `None` for a market order: the walk then continues
/// until the opposite ladder is empty or the incoming quantity is
/// exhausted, with no price bound. For a limit order, the walk stops as
/// soon as the opposite side's best price no longer crosses.
///
/// Every trade prices at the resting order, never the aggressor: price
/// improvement always accrues to whichever side crossed the spread.
#[allow(clippy::too_many_arguments)]
pub(crate) fn match_incoming(
    opposite: &mut Ladder,
    index: &mut HashMap<Id, (Side, Price)>,
    incoming_side: Side,
    incoming_price: Option<Price>,
    incoming_quantity: &mut Quantity,
    incoming_id: Id,
    trades: &mut Vec<Trade>,
    next_trade_sequence: &mut Sequence,
) {
    while *incoming_quantity > 0 {
        let Some(best_price) = opposite.best_price() else {
            break;
        };
        if let Some(limit) = incoming_price {
            let crosses = match incoming_side {
                Side::Buy => best_price <= limit,
                Side::Sell => best_price >= limit,
            };
            if !crosses {
                break;
            }
        }

        let level = opposite
            .level_mut(best_price)
            .expect("best_price must resolve to a live level");

        while *incoming_quantity > 0 {
            let Some(head) = level.orders.front() else {
                break;
            };
            let fill_qty = (*incoming_quantity).min(head.quantity);
            let head_id = head.id;
            let head_quantity = head.quantity;

            let (buy_order_id, sell_order_id) = match incoming_side {
                Side::Buy => (incoming_id, head_id),
                Side::Sell => (head_id, incoming_id),
            };
            let sequence = *next_trade_sequence;
            *next_trade_sequence += 1;
            tracing::trace!(
                sequence,
                buy_order_id,
                sell_order_id,
                %best_price,
                fill_qty,
                "trade"
            );
            trades.push(Trade {
                price: best_price,
                quantity: fill_qty,
                buy_order_id,
                sell_order_id,
                sequence,
            });

            *incoming_quantity -= fill_qty;

            if fill_qty == head_quantity {
                let filled = level.remove_front().expect("front existed");
                index.remove(&filled.id);
            } else {
                level.adjust_head_remaining(fill_qty);
            }
        }

        opposite.remove_level_if_empty(best_price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;

    fn setup_asks() -> Ladder {
        let mut asks = Ladder::new(Side::Sell);
        asks.insert_order(Order::new(1, Side::Sell, Price::new(10000, 2), 50, 1));
        asks.insert_order(Order::new(2, Side::Sell, Price::new(10100, 2), 30, 2));
        asks
    }

    #[test]
    fn limit_buy_stops_at_its_own_price() {
        let mut asks = setup_asks();
        let mut index = HashMap::new();
        index.insert(1, (Side::Sell, Price::new(10000, 2)));
        index.insert(2, (Side::Sell, Price::new(10100, 2)));
        let mut trades = Vec::new();
        let mut seq = 1;
        let mut remaining = 80;

        match_incoming(
            &mut asks,
            &mut index,
            Side::Buy,
            Some(Price::new(10000, 2)),
            &mut remaining,
            99,
            &mut trades,
            &mut seq,
        );

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 50);
        assert_eq!(trades[0].price, Price::new(10000, 2));
        assert_eq!(remaining, 30);
        assert!(index.contains_key(&2));
        assert!(!index.contains_key(&1));
    }

    #[test]
    fn market_buy_sweeps_until_exhausted() {
        let mut asks = setup_asks();
        let mut index = HashMap::new();
        index.insert(1, (Side::Sell, Price::new(10000, 2)));
        index.insert(2, (Side::Sell, Price::new(10100, 2)));
        let mut trades = Vec::new();
        let mut seq = 1;
        let mut remaining = 60;

        match_incoming(
            &mut asks,
            &mut index,
            Side::Buy,
            None,
            &mut remaining,
            99,
            &mut trades,
            &mut seq,
        );

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].quantity, 50);
        assert_eq!(trades[1].quantity, 10);
        assert_eq!(remaining, 0);
        assert_eq!(asks.volume_at(Price::new(10100, 2)), 20);
    }

    #[test]
    fn trade_sequence_is_contiguous_across_calls() {
        let mut asks = setup_asks();
        let mut index = HashMap::new();
        index.insert(1, (Side::Sell, Price::new(10000, 2)));
        index.insert(2, (Side::Sell, Price::new(10100, 2)));
        let mut trades = Vec::new();
        let mut seq = 1;
        let mut remaining = 80;

        match_incoming(
            &mut asks,
            &mut index,
            Side::Buy,
            None,
            &mut remaining,
            99,
            &mut trades,
            &mut seq,
        );

        let sequences: Vec<_> = trades.iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
        assert_eq!(seq, 3);
    }
}
