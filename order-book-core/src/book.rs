use crate::ladder::Ladder;
use crate::matching;
use crate::types::{Id, Order, OrderBookError, Price, PriceAndQuantity, Quantity, Sequence, Side, Trades};
use std::collections::HashMap;

/// A single-symbol limit order book with an integrated continuous matching
/// engine, following strict price-time priority.
///
/// Every mutating operation is total: invalid arguments are rejected with
/// `false`/`None` and leave the book untouched, never a partial mutation.
/// The book is not internally synchronised, a caller sharing one across
/// threads must externalise mutual exclusion around every call.
pub struct OrderBook {
    symbol: String,
    bids: Ladder,
    asks: Ladder,
    /// order id -> (side, price): resolves a live order to its level in
    /// `O(1)`. Finding the order's exact queue position within that level
    /// is `O(level size)`, see `PriceLevel::remove_by_id`.
    index: HashMap<Id, (Side, Price)>,
    trades: Trades,
    next_trade_sequence: Sequence,
    next_arrival_sequence: Sequence,
}

impl OrderBook {
    /// Creates a new, empty book for `symbol`. The symbol is an opaque
    /// string: the book stores it but never interprets it.
    pub fn new(symbol: impl Into<String>) -> Self {
        OrderBook {
            symbol: symbol.into(),
            bids: Ladder::new(Side::Buy),
            asks: Ladder::new(Side::Sell),
            index: HashMap::new(),
            trades: Vec::new(),
            next_trade_sequence: 1,
            next_arrival_sequence: 0,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut Ladder {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn take_arrival_sequence(&mut self) -> Sequence {
        let sequence = self.next_arrival_sequence;
        self.next_arrival_sequence += 1;
        sequence
    }

    fn validate_new_order(
        &self,
        id: Id,
        quantity: Quantity,
        price: Option<Price>,
    ) -> Result<(), OrderBookError> {
        if self.index.contains_key(&id) {
            return Err(OrderBookError::DuplicateOrderId(id));
        }
        if quantity <= 0 {
            return Err(OrderBookError::InvalidQuantity { id, quantity });
        }
        if let Some(price) = price {
            if price <= Price::ZERO {
                return Err(OrderBookError::InvalidPrice { id, price });
            }
        }
        Ok(())
    }

    /// Places a limit order. Matches against resting liquidity first; any
    /// residual quantity rests in this order's own ladder at `price`.
    ///
    /// Returns `false` (no state change) if `id` already refers to a live
    /// order, `quantity` is not positive, or `price` is not positive.
    pub fn add_limit_order(&mut self, id: Id, side: Side, price: Price, quantity: Quantity) -> bool {
        tracing::debug!(order_id = id, ?side, %price, quantity, "add_limit_order");
        if let Err(err) = self.validate_new_order(id, quantity, Some(price)) {
            tracing::warn!(%err, "limit order rejected");
            return false;
        }

        let mut remaining = quantity;
        matching::match_incoming(
            self.ladder_mut(side.opposite()),
            &mut self.index,
            side,
            Some(price),
            &mut remaining,
            id,
            &mut self.trades,
            &mut self.next_trade_sequence,
        );

        if remaining > 0 {
            let sequence = self.take_arrival_sequence();
            let order = Order::new(id, side, price, remaining, sequence);
            self.ladder_mut(side).insert_order(order);
            self.index.insert(id, (side, price));
        }
        true
    }

    /// Places a market order: matches against resting liquidity regardless
    /// of price until either the order is filled or the opposite side is
    /// exhausted. Any residual quantity is dropped silently, compare
    /// `quantity` to the sum of trades produced (via `get_trades`) to
    /// detect a fill shortfall.
    ///
    /// Returns `false` if `quantity` is not positive.
    pub fn add_market_order(&mut self, id: Id, side: Side, quantity: Quantity) -> bool {
        tracing::debug!(order_id = id, ?side, quantity, "add_market_order");
        if quantity <= 0 {
            let err = OrderBookError::InvalidQuantity { id, quantity };
            tracing::warn!(%err, "market order rejected");
            return false;
        }

        let mut remaining = quantity;
        matching::match_incoming(
            self.ladder_mut(side.opposite()),
            &mut self.index,
            side,
            None,
            &mut remaining,
            id,
            &mut self.trades,
            &mut self.next_trade_sequence,
        );

        if remaining > 0 {
            tracing::debug!(order_id = id, remaining, "market order residual dropped: liquidity exhausted");
        }
        true
    }

    /// Cancels a live order. Returns `true` at most once per order id;
    /// cancelling an already-gone or unknown id returns `false`.
    pub fn cancel_order(&mut self, id: Id) -> bool {
        let Some((side, price)) = self.index.get(&id).copied() else {
            let err = OrderBookError::UnknownOrderId(id);
            tracing::warn!(%err, "cancel rejected");
            return false;
        };

        let ladder = self.ladder_mut(side);
        let level = ladder
            .level_mut(price)
            .expect("order index must resolve to a live level");
        level
            .remove_by_id(id)
            .expect("order index must resolve to a live order");
        ladder.remove_level_if_empty(price);
        self.index.remove(&id);
        tracing::debug!(order_id = id, "order cancelled");
        true
    }

    /// Changes a live order's remaining quantity.
    ///
    /// If `new_quantity` is at most the current remaining quantity, the
    /// order keeps its place in the FIFO (decremented in place). Otherwise
    /// it loses time priority and is re-queued at the tail of the same
    /// price level with a fresh arrival sequence, equivalent to a cancel
    /// and re-add at the same price. Price changes are not supported here;
    /// they require cancelling and submitting a new order.
    ///
    /// Returns `false` if `id` is unknown or `new_quantity` is not
    /// positive.
    pub fn modify_order(&mut self, id: Id, new_quantity: Quantity) -> bool {
        if new_quantity <= 0 {
            let err = OrderBookError::InvalidQuantity { id, quantity: new_quantity };
            tracing::warn!(%err, "modify rejected");
            return false;
        }
        let Some((side, price)) = self.index.get(&id).copied() else {
            let err = OrderBookError::UnknownOrderId(id);
            tracing::warn!(%err, "modify rejected");
            return false;
        };

        let ladder = self.ladder_mut(side);
        let level = ladder
            .level_mut(price)
            .expect("order index must resolve to a live level");
        let current_quantity = level
            .orders
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.quantity)
            .expect("order index must resolve to a live order");

        if new_quantity <= current_quantity {
            level.set_quantity(id, new_quantity);
        } else {
            let mut order = level
                .remove_by_id(id)
                .expect("order index must resolve to a live order");
            ladder.remove_level_if_empty(price);
            order.quantity = new_quantity;
            order.sequence = self.take_arrival_sequence();
            self.ladder_mut(side).insert_order(order);
        }
        tracing::debug!(order_id = id, new_quantity, "order modified");
        true
    }

    pub fn get_best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn get_best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn get_mid_price(&self) -> Option<Price> {
        let bid = self.get_best_bid()?;
        let ask = self.get_best_ask()?;
        Some((bid + ask) / Price::TWO)
    }

    pub fn get_spread(&self) -> Option<Price> {
        let bid = self.get_best_bid()?;
        let ask = self.get_best_ask()?;
        Some(ask - bid)
    }

    /// Up to `n` `(price, aggregate_volume)` pairs, best bid first.
    pub fn get_bids(&self, n: usize) -> Vec<PriceAndQuantity> {
        self.bids.depth(n)
    }

    /// Up to `n` `(price, aggregate_volume)` pairs, best ask first.
    pub fn get_asks(&self, n: usize) -> Vec<PriceAndQuantity> {
        self.asks.depth(n)
    }

    pub fn get_bid_volume_at_price(&self, price: Price) -> Quantity {
        self.bids.volume_at(price)
    }

    pub fn get_ask_volume_at_price(&self, price: Price) -> Quantity {
        self.asks.volume_at(price)
    }

    pub fn get_total_bid_volume(&self) -> Quantity {
        self.bids.total_volume()
    }

    pub fn get_total_ask_volume(&self) -> Quantity {
        self.asks.total_volume()
    }

    /// Count of live orders across both sides of the book.
    pub fn get_order_count(&self) -> usize {
        self.index.len()
    }

    pub fn get_trade_count(&self) -> usize {
        self.trades.len()
    }

    /// A snapshot copy of the full trade log. The caller may hold it
    /// arbitrarily long without affecting the book.
    pub fn get_trades(&self) -> Trades {
        self.trades.clone()
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    #[cfg(test)]
    pub(crate) fn bid_order_count(&self) -> usize {
        self.bids.order_count()
    }

    #[cfg(test)]
    pub(crate) fn ask_order_count(&self) -> usize {
        self.asks.order_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Price {
        s.parse().unwrap()
    }

    fn new_book() -> OrderBook {
        OrderBook::new("TEST")
    }

    #[test]
    fn empty_book_reports_no_top_of_book() {
        let book = new_book();
        assert_eq!(book.get_symbol(), "TEST");
        assert_eq!(book.get_order_count(), 0);
        assert_eq!(book.get_trade_count(), 0);
        assert_eq!(book.get_best_bid(), None);
        assert_eq!(book.get_best_ask(), None);
        assert_eq!(book.get_mid_price(), None);
        assert_eq!(book.get_spread(), None);
    }

    #[test]
    fn price_priority_on_bids() {
        let mut book = new_book();
        assert!(book.add_limit_order(1, Side::Buy, p("100"), 10));
        assert!(book.add_limit_order(2, Side::Buy, p("101"), 20));
        assert!(book.add_limit_order(3, Side::Buy, p("99"), 30));

        assert_eq!(book.get_best_bid(), Some(p("101")));
        assert_eq!(book.get_order_count(), 3);
        assert_eq!(book.get_trade_count(), 0);
    }

    #[test]
    fn full_match_empties_both_sides() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Buy, p("100"), 50);
        book.add_limit_order(2, Side::Sell, p("100"), 50);

        assert_eq!(book.get_trade_count(), 1);
        let trade = &book.get_trades()[0];
        assert_eq!(trade.price, p("100"));
        assert_eq!(trade.quantity, 50);
        assert_eq!(book.get_order_count(), 0);
    }

    #[test]
    fn partial_match_leaves_residual_on_maker_side() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Buy, p("100"), 50);
        book.add_limit_order(2, Side::Sell, p("100"), 30);

        assert_eq!(book.get_trade_count(), 1);
        assert_eq!(book.get_trades()[0].quantity, 30);
        assert_eq!(book.get_bid_volume_at_price(p("100")), 20);
        assert_eq!(book.get_order_count(), 1);
    }

    #[test]
    fn market_order_sweeps_multiple_levels() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Sell, p("100"), 50);
        book.add_limit_order(2, Side::Sell, p("101"), 30);

        assert!(book.add_market_order(3, Side::Buy, 60));

        assert_eq!(book.get_trade_count(), 2);
        let trades = book.get_trades();
        assert_eq!(trades[0].quantity, 50);
        assert_eq!(trades[1].quantity, 10);
        assert_eq!(book.get_best_ask(), Some(p("101")));
        assert_eq!(book.get_ask_volume_at_price(p("101")), 20);
    }

    #[test]
    fn market_order_residual_is_dropped_silently() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Sell, p("100"), 10);

        assert!(book.add_market_order(2, Side::Buy, 100));

        assert_eq!(book.get_trade_count(), 1);
        assert_eq!(book.get_trades()[0].quantity, 10);
        assert!(book.get_best_ask().is_none());
        assert_eq!(book.get_order_count(), 0);
    }

    #[test]
    fn price_improvement_accrues_to_the_aggressor() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Sell, p("100.00"), 10);
        book.add_limit_order(2, Side::Buy, p("100.50"), 10);

        assert_eq!(book.get_trades()[0].price, p("100.00"));
    }

    #[test]
    fn cancel_and_modify_round_trip() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Buy, p("100"), 50);

        assert!(book.modify_order(1, 75));
        assert_eq!(book.get_bid_volume_at_price(p("100")), 75);

        assert!(book.modify_order(1, 25));
        assert_eq!(book.get_bid_volume_at_price(p("100")), 25);

        assert!(book.cancel_order(1));
        assert_eq!(book.get_order_count(), 0);
        assert!(book.get_best_bid().is_none());
    }

    #[test]
    fn cancel_is_not_idempotent_on_success() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Buy, p("100"), 50);
        book.add_limit_order(2, Side::Buy, p("99"), 30);

        assert!(book.cancel_order(1));
        assert_eq!(book.get_order_count(), 1);
        assert_eq!(book.get_best_bid(), Some(p("99")));

        assert!(!book.cancel_order(1));
        assert!(!book.cancel_order(999));
    }

    #[test]
    fn modify_up_requeues_at_tail_losing_priority() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Buy, p("100"), 10);
        book.add_limit_order(2, Side::Buy, p("100"), 10);

        assert!(book.modify_order(1, 25));

        // order 2 now fills first despite arriving second, since order 1
        // lost its place in the FIFO by growing.
        let trades_before = book.get_trade_count();
        book.add_limit_order(3, Side::Sell, p("100"), 10);
        assert_eq!(book.get_trade_count(), trades_before + 1);
        assert_eq!(book.get_trades().last().unwrap().buy_order_id, 2);
        assert_eq!(book.get_bid_volume_at_price(p("100")), 25);
    }

    #[test]
    fn modify_down_preserves_priority() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Buy, p("100"), 10);
        book.add_limit_order(2, Side::Buy, p("100"), 10);

        assert!(book.modify_order(1, 5));

        book.add_limit_order(3, Side::Sell, p("100"), 5);
        assert_eq!(book.get_trades().last().unwrap().buy_order_id, 1);
    }

    #[test]
    fn duplicate_id_is_rejected_without_mutation() {
        let mut book = new_book();
        assert!(book.add_limit_order(1, Side::Buy, p("100"), 10));
        assert!(!book.add_limit_order(1, Side::Sell, p("101"), 5));
        assert_eq!(book.get_order_count(), 1);
    }

    #[test]
    fn non_positive_quantity_and_price_are_rejected() {
        let mut book = new_book();
        assert!(!book.add_limit_order(1, Side::Buy, p("100"), 0));
        assert!(!book.add_limit_order(1, Side::Buy, p("0"), 10));
        assert!(!book.add_market_order(1, Side::Buy, -5));
        assert_eq!(book.get_order_count(), 0);
    }

    #[test]
    fn unknown_id_operations_return_false() {
        let mut book = new_book();
        assert!(!book.cancel_order(404));
        assert!(!book.modify_order(404, 10));
    }

    #[test]
    fn mid_price_and_spread_are_derived_from_top_of_book() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Buy, p("100"), 50);
        book.add_limit_order(2, Side::Sell, p("101"), 30);

        assert_eq!(book.get_mid_price(), Some(p("100.5")));
        assert_eq!(book.get_spread(), Some(p("1")));
    }

    #[test]
    fn trade_log_sequence_is_contiguous() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Sell, p("100"), 10);
        book.add_limit_order(2, Side::Sell, p("101"), 10);
        book.add_market_order(3, Side::Buy, 20);

        let sequences: Vec<_> = book.get_trades().iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
    }

    #[test]
    fn order_count_matches_index_after_mixed_activity() {
        let mut book = new_book();
        book.add_limit_order(1, Side::Buy, p("100"), 10);
        book.add_limit_order(2, Side::Buy, p("99"), 10);
        book.add_limit_order(3, Side::Sell, p("100"), 5);
        book.cancel_order(2);

        assert_eq!(book.get_order_count(), book.bid_order_count() + book.ask_order_count());
    }
}
