use crate::price_level::PriceLevel;
use crate::types::{Order, Price, PriceAndQuantity, Quantity, Side};
use std::collections::BTreeMap;

/// One side of the book: a sorted map from price to price level.
///
/// Bids (buy side) read best-to-worst as price-descending; asks (sell
/// side) read best-to-worst as price-ascending. `BTreeMap` gives `O(log P)`
/// insertion/removal and in-order traversal, where `P` is the number of
/// distinct live prices on this side.
#[derive(Debug)]
pub(crate) struct Ladder {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl Ladder {
    pub(crate) fn new(side: Side) -> Self {
        Ladder {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// The best (most aggressive) price currently resting on this side.
    pub(crate) fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    pub(crate) fn best(&self) -> Option<PriceAndQuantity> {
        let price = self.best_price()?;
        self.levels.get(&price).map(|level| (price, level.volume))
    }

    pub(crate) fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Drop a price level once it has no orders left. A no-op if the level
    /// still holds orders or is already gone.
    pub(crate) fn remove_level_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    /// Append `order` to the tail of its price level, creating the level
    /// if this is the first order at that price.
    pub(crate) fn insert_order(&mut self, order: Order) {
        self.levels
            .entry(order.price)
            .or_insert_with(|| PriceLevel::new(order.price))
            .append(order);
    }

    pub(crate) fn volume_at(&self, price: Price) -> Quantity {
        self.levels.get(&price).map_or(0, |level| level.volume)
    }

    pub(crate) fn total_volume(&self) -> Quantity {
        self.levels.values().map(|level| level.volume).sum()
    }

    pub(crate) fn order_count(&self) -> usize {
        self.levels.values().map(|level| level.orders.len()).sum()
    }

    /// Up to `n` `(price, volume)` pairs, best price first.
    pub(crate) fn depth(&self, n: usize) -> Vec<PriceAndQuantity> {
        let iter: Box<dyn Iterator<Item = (&Price, &PriceLevel)>> = match self.side {
            Side::Buy => Box::new(self.levels.iter().rev()),
            Side::Sell => Box::new(self.levels.iter()),
        };
        iter.take(n).map(|(price, level)| (*price, level.volume)).collect()
    }
}
