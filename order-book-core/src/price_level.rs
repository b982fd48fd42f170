use crate::types::{Id, Order, Price, Quantity};
use std::collections::VecDeque;

/// FIFO queue of every live order resting at one price on one side.
///
/// Orders are matched head-first (time priority). `volume` is a running
/// cache of the sum of resting quantities so depth queries never have to
/// walk the queue.
#[derive(Debug)]
pub(crate) struct PriceLevel {
    pub(crate) price: Price,
    pub(crate) orders: VecDeque<Order>,
    pub(crate) volume: Quantity,
}

impl PriceLevel {
    pub(crate) fn new(price: Price) -> Self {
        PriceLevel {
            price,
            orders: VecDeque::new(),
            volume: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Push an order onto the tail of the queue, it becomes the last to
    /// fill among orders at this price.
    pub(crate) fn append(&mut self, order: Order) {
        self.volume += order.quantity;
        self.orders.push_back(order);
    }

    /// Pop the order at the head of the queue, once it has been fully
    /// filled. Its remaining quantity is zero at this point, so `volume`
    /// is unaffected beyond that.
    pub(crate) fn remove_front(&mut self) -> Option<Order> {
        let order = self.orders.pop_front()?;
        self.volume -= order.quantity;
        Some(order)
    }

    /// Decrement the head order's remaining quantity by `delta` (a partial
    /// fill that does not exhaust it). The caller guarantees `delta` does
    /// not exceed the head's remaining quantity.
    pub(crate) fn adjust_head_remaining(&mut self, delta: Quantity) {
        if let Some(order) = self.orders.front_mut() {
            order.quantity -= delta;
            self.volume -= delta;
        }
    }

    /// Unlink an order from anywhere in the queue, used by cancel and by
    /// modify-down. `O(n)` in the number of orders at this price: a plain
    /// `VecDeque` has no interior handle to unlink in `O(1)`, so finding the
    /// order costs a scan. This price-scoped scan (not a whole-book scan)
    /// is the same tradeoff other VecDeque-backed books in the wild accept.
    pub(crate) fn remove_by_id(&mut self, id: Id) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == id)?;
        let order = self.orders.remove(pos)?;
        self.volume -= order.quantity;
        Some(order)
    }

    /// Set an order's quantity in place without touching its queue
    /// position (modify-down preserves time priority). Returns the
    /// previous quantity.
    pub(crate) fn set_quantity(&mut self, id: Id, new_quantity: Quantity) -> Option<Quantity> {
        let order = self.orders.iter_mut().find(|o| o.id == id)?;
        let old = order.quantity;
        order.quantity = new_quantity;
        self.volume = self.volume - old + new_quantity;
        Some(old)
    }
}
