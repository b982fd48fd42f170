use derive_more::Display;
use rust_decimal::Decimal;

/// Caller-supplied unique identifier for an order.
pub type Id = u64;
/// Execution/limit price. Exact decimal comparisons are used throughout,
/// price keys are reused verbatim, never recomputed from arithmetic.
pub type Price = Decimal;
/// Quantity, in whatever units the caller's instrument trades in.
pub type Quantity = i64;
/// Monotonically increasing counter: order arrival order and trade order.
pub type Sequence = u64;

pub type PriceAndQuantity = (Price, Quantity);

/// Represents the side of an order in the order book.
///
/// Orders can be either buy orders (bids) or sell orders (asks).
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "cli", value(rename_all = "lower"))]
pub enum Side {
    /// Buy order (bid) - willing to buy at specified price or lower
    Buy,
    /// Sell order (ask) - willing to sell at specified price or higher
    Sell,
}

impl Side {
    /// The side a match for this order is drawn from.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// A live, resting order in the book.
///
/// Only orders that still have quantity resting in a price level are
/// represented by this type: an incoming order that fully matches, or a
/// market order, never becomes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique identifier for the order
    pub id: Id,
    /// Whether this is a buy or sell order
    pub side: Side,
    /// Limit price this order rests at
    pub price: Price,
    /// Quantity still unfilled
    pub quantity: Quantity,
    /// Arrival sequence assigned at admission; the logical FIFO tie-breaker
    pub sequence: Sequence,
}

impl Order {
    pub fn new(id: Id, side: Side, price: Price, quantity: Quantity, sequence: Sequence) -> Self {
        Order {
            id,
            side,
            price,
            quantity,
            sequence,
        }
    }
}

/// Represents a completed trade between two orders.
///
/// A trade occurs when a buy and sell order match at an agreed price. The
/// trade price is always the resting order's price: price improvement
/// accrues to the order that crossed the spread.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
#[display(
    "Trade #{}: {} @ {} (buy: {}, sell: {})",
    sequence,
    quantity,
    price,
    buy_order_id,
    sell_order_id
)]
pub struct Trade {
    /// Execution price of the trade (the resting order's price)
    pub price: Price,
    /// Number of units traded
    pub quantity: Quantity,
    /// ID of the buy-side order
    pub buy_order_id: Id,
    /// ID of the sell-side order
    pub sell_order_id: Id,
    /// Position of this trade in the book's append-only trade log
    pub sequence: Sequence,
}

/// A collection of trades, typically returned as a snapshot of the trade log.
pub type Trades = Vec<Trade>;

/// Rejection reasons for facade operations.
///
/// These never escape the crate as an error type: every public operation
/// collapses them to the boolean/`Option` surface the facade exposes. They
/// exist so logging and tests can distinguish *why* an operation was
/// rejected.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBookError {
    /// An order with this id is already live in the book
    #[display("order {} already live in book", 0)]
    DuplicateOrderId(Id),
    /// Quantity must be strictly positive
    #[display("order {} quantity {} must be positive", id, quantity)]
    InvalidQuantity { id: Id, quantity: Quantity },
    /// Limit price must be strictly positive
    #[display("order {} price {} must be positive", id, price)]
    InvalidPrice { id: Id, price: Price },
    /// No live order with this id
    #[display("order {} is not live", 0)]
    UnknownOrderId(Id),
}
