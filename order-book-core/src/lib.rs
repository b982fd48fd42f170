//! # Order Book Core
//!
//! A single-symbol limit order book with an integrated continuous matching
//! engine, following strict price-time priority.
//!
//! This crate provides the core data structures and algorithms for maintaining
//! a limit order book: placing limit and market orders, cancelling and
//! modifying resting orders, and querying depth, volume and the trade log.
//!
//! ## Example
//!
//! ```rust
//! use order_book_core::{OrderBook, Side};
//! use rust_decimal::Decimal;
//!
//! let mut book = OrderBook::new("AAPL");
//!
//! // Rest a buy order, nothing to match against yet.
//! assert!(book.add_limit_order(1, Side::Buy, Decimal::new(10000, 2), 10));
//! assert_eq!(book.get_trade_count(), 0);
//!
//! // A crossing sell order matches it immediately.
//! assert!(book.add_limit_order(2, Side::Sell, Decimal::new(10000, 2), 10));
//! assert_eq!(book.get_trade_count(), 1);
//! ```

mod book;
mod ladder;
mod matching;
mod price_level;
pub mod types;

pub use book::OrderBook;
pub use types::{Order, OrderBookError, Side, Trade, Trades};
