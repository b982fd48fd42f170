//! # Order Book Demo
//!
//! Demonstrates the order book's behavior end to end: resting liquidity,
//! crossing limit orders, a market sweep, and order lifecycle management
//! (modify and cancel).

use order_book_core::{OrderBook, Side};
use rust_decimal::Decimal;
use std::str::FromStr;

fn main() {
    tracing_subscriber::fmt::init();
    println!("=== Limit Order Book Demo ===\n");

    let mut book = OrderBook::new("AAPL");
    println!("Symbol: {}\n", book.get_symbol());

    demo_resting_liquidity(&mut book);
    demo_crossing_limit_order(&mut book);
    demo_market_sweep(&mut book);
    demo_modify_and_cancel(&mut book);
}

/// Builds a resting book on both sides and inspects depth and volume.
fn demo_resting_liquidity(book: &mut OrderBook) {
    println!("-----------------------------");
    println!("1. Building resting liquidity");
    println!("-----------------------------");

    place(book, Side::Buy, "98.00", 20, 1);
    place(book, Side::Buy, "99.00", 15, 2);
    place(book, Side::Buy, "100.00", 10, 3);
    place(book, Side::Sell, "101.00", 10, 4);
    place(book, Side::Sell, "102.00", 15, 5);
    place(book, Side::Sell, "103.00", 20, 6);

    print_book_state(book);
}

/// A limit order that crosses the spread immediately fills against the
/// resting side, at the resting order's price (price improvement accrues
/// to the order that crossed).
fn demo_crossing_limit_order(book: &mut OrderBook) {
    println!("\n------------------------------");
    println!("2. Aggressive limit order cross");
    println!("------------------------------");

    let before = book.get_trade_count();
    place(book, Side::Buy, "102.00", 30, 7);
    print_new_trades(book, before);
    print_book_state(book);
}

/// A market order sweeps through every resting price level in order until
/// it is filled or the opposite side is exhausted.
fn demo_market_sweep(book: &mut OrderBook) {
    println!("\n-------------------");
    println!("3. Market order sweep");
    println!("-------------------");

    let before = book.get_trade_count();
    println!("Placing market SELL order: ID=8, Qty=40");
    book.add_market_order(8, Side::Sell, 40);
    print_new_trades(book, before);
    print_book_state(book);
}

/// Demonstrates modifying a resting order's quantity and cancelling it.
fn demo_modify_and_cancel(book: &mut OrderBook) {
    println!("\n--------------------------");
    println!("4. Modify and cancel orders");
    println!("--------------------------");

    place(book, Side::Buy, "95.00", 5, 9);
    println!("Modifying order 9 to quantity 25 (loses time priority)");
    book.modify_order(9, 25);
    println!("  bid volume at 95.00: {}", book.get_bid_volume_at_price(decimal("95.00")));

    println!("Cancelling order 9");
    book.cancel_order(9);
    println!("  bid volume at 95.00: {}", book.get_bid_volume_at_price(decimal("95.00")));

    print_book_state(book);
}

fn place(book: &mut OrderBook, side: Side, price: &str, quantity: i64, id: u64) {
    println!("Placing {side} order: ID={id}, Price={price}, Qty={quantity}");
    book.add_limit_order(id, side, decimal(price), quantity);
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).expect("demo prices are well-formed")
}

fn print_new_trades(book: &OrderBook, since: usize) {
    let trades = book.get_trades();
    if trades.len() == since {
        println!("--No trades executed");
        return;
    }
    println!("--Trades executed:");
    for trade in &trades[since..] {
        println!("----{trade}");
    }
}

fn print_book_state(book: &OrderBook) {
    println!("--Book state:");
    match book.get_best_bid() {
        Some(price) => println!(
            "----Best BID: {} @ {price}",
            book.get_bid_volume_at_price(price)
        ),
        None => println!("----Best BID: none"),
    }
    match book.get_best_ask() {
        Some(price) => println!(
            "----Best ASK: {} @ {price}",
            book.get_ask_volume_at_price(price)
        ),
        None => println!("----Best ASK: none"),
    }
    match (book.get_mid_price(), book.get_spread()) {
        (Some(mid), Some(spread)) => println!("----Mid: {mid}  Spread: {spread}"),
        _ => println!("----Mid/spread unavailable (one-sided or empty book)"),
    }
}
