//! # Order Book CLI
//!
//! A command-line interface for interacting with a single-symbol limit
//! order book. Supports one-shot subcommands and an interactive REPL mode.

use clap::{Parser, Subcommand};
use order_book_core::{OrderBook, Side};
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "order-book-cli")]
#[command(about = "A limit order book CLI", long_about = None)]
struct Cli {
    /// Symbol this book trades (e.g., AAPL)
    #[arg(long, default_value = "AAPL")]
    symbol: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a limit order
    #[command(name = "limit")]
    Limit {
        side: Side,
        price: String,
        quantity: i64,
        id: u64,
    },
    /// Place a market order
    #[command(name = "market")]
    Market { side: Side, quantity: i64, id: u64 },
    /// Cancel a live order
    #[command(name = "cancel")]
    Cancel { id: u64 },
    /// Change a live order's quantity
    #[command(name = "modify")]
    Modify { id: u64, quantity: i64 },
    /// Show best bid and ask prices
    #[command(name = "best")]
    Best,
    /// Show market depth
    #[command(name = "depth")]
    Depth {
        #[arg(default_value = "5")]
        levels: usize,
    },
    /// Show mid price and spread
    #[command(name = "spread")]
    Spread,
    /// Show the trade log
    #[command(name = "trades")]
    Trades,
    /// Clear the order book (interactive mode)
    #[command(name = "clear")]
    Clear,
    /// Exit interactive mode
    #[command(name = "quit", aliases = ["exit", "q"])]
    Quit,
    /// Start interactive mode
    #[command(name = "interactive")]
    Interactive,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        None => run_interactive_mode(cli.symbol),
        Some(Commands::Interactive) => run_interactive_mode(cli.symbol),
        Some(command) => {
            let mut book = OrderBook::new(cli.symbol);
            match run_one_shot(&mut book, command) {
                Ok(()) => {}
                Err(message) => {
                    eprintln!("Error: {message}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn run_one_shot(book: &mut OrderBook, command: Commands) -> Result<(), String> {
    match command {
        Commands::Limit { side, price, quantity, id } => {
            let price = parse_price(&price)?;
            if book.add_limit_order(id, side, price, quantity) {
                println!("Order {id} accepted.");
                print_trades_since(book, 0);
            } else {
                return Err(format!("order {id} rejected"));
            }
        }
        Commands::Market { side, quantity, id } => {
            if book.add_market_order(id, side, quantity) {
                println!("Order {id} accepted.");
                print_trades_since(book, 0);
            } else {
                return Err(format!("order {id} rejected"));
            }
        }
        Commands::Cancel { id } => {
            if book.cancel_order(id) {
                println!("Order {id} cancelled.");
            } else {
                return Err(format!("order {id} not live"));
            }
        }
        Commands::Modify { id, quantity } => {
            if book.modify_order(id, quantity) {
                println!("Order {id} modified to {quantity}.");
            } else {
                return Err(format!("order {id} not live or quantity invalid"));
            }
        }
        Commands::Best => print_best(book),
        Commands::Depth { levels } => print_depth(book, levels),
        Commands::Spread => print_spread(book),
        Commands::Trades => {
            for trade in book.get_trades() {
                println!("{trade}");
            }
        }
        Commands::Clear | Commands::Quit | Commands::Interactive => {
            return Err("this command is only available in interactive mode".to_string());
        }
    }
    Ok(())
}

fn parse_price(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw).map_err(|_| format!("invalid price: {raw}"))
}

fn parse_interactive_command(input: &str) -> Result<Commands, String> {
    let args = shlex::split(input).ok_or("invalid command syntax")?;
    if args.is_empty() {
        return Err("empty command".to_string());
    }
    let mut full_args = vec!["order-book-cli".to_string()];
    full_args.extend(args);

    match Cli::try_parse_from(full_args) {
        Ok(cli) => cli.command.ok_or_else(|| "interactive mode not available within interactive mode".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn run_interactive_mode(symbol: String) {
    println!("=== Order Book Interactive CLI ===");
    println!("Type 'help' for available commands, 'quit' to exit\n");

    let mut book = OrderBook::new(symbol);
    println!("Symbol: {}\n", book.get_symbol());

    let mut next_id = 1u64;
    let mut trades_seen = 0usize;

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "help" || trimmed == "h" {
                    show_help();
                    continue;
                }

                match parse_interactive_command(trimmed) {
                    Ok(Commands::Quit) => {
                        println!("Goodbye!");
                        break;
                    }
                    Ok(Commands::Clear) => {
                        book = OrderBook::new(book.get_symbol().to_string());
                        next_id = 1;
                        trades_seen = 0;
                        println!("Order book cleared.");
                    }
                    Ok(Commands::Limit { side, price, quantity, id }) => {
                        let id = resolve_id(Some(id), &mut next_id);
                        match parse_price(&price) {
                            Ok(price) => {
                                if book.add_limit_order(id, side, price, quantity) {
                                    println!("Order {id} accepted.");
                                } else {
                                    println!("Order {id} rejected.");
                                }
                                print_trades_since(&mut book, trades_seen);
                                trades_seen = book.get_trade_count();
                                print_best(&book);
                            }
                            Err(message) => println!("Error: {message}"),
                        }
                    }
                    Ok(Commands::Market { side, quantity, id }) => {
                        let id = resolve_id(Some(id), &mut next_id);
                        if book.add_market_order(id, side, quantity) {
                            println!("Order {id} accepted.");
                        } else {
                            println!("Order {id} rejected.");
                        }
                        print_trades_since(&mut book, trades_seen);
                        trades_seen = book.get_trade_count();
                        print_best(&book);
                    }
                    Ok(Commands::Cancel { id }) => {
                        if book.cancel_order(id) {
                            println!("Order {id} cancelled.");
                        } else {
                            println!("Order {id} not live.");
                        }
                    }
                    Ok(Commands::Modify { id, quantity }) => {
                        if book.modify_order(id, quantity) {
                            println!("Order {id} modified to {quantity}.");
                        } else {
                            println!("Order {id} not live or quantity invalid.");
                        }
                    }
                    Ok(Commands::Best) => print_best(&book),
                    Ok(Commands::Depth { levels }) => print_depth(&book, levels),
                    Ok(Commands::Spread) => print_spread(&book),
                    Ok(Commands::Trades) => {
                        for trade in book.get_trades() {
                            println!("{trade}");
                        }
                    }
                    Ok(Commands::Interactive) => println!("Already in interactive mode."),
                    Err(e) => {
                        if e.contains("unexpected argument") || e.contains("invalid value") {
                            println!("Invalid command. Type 'help' for available commands.");
                        } else if e.contains("required arguments") {
                            println!("Missing required arguments. Type 'help' for usage.");
                        } else {
                            println!("Error: {}", e.lines().next().unwrap_or("invalid command"));
                        }
                    }
                }
            }
            Err(error) => {
                println!("Error reading input: {error}");
                break;
            }
        }
    }
}

fn resolve_id(given: Option<u64>, next_id: &mut u64) -> u64 {
    given.unwrap_or_else(|| {
        let id = *next_id;
        *next_id += 1;
        id
    })
}

fn show_help() {
    println!("Available Commands:");
    println!("  limit <side> <price> <quantity> <id>   - Place a limit order");
    println!("  market <side> <quantity> <id>          - Place a market order");
    println!("  cancel <id>                            - Cancel a live order");
    println!("  modify <id> <quantity>                 - Change a live order's quantity");
    println!("  best                                   - Show best bid and ask");
    println!("  depth [levels]                         - Show market depth (default: 5)");
    println!("  spread                                 - Show mid price and spread");
    println!("  trades                                 - Show the trade log");
    println!("  clear                                   - Clear the order book");
    println!("  help | h                                - Show this help message");
    println!("  quit | exit | q                         - Exit the CLI");
}

fn print_trades_since(book: &mut OrderBook, seen: usize) {
    let trades = book.get_trades();
    for trade in trades.iter().skip(seen) {
        println!("  {trade}");
    }
}

fn print_best(book: &OrderBook) {
    match (book.get_best_bid(), book.get_best_ask()) {
        (Some(bid), Some(ask)) => println!("Best bid: {bid} | Best ask: {ask}"),
        (Some(bid), None) => println!("Best bid: {bid} | Best ask: none"),
        (None, Some(ask)) => println!("Best bid: none | Best ask: {ask}"),
        (None, None) => println!("Order book is empty"),
    }
}

fn print_depth(book: &OrderBook, levels: usize) {
    let asks = book.get_asks(levels);
    let bids = book.get_bids(levels);

    for (price, qty) in asks.iter().rev() {
        println!("  ask {qty} @ {price}");
    }
    if !asks.is_empty() && !bids.is_empty() {
        println!("  ------------------");
    }
    for (price, qty) in &bids {
        println!("  bid {qty} @ {price}");
    }
}

fn print_spread(book: &OrderBook) {
    match (book.get_mid_price(), book.get_spread()) {
        (Some(mid), Some(spread)) => println!("Mid: {mid} | Spread: {spread}"),
        _ => println!("Spread unavailable: book is one-sided or empty"),
    }
}
