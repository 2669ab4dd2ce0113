// trade_report.rs - CLI tool for querying pet price history
//
// Usage:
//   cargo run --bin trade_report -- --pet Aurelia            # Price report
//   cargo run --bin trade_report -- --pet Aurelia --days 7   # Shorter window
//   cargo run --bin trade_report                             # Market overview

use anyhow::Result;
use clap::Parser;
use pet_auction_house::persistence::AuctionStore;
use pet_auction_house::pricing::{PetActivity, PriceReport};
use pet_auction_house::settings::{self, Config, DEFAULT_WINDOW_DAYS};

#[derive(Parser)]
#[command(name = "trade_report")]
#[command(about = "Query recorded trades and price summaries")]
struct Args {
    /// Database path (default: DB_PATH from the environment)
    #[arg(long)]
    db: Option<String>,

    /// Pet to report on; omit for a market overview of all pets
    #[arg(long)]
    pet: Option<String>,

    /// Days to look back (1-365)
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    days: u32,

    /// Output format: table, csv, json
    #[arg(long, default_value = "table")]
    format: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !settings::validate_window_days(args.days) {
        anyhow::bail!(
            "days must be between {} and {}",
            settings::MIN_WINDOW_DAYS,
            settings::MAX_WINDOW_DAYS
        );
    }

    let db_path = match args.db {
        Some(path) => path,
        None => Config::from_env()?.db_path,
    };
    let store = AuctionStore::open(&db_path)?;

    match &args.pet {
        Some(pet) => {
            if store.get_pet_by_name(pet)?.is_none() {
                anyhow::bail!("pet '{}' not found in database", pet);
            }
            let report = store.price_report(pet, args.days)?;
            match args.format.to_lowercase().as_str() {
                "csv" => print_report_csv(&report),
                "json" => print_json(&report)?,
                _ => print_report_table(&report),
            }
        }
        None => {
            let overview = store.market_overview(args.days)?;
            match args.format.to_lowercase().as_str() {
                "csv" => print_overview_csv(&overview),
                "json" => print_json(&overview)?,
                _ => print_overview_table(&overview, args.days),
            }
        }
    }

    Ok(())
}

/// Print a single-pet price report as a formatted table
fn print_report_table(report: &PriceReport) {
    println!("\n=== PRICE REPORT: {} ===\n", report.pet_name);
    println!(
        "Window: last {} days | Total trades: {}",
        report.window_days, report.total_trades
    );

    if report.total_trades == 0 {
        println!("\nNo trades recorded in this window.");
        return;
    }

    println!();
    println!("{:<12} {:>8}  {}", "Rarity", "Trades", "Typically received");
    println!("{}", "-".repeat(70));
    for (rarity, prices) in &report.by_rarity {
        println!("{:<12} {:>8}  {}", rarity.to_string(), prices.trade_count, prices.summary);
    }
}

/// Print a single-pet price report as CSV
fn print_report_csv(report: &PriceReport) {
    println!("pet,window_days,rarity,trade_count,summary");
    for (rarity, prices) in &report.by_rarity {
        println!(
            "{},{},{},{},\"{}\"",
            report.pet_name, report.window_days, rarity, prices.trade_count, prices.summary
        );
    }
}

/// Print the market overview as a formatted table
fn print_overview_table(overview: &[PetActivity], days: u32) {
    println!("\n=== MARKET OVERVIEW (last {} days) ===\n", days);

    if overview.is_empty() {
        println!("No trades recorded in this window.");
        return;
    }

    println!("{:<4} {:<12} {:>8}", "#", "Pet", "Trades");
    println!("{}", "-".repeat(28));
    for (rank, activity) in overview.iter().enumerate() {
        println!(
            "{:<4} {:<12} {:>8}",
            rank + 1,
            activity.pet_name,
            activity.trade_count
        );
    }
}

/// Print the market overview as CSV
fn print_overview_csv(overview: &[PetActivity]) {
    println!("pet,trade_count");
    for activity in overview {
        println!("{},{}", activity.pet_name, activity.trade_count);
    }
}

/// Print any serializable value as pretty JSON
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
