// import_trades.rs - Import historical trade data into the auction house database
//
// Expects CSV rows of:
//   user_id,gave_pet,gave_qty,gave_rarity,received_pet,received_qty,received_rarity,created_at_ms
// Malformed rows are skipped with a warning rather than aborting the run.

use anyhow::{Context, Result};
use clap::Parser;
use pet_auction_house::models::{Rarity, Trade};
use pet_auction_house::persistence::AuctionStore;
use pet_auction_house::settings::{Config, MAX_QUANTITY, MIN_QUANTITY};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "import_trades")]
#[command(about = "Import historical trade data from CSV")]
struct Args {
    /// Path to CSV file to import
    csv_file: PathBuf,

    /// Path to SQLite database (default: DB_PATH from the environment)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Preview import without writing to database
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

struct ImportStats {
    total: usize,
    imported: usize,
    skipped: usize,
    errors: usize,
}

impl ImportStats {
    fn new(total: usize) -> Self {
        Self {
            total,
            imported: 0,
            skipped: 0,
            errors: 0,
        }
    }

    fn print_summary(&self) {
        println!("\nImport Summary:");
        println!("Total rows:    {:>6}", self.total);
        println!("Imported:      {:>6}", self.imported);
        println!("Skipped:       {:>6} (unknown pets)", self.skipped);
        println!("Errors:        {:>6}", self.errors);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let read = read_csv_file(&args.csv_file)?;
    println!(
        "Parsed {} trades ({} malformed rows skipped)",
        read.trades.len(),
        read.malformed_rows
    );

    if args.dry_run {
        println!("Dry run - nothing written.");
        return Ok(());
    }

    let db_path = match args.db {
        Some(path) => path,
        None => PathBuf::from(Config::from_env()?.db_path),
    };
    let store = AuctionStore::open(&db_path)?;
    let stats = import_trades(&store, read.trades)?;
    stats.print_summary();
    Ok(())
}

/// Insert trades, skipping rows whose pets are not in the catalog
fn import_trades(store: &AuctionStore, trades: Vec<Trade>) -> Result<ImportStats> {
    let catalog = store.pet_catalog()?;
    let mut stats = ImportStats::new(trades.len());

    for trade in trades {
        if catalog.resolve(&trade.gave_pet).is_none() || catalog.resolve(&trade.received_pet).is_none()
        {
            eprintln!(
                "Warning: skipping trade with unknown pet ({} -> {})",
                trade.gave_pet, trade.received_pet
            );
            stats.skipped += 1;
            continue;
        }

        match store.insert_trade(&trade) {
            Ok(_) => stats.imported += 1,
            Err(e) => {
                eprintln!("Error inserting trade: {}", e);
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

/// Result of reading the CSV file - parsed trades plus error counts
struct CsvReadResult {
    trades: Vec<Trade>,
    malformed_rows: usize,
}

/// Read the CSV file, parsing each row into a Trade
/// Handles malformed rows gracefully by skipping them
fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<CsvReadResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("Failed to open CSV file")?;

    let mut trades = Vec::new();
    let mut malformed_rows = 0;
    let mut line_num = 0;

    for result in reader.records() {
        line_num += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Warning: Skipping malformed row at line {}: {}", line_num + 1, e);
                malformed_rows += 1;
                continue;
            }
        };

        if record.len() != 8 {
            eprintln!(
                "Warning: Skipping row at line {} with {} fields (expected 8)",
                line_num + 1,
                record.len()
            );
            malformed_rows += 1;
            continue;
        }

        match parse_row(&record) {
            Ok(trade) => trades.push(trade),
            Err(e) => {
                eprintln!("Warning: Skipping row at line {}: {}", line_num + 1, e);
                malformed_rows += 1;
            }
        }
    }

    Ok(CsvReadResult {
        trades,
        malformed_rows,
    })
}

fn parse_row(record: &csv::StringRecord) -> Result<Trade> {
    let user_id: i64 = record[0].trim().parse().context("bad user_id")?;
    let gave_qty = parse_qty(record[2].trim())?;
    let gave_rarity: Rarity = record[3].trim().parse().map_err(anyhow::Error::msg)?;
    let received_qty = parse_qty(record[5].trim())?;
    let received_rarity: Rarity = record[6].trim().parse().map_err(anyhow::Error::msg)?;
    let created_at_ms: i64 = record[7].trim().parse().context("bad created_at_ms")?;

    Ok(Trade {
        id: 0,
        user_id,
        gave_pet: record[1].trim().to_string(),
        gave_qty,
        gave_rarity,
        received_pet: record[4].trim().to_string(),
        received_qty,
        received_rarity,
        created_at_ms,
    })
}

fn parse_qty(raw: &str) -> Result<u32> {
    let qty: u32 = raw.parse().context("bad quantity")?;
    anyhow::ensure!(
        (MIN_QUANTITY..=MAX_QUANTITY).contains(&qty),
        "quantity {} out of range",
        qty
    );
    Ok(qty)
}
