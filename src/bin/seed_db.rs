// seed_db.rs - Initialize the auction house database
//
// Opening the store creates the schema and seeds the pets table; pass
// --demo to also load a handful of sample listings and trades for
// exercising the report tooling against realistic data.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use pet_auction_house::models::{Rarity, Section, Trade, TradeEntry};
use pet_auction_house::persistence::AuctionStore;
use pet_auction_house::settings::Config;

#[derive(Parser)]
#[command(name = "seed_db")]
#[command(about = "Initialize the auction house database")]
struct Args {
    /// Database path (default: DB_PATH from the environment)
    #[arg(long)]
    db: Option<String>,

    /// Also insert sample listings and trades
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Wipe existing listings and trades first
    #[arg(long, default_value_t = false)]
    clear: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let db_path = match args.db {
        Some(path) => path,
        None => Config::from_env()?.db_path,
    };
    let store = AuctionStore::open(&db_path)?;
    println!("Database ready at {} ({} pets)", db_path, store.get_all_pets()?.len());

    if args.clear {
        store.clear_all()?;
        println!("Cleared existing listings and trades.");
    }

    if args.demo {
        let listings = insert_sample_listings(&store)?;
        let trades = insert_sample_trades(&store)?;
        println!("Inserted {} sample listings and {} sample trades.", listings, trades);
    }

    Ok(())
}

fn insert_sample_listings(store: &AuctionStore) -> Result<usize> {
    // (user_id, haves, wants, description)
    let samples: Vec<(i64, &str, &str, &str)> = vec![
        (
            111111111,
            r#"{"Aurelia": {"Legendary": 50, "Mythic": 3}}"#,
            r#"{"Bramble": {"Legendary": 10}}"#,
            "Selling Aurelia, looking for Bramble",
        ),
        (
            222222222,
            r#"{"Oblivion": {"Mythic": 5}}"#,
            r#"{"Aurelia": {"Legendary": 20}, "Delve": {"Legendary": 15}}"#,
            "Have Oblivion Mythic, need Aurelia and Delve",
        ),
        (
            333333333,
            r#"{"Delve": {"Legendary": 30}}"#,
            r#"{}"#,
            "Selling Delve Legendary only",
        ),
        (
            444444444,
            r#"{}"#,
            r#"{"Kragg": {"Legendary": 5}, "Oblivion": {"Mythic": 1}}"#,
            "Looking for Kragg and Oblivion Mythic",
        ),
        (
            555555555,
            r#"{"Bramble": {"Legendary": 15, "Mythic": 2}}"#,
            r#"{"Aurelia": {"Legendary": 25}}"#,
            "Trading Bramble for Aurelia",
        ),
    ];

    let count = samples.len();
    for (user_id, haves, wants, description) in samples {
        let haves: Section = serde_json::from_str(haves)?;
        let wants: Section = serde_json::from_str(wants)?;
        store.create_listing(user_id, &haves, &wants, Some(description))?;
    }
    Ok(count)
}

fn insert_sample_trades(store: &AuctionStore) -> Result<usize> {
    // (user_id, gave, received), stamped over the trailing month
    let samples: Vec<(i64, TradeEntry, TradeEntry)> = vec![
        (123456789, entry("Aurelia", Rarity::Legendary, 10), entry("Bramble", Rarity::Legendary, 5)),
        (123456789, entry("Aurelia", Rarity::Legendary, 8), entry("Delve", Rarity::Legendary, 6)),
        (987654321, entry("Aurelia", Rarity::Legendary, 5), entry("Kragg", Rarity::Legendary, 3)),
        (111111111, entry("Aurelia", Rarity::Legendary, 12), entry("Oblivion", Rarity::Legendary, 8)),
        (222222222, entry("Aurelia", Rarity::Mythic, 7), entry("Aurelia", Rarity::Legendary, 15)),
        (123456789, entry("Bramble", Rarity::Legendary, 4), entry("Delve", Rarity::Legendary, 3)),
        (987654321, entry("Bramble", Rarity::Legendary, 6), entry("Aurelia", Rarity::Legendary, 10)),
        (111111111, entry("Bramble", Rarity::Legendary, 9), entry("Kragg", Rarity::Legendary, 5)),
        (123456789, entry("Oblivion", Rarity::Mythic, 2), entry("Aurelia", Rarity::Legendary, 5)),
        (222222222, entry("Oblivion", Rarity::Mythic, 3), entry("Bramble", Rarity::Legendary, 8)),
        (987654321, entry("Oblivion", Rarity::Mythic, 1), entry("Delve", Rarity::Legendary, 2)),
    ];

    let now_ms = Utc::now().timestamp_millis();
    let count = samples.len();
    for (i, (user_id, gave, received)) in samples.into_iter().enumerate() {
        // Spread deterministically over the last ~30 days
        let days_ago = (i as i64 * 7) % 30;
        store.insert_trade(&Trade {
            id: 0,
            user_id,
            gave_pet: gave.pet_name,
            gave_qty: gave.quantity,
            gave_rarity: gave.rarity,
            received_pet: received.pet_name,
            received_qty: received.quantity,
            received_rarity: received.rarity,
            created_at_ms: now_ms - days_ago * 86_400_000,
        })?;
    }
    Ok(count)
}

fn entry(pet_name: &str, rarity: Rarity, quantity: u32) -> TradeEntry {
    TradeEntry {
        pet_name: pet_name.to_string(),
        rarity,
        quantity,
    }
}
